use chrono::{TimeZone, Utc};
use rusqlite::{Connection, params};
use tempfile::TempDir;

use rsvplog::{
    core::draft::Draft,
    entry::Entry,
    persist::{EntryLog, MemoryEntryLog, sqlite::SqliteEntryLog},
    types::{DraftField, GuestField},
};

fn entry(name: &str, minute: u32) -> Entry {
    let mut draft = Draft::new();
    draft.set_field(DraftField::FullName(name.to_string()));
    draft.set_field(DraftField::Email("guest@example.com".to_string()));
    draft.set_guest_field(0, GuestField::Name, format!("{name}'s plus one"));
    draft
        .finalize_at(Utc.with_ymd_and_hms(2026, 2, 1, 10, minute, 0).unwrap(), "test")
        .expect("valid")
}

#[test]
fn sqlite_log_round_trips_in_append_order() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("rsvps.db");

    let mut log = SqliteEntryLog::open(&db_path, "wedding_rsvps_v1").expect("open sqlite");
    let written = vec![entry("Cleo", 5), entry("Ann", 1), entry("Bo", 3)];
    for e in &written {
        log.append(e).expect("append");
    }
    drop(log);

    let reopened = SqliteEntryLog::open(&db_path, "wedding_rsvps_v1").expect("reopen");
    assert_eq!(reopened.load().expect("load"), written);
}

#[test]
fn namespaces_are_isolated_and_clear_is_scoped() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("shared.db");

    let mut a = SqliteEntryLog::open(&db_path, "party_a").expect("open a");
    let mut b = SqliteEntryLog::open(&db_path, "party_b").expect("open b");
    a.append(&entry("Ann", 1)).expect("append a");
    a.append(&entry("Ari", 2)).expect("append a");
    b.append(&entry("Bo", 3)).expect("append b");

    assert_eq!(a.clear().expect("clear"), 2);
    assert!(a.load().expect("load a").is_empty());
    assert_eq!(b.load().expect("load b").len(), 1);
}

#[test]
fn missing_log_loads_empty() {
    let log = SqliteEntryLog::open_in_memory("nothing_here").expect("open");
    assert!(log.load().expect("load").is_empty());
    assert_eq!(log.row_count().expect("count"), 0);
}

#[test]
fn malformed_rows_are_skipped_and_later_appends_survive() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("corrupt.db");

    let mut log = SqliteEntryLog::open(&db_path, "wedding_rsvps_v1").expect("open");
    log.append(&entry("Ann", 1)).expect("append");

    let conn = Connection::open(&db_path).expect("raw open");
    conn.execute(
        "INSERT INTO entries(storage_key, submitted_at, payload) VALUES (?1, ?2, ?3)",
        params!["wedding_rsvps_v1", "garbage", b"{not json".to_vec()],
    )
    .expect("insert garbage");
    drop(conn);

    log.append(&entry("Bo", 2)).expect("append after corrupt row");
    log.append(&entry("Cy", 0)).expect("append after corrupt row");

    assert_eq!(log.row_count().expect("count"), 4);
    let names: Vec<String> = log
        .load()
        .expect("load")
        .into_iter()
        .map(|e| e.full_name)
        .collect();
    assert_eq!(names, vec!["Ann", "Bo", "Cy"]);

    drop(log);
    let reopened = SqliteEntryLog::open(&db_path, "wedding_rsvps_v1").expect("reopen");
    assert_eq!(reopened.load().expect("load").len(), 3);
}

#[test]
fn clear_drops_malformed_rows_too() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("corrupt-clear.db");

    let mut log = SqliteEntryLog::open(&db_path, "wedding_rsvps_v1").expect("open");
    let conn = Connection::open(&db_path).expect("raw open");
    conn.execute(
        "INSERT INTO entries(storage_key, submitted_at, payload) VALUES (?1, ?2, ?3)",
        params!["wedding_rsvps_v1", "garbage", b"{bad".to_vec()],
    )
    .expect("insert garbage");
    drop(conn);

    assert!(log.load().expect("load").is_empty());
    assert_eq!(log.clear().expect("clear"), 1);
    log.append(&entry("Bo", 2)).expect("append after clear");
    assert_eq!(log.load().expect("load").len(), 1);
    assert_eq!(log.row_count().expect("count"), 1);
}

#[test]
fn unknown_format_version_is_treated_as_malformed() {
    let mut json = serde_json::to_value(rsvplog::entry::StoredEntryEnvelope::new(entry("Ann", 1))).unwrap();
    json["format_version"] = serde_json::json!(99);

    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("future.db");
    let future = SqliteEntryLog::open(&db_path, "v").expect("open file");
    let conn = Connection::open(&db_path).expect("raw open");
    conn.execute(
        "INSERT INTO entries(storage_key, submitted_at, payload) VALUES ('v', 'x', ?1)",
        params![serde_json::to_vec(&json).unwrap()],
    )
    .expect("insert");

    assert_eq!(future.row_count().expect("count"), 1);
    assert!(future.load().expect("load").is_empty());
}

#[test]
fn bare_entry_rows_still_decode() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("bare.db");
    let log = SqliteEntryLog::open(&db_path, "k").expect("open");

    let e = entry("Ann", 1);
    let conn = Connection::open(&db_path).expect("raw open");
    conn.execute(
        "INSERT INTO entries(storage_key, submitted_at, payload) VALUES ('k', ?1, ?2)",
        params![e.submitted_at_iso(), serde_json::to_vec(&e).unwrap()],
    )
    .expect("insert");

    assert_eq!(log.load().expect("load"), vec![e]);
}

#[test]
fn memory_log_clones_share_state() {
    let log = MemoryEntryLog::new();
    let mut writer = log.clone();
    writer.append(&entry("Ann", 1)).expect("append");
    assert_eq!(log.load().expect("load").len(), 1);
    assert_eq!(writer.clear().expect("clear"), 1);
    assert!(log.load().expect("load").is_empty());
}
