//! SQLite-backed append-only entry log.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::{debug, warn};

use crate::entry::{ENTRY_FORMAT_VERSION, Entry, StoredEntryEnvelope};

use super::{EntryLog, PersistResult};

/// SQLite implementation of [`crate::persist::EntryLog`].
///
/// Rows live in one table shared by every namespace; `storage_key` selects
/// the log this instance reads and writes.
pub struct SqliteEntryLog {
    conn: Connection,
    storage_key: String,
}

impl SqliteEntryLog {
    /// Opens or creates a SQLite-backed log at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>, storage_key: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, storage_key.into())
    }

    /// Opens an in-memory SQLite log.
    pub fn open_in_memory(storage_key: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, storage_key.into())
    }

    fn init_connection(conn: Connection, storage_key: String) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn, storage_key })
    }

    /// Namespace this log reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Number of stored rows for this namespace, decodable or not.
    pub fn row_count(&self) -> PersistResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE storage_key = ?1",
            params![self.storage_key],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    fn load_payloads(&self) -> PersistResult<Vec<Vec<u8>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM entries WHERE storage_key = ?1 ORDER BY seq ASC")?;
        let rows = stmt.query_map(params![self.storage_key], |row| row.get::<_, Vec<u8>>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl EntryLog for SqliteEntryLog {
    fn load(&self) -> PersistResult<Vec<Entry>> {
        let payloads = self.load_payloads()?;
        let mut entries = Vec::with_capacity(payloads.len());
        let mut skipped = 0usize;
        for payload in &payloads {
            match decode_entry_payload(payload) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    skipped += 1;
                    debug!(storage_key = %self.storage_key, %err, "undecodable rsvp row");
                }
            }
        }
        if skipped > 0 {
            warn!(storage_key = %self.storage_key, skipped, kept = entries.len(), "skipped malformed rsvp rows");
        }
        Ok(entries)
    }

    fn append(&mut self, entry: &Entry) -> PersistResult<()> {
        let payload = serde_json::to_vec(&StoredEntryEnvelope::new(entry.clone()))?;
        self.conn.execute(
            "INSERT INTO entries(storage_key, submitted_at, payload) VALUES (?1, ?2, ?3)",
            params![self.storage_key, entry.submitted_at_iso(), payload],
        )?;
        debug!(storage_key = %self.storage_key, "appended rsvp entry");
        Ok(())
    }

    fn clear(&mut self) -> PersistResult<usize> {
        let count = self
            .conn
            .execute("DELETE FROM entries WHERE storage_key = ?1", params![self.storage_key])?;
        Ok(count)
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn decode_entry_payload(payload: &[u8]) -> Result<Entry, String> {
    if let Ok(envelope) = serde_json::from_slice::<StoredEntryEnvelope>(payload) {
        if envelope.format_version != ENTRY_FORMAT_VERSION {
            return Err(format!(
                "unsupported entry format version: {}",
                envelope.format_version
            ));
        }
        return Ok(envelope.entry);
    }

    // Rows written before the envelope existed hold a bare entry.
    serde_json::from_slice::<Entry>(payload).map_err(|e| format!("entry payload decode failed: {e}"))
}
