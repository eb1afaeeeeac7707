//! Flattening of entries into a delimited text document.
//!
//! The guest sub-records become numbered column pairs, `guest{i}Name` and
//! `guest{i}Dietary`, sized to the widest entry in the batch. The `dietary`
//! column is kept for schema compatibility and is always empty.

use std::borrow::Cow;

use crate::entry::Entry;

/// Columns present in every export, in order.
pub const FIXED_COLUMNS: [&str; 8] = [
    "submittedAt",
    "fullName",
    "email",
    "attending",
    "guests",
    "dietary",
    "message",
    "clientContext",
];

/// Serializes `entries` in input order. An empty slice gives an empty string.
pub fn to_csv(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let max_guests = entries.iter().map(|e| e.guests.len()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(csv_header(max_guests).join(","));
    for entry in entries {
        lines.push(csv_row(entry, max_guests));
    }
    lines.join("\n")
}

/// Header row for a batch whose widest entry has `max_guests` guests.
pub fn csv_header(max_guests: usize) -> Vec<String> {
    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    for i in 1..=max_guests {
        header.push(format!("guest{i}Name"));
        header.push(format!("guest{i}Dietary"));
    }
    header
}

fn csv_row(entry: &Entry, max_guests: usize) -> String {
    let submitted_at = entry.submitted_at_iso();
    let guest_count = entry.guest_count.to_string();

    let mut fields: Vec<Cow<'_, str>> = vec![
        escape_field(&submitted_at),
        escape_field(&entry.full_name),
        escape_field(&entry.email),
        escape_field(entry.attending.as_str()),
        escape_field(&guest_count),
        Cow::Borrowed(""),
        escape_field(&entry.message),
        escape_field(&entry.client_context),
    ];

    for i in 0..max_guests {
        match entry.guests.get(i) {
            Some(guest) => {
                fields.push(escape_field(&guest.name));
                fields.push(escape_field(&guest.dietary));
            }
            None => {
                fields.push(Cow::Borrowed(""));
                fields.push(Cow::Borrowed(""));
            }
        }
    }

    fields.join(",")
}

/// Quotes `value` when it holds a comma, a double quote or a line break,
/// doubling any inner quotes.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
