//! Finalized RSVP entries and their stored wrapper.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Attending;

/// Version number for serialized [`StoredEntryEnvelope`] payloads.
pub const ENTRY_FORMAT_VERSION: u16 = 1;

/// One finalized guest sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Guest {
    /// Guest name.
    #[serde(default)]
    pub name: String,
    /// Guest dietary note.
    #[serde(default)]
    pub dietary: String,
}

/// Immutable, validated RSVP record; the unit persisted, relayed and exported.
///
/// Field names serialize in camelCase so the stored and relayed JSON matches
/// what the spreadsheet intake expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Creation instant, millisecond precision.
    #[serde(with = "iso_millis")]
    pub submitted_at: DateTime<Utc>,
    /// Primary contact name.
    pub full_name: String,
    /// Primary contact email.
    pub email: String,
    /// Attendance decision.
    pub attending: Attending,
    /// Declared number of additional guests.
    pub guest_count: u32,
    /// Optional free-text message.
    #[serde(default)]
    pub message: String,
    /// Guest sub-records, at most `guest_count` of them.
    #[serde(default)]
    pub guests: Vec<Guest>,
    /// Opaque description of the submitting environment.
    #[serde(default)]
    pub client_context: String,
}

impl Entry {
    /// ISO 8601 rendering of [`Entry::submitted_at`] as stored and exported.
    pub fn submitted_at_iso(&self) -> String {
        format_timestamp(&self.submitted_at)
    }

    /// Serializes to the JSON body posted to the remote intake.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntryEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped entry.
    pub entry: Entry,
}

impl StoredEntryEnvelope {
    /// Constructs an envelope using [`ENTRY_FORMAT_VERSION`].
    pub fn new(entry: Entry) -> Self {
        Self {
            format_version: ENTRY_FORMAT_VERSION,
            entry,
        }
    }
}

/// Renders `ts` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time truncated to the precision entries are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
