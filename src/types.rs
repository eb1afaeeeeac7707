//! Shared primitive enums and field keys used by the form draft.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Attendance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attending {
    /// Will attend.
    #[default]
    Yes,
    /// Cannot attend.
    No,
}

impl Attending {
    /// Wire and CSV spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Attending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text is neither `yes` nor `no`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attending must be \"yes\" or \"no\", got {0:?}")]
pub struct ParseAttendingError(String);

impl FromStr for Attending {
    type Err = ParseAttendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(ParseAttendingError(other.to_string())),
        }
    }
}

/// One scalar edit to a [`crate::core::draft::Draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    /// Primary contact name.
    FullName(String),
    /// Primary contact email.
    Email(String),
    /// Attendance decision.
    Attending(Attending),
    /// Raw guest-count text as typed.
    GuestCount(String),
    /// Free-text message.
    Message(String),
}

/// Field selector inside one guest slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestField {
    /// Guest name.
    Name,
    /// Guest dietary note.
    Dietary,
}

/// 1-based position of an entry in its log when it was submitted.
///
/// A desk opened over a non-empty log continues the count; a confirmed
/// clear starts it over.
pub type SubmissionId = u64;
