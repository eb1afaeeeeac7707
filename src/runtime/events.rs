//! Runtime event stream payloads.

use crate::types::SubmissionId;

/// Events emitted from the desk loop and its detached relay tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpEvent {
    /// An entry was appended to the local log.
    Submitted {
        /// Submission id.
        id: SubmissionId,
    },
    /// The remote intake accepted the entry.
    RemoteSynced {
        /// Submission id.
        id: SubmissionId,
    },
    /// The remote intake failed; the local entry stands.
    RemoteSyncFailed {
        /// Submission id.
        id: SubmissionId,
        /// User-facing advisory text.
        advisory: String,
    },
    /// The local log was wiped.
    Cleared {
        /// Number of entries removed.
        removed: usize,
    },
}
