/// SQLite-backed log.
pub mod sqlite;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::entry::Entry;

/// Failure of the storage medium.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite rejected a statement.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// An entry could not be encoded for storage.
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    /// Any other storage failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for [`EntryLog`] operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Storage for the local entry log.
///
/// `load` skips stored content it cannot decode instead of failing; only
/// failures of the medium itself are reported.
pub trait EntryLog: Send {
    /// Every decodable entry, in append order.
    fn load(&self) -> PersistResult<Vec<Entry>>;
    /// Stores `entry` after everything already in the log.
    fn append(&mut self, entry: &Entry) -> PersistResult<()>;
    /// Removes every entry, returning how many were dropped.
    fn clear(&mut self) -> PersistResult<usize>;
    /// Makes earlier appends durable. No-op by default.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}

/// In-process log, handy for tests and for embedding without a database.
///
/// Clones share the same backing vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntryLog {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl MemoryEntryLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log pre-filled with `entries`.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn guard(&self) -> PersistResult<MutexGuard<'_, Vec<Entry>>> {
        self.entries
            .lock()
            .map_err(|_| PersistError::Message("memory log poisoned".to_string()))
    }
}

impl EntryLog for MemoryEntryLog {
    fn load(&self) -> PersistResult<Vec<Entry>> {
        Ok(self.guard()?.clone())
    }

    fn append(&mut self, entry: &Entry) -> PersistResult<()> {
        self.guard()?.push(entry.clone());
        Ok(())
    }

    fn clear(&mut self) -> PersistResult<usize> {
        let mut entries = self.guard()?;
        let n = entries.len();
        entries.clear();
        Ok(n)
    }
}
