//! CSV export of the entry log.

/// Entry-to-CSV flattening.
pub mod csv;

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::entry::Entry;

pub use self::csv::to_csv;

/// Writes the CSV rendering of `entries` to `dir/file_name`, replacing any
/// previous export, and returns the written path.
pub fn write_csv_file(dir: impl AsRef<Path>, file_name: &str, entries: &[Entry]) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(file_name);
    let text = to_csv(entries);
    std::fs::write(&path, text.as_bytes())?;
    info!(path = %path.display(), rows = entries.len(), "exported rsvp csv");
    Ok(path)
}
