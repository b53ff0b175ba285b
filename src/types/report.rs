use std::path::PathBuf;

use serde::Serialize;

/// Outcome of a successful commit.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CommitReport {
    /// Final destination the temporary file was renamed onto.
    pub path: PathBuf,
    pub bytes_written: u64,
    /// Lowercase hex SHA-256 of the committed content.
    pub after_hash: String,
    /// Time spent in flush + fsync of the temporary file.
    pub fsync_ms: u64,
    /// Whether the parent directory entry was fsynced after the rename.
    pub dir_synced: bool,
}
