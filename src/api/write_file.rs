use super::session::AtomicFile;
use crate::types::errors::Result;
use crate::types::CommitReport;

/// Write all of `data` through `file`, commit, and close.
///
/// Any failure abandons the session before the original error is returned, so
/// the target is either fully replaced or left exactly as it was.
pub(crate) fn run(mut file: AtomicFile<'_>, data: &[u8]) -> Result<CommitReport> {
    match file.append(data).and_then(|()| file.commit()) {
        Ok(report) => {
            file.close()?;
            Ok(report)
        }
        Err(e) => {
            // Best effort; the write or commit error is what the caller needs.
            let _ = file.abandon();
            Err(e)
        }
    }
}
