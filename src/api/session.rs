//! `AtomicFile`: one write-sync-rename session over a temporary sibling file.
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::Level;
use rustix::fd::OwnedFd;
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::errors::{id_for, id_str};
use crate::constants::FSYNC_WARN_MS;
use crate::fs::{allocate, fsync_dirfd, rename_in_dir, unlink_in_dir, TempFile};
use crate::logging::{AuditCtx, AuditSink, FactsEmitter, Stage, StageLogger};
use crate::policy::Policy;
use crate::types::errors::{Error, ErrorKind, Phase, Result};
use crate::types::{CommitReport, SessionState};

// The handle lives inside `Open` so it is released exactly once, by whichever
// terminal transition replaces the variant.
enum State {
    Open(BufWriter<File>),
    Committed,
    Closed,
}

/// A pending replacement of `original_path`.
///
/// Bytes written go to a temporary file in the same directory. [`commit`](Self::commit)
/// makes them visible at `original_path` in one atomic rename;
/// [`close`](Self::close), [`abandon`](Self::abandon) or dropping the session
/// without committing deletes the temporary file and leaves `original_path` untouched.
pub struct AtomicFile<'a> {
    original: PathBuf,
    temp_path: PathBuf,
    target_name: OsString,
    temp_name: OsString,
    dirfd: OwnedFd,
    mode: u32,
    state: State,
    session_id: String,
    bytes_written: u64,
    hasher: Sha256,
    sync_parent_dir: bool,
    redact: bool,
    facts: &'a (dyn FactsEmitter + Sync),
    audit: &'a (dyn AuditSink + Sync),
}

fn invalid_state(path: &Path, state: SessionState, phase: Phase) -> Error {
    Error::new(
        ErrorKind::InvalidState,
        phase,
        path,
        format!("session is {}", state.as_str()),
    )
}

impl<'a> AtomicFile<'a> {
    pub(crate) fn open(
        target: &Path,
        mode: u32,
        policy: &Policy,
        facts: &'a (dyn FactsEmitter + Sync),
        audit: &'a (dyn AuditSink + Sync),
    ) -> Result<Self> {
        let session_id = Uuid::new_v4().to_string();
        let ctx = AuditCtx::new(facts, &session_id, policy.audit.redact);
        let slog = StageLogger::new(ctx);

        let TempFile {
            dirfd,
            target_name,
            temp_name,
            temp_path,
            file,
        } = match allocate(target, mode, &policy.naming) {
            Ok(tf) => tf,
            Err(e) => {
                slog.allocate()
                    .path(target.display().to_string())
                    .field("mode", json!(format!("{mode:o}")))
                    .field("error_id", json!(id_str(id_for(e.kind))))
                    .field("error", json!(e.to_string()))
                    .emit_failure();
                return Err(e);
            }
        };
        slog.allocate()
            .path(target.display().to_string())
            .field("temp_path", json!(temp_path.display().to_string()))
            .field("mode", json!(format!("{mode:o}")))
            .emit_success();

        Ok(Self {
            original: target.to_path_buf(),
            temp_path,
            target_name,
            temp_name,
            dirfd,
            mode,
            state: State::Open(BufWriter::new(file)),
            session_id,
            bytes_written: 0,
            hasher: Sha256::new(),
            sync_parent_dir: policy.durability.sync_parent_dir,
            redact: policy.audit.redact,
            facts,
            audit,
        })
    }

    /// The destination this session replaces on commit.
    #[must_use]
    pub fn original_path(&self) -> &Path {
        &self.original
    }

    /// Current location of the uncommitted data; primarily for diagnostics.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.state {
            State::Open(_) => SessionState::Open,
            State::Committed => SessionState::Committed,
            State::Closed => SessionState::Closed,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Bytes accepted so far (buffered or already handed to the OS).
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn stage_logger(&self) -> StageLogger<'_> {
        StageLogger::new(AuditCtx::new(self.facts, &self.session_id, self.redact))
    }

    fn emit_failure(&self, stage: Stage, e: &Error) {
        self.stage_logger()
            .stage(stage)
            .path(self.original.display().to_string())
            .field("temp_path", json!(self.temp_path.display().to_string()))
            .field("phase", json!(e.phase.as_str()))
            .field("error_id", json!(id_str(id_for(e.kind))))
            .field("error", json!(e.to_string()))
            .emit_failure();
    }

    /// Write all of `data` to the temporary file.
    ///
    /// # Errors
    ///
    /// `InvalidState` once the session is committed or closed; `DurabilityFailure`
    /// (phase `write`) if the OS rejects the write, e.g. `ENOSPC`.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: io::Error) -> Error {
        if e.get_ref().is_some_and(|r| r.is::<Error>()) {
            if let Some(inner) = e.into_inner() {
                if let Ok(err) = inner.downcast::<Error>() {
                    return *err;
                }
            }
            return invalid_state(&self.original, self.state(), Phase::Write);
        }
        Error::io(ErrorKind::DurabilityFailure, Phase::Write, &self.temp_path, e)
    }

    /// Flush, fsync and atomically rename the temporary file over `original_path`.
    ///
    /// On success the session is `Committed` and the handle released. A parent
    /// directory fsync failure after the rename cannot be rolled back; it is
    /// reported as `dir_synced = false` and a `commit` fact with decision `warn`.
    ///
    /// # Errors
    ///
    /// - `DurabilityFailure` (phase `flush` or `sync`): session stays `Open`.
    /// - `CommitFailed` (phase `rename`): session stays `Open`, temporary file preserved.
    /// - `InvalidState` if the session already committed or closed; nothing is touched.
    pub fn commit(&mut self) -> Result<CommitReport> {
        let writer = match &mut self.state {
            State::Open(w) => w,
            State::Committed => {
                return Err(invalid_state(&self.original, SessionState::Committed, Phase::Commit))
            }
            State::Closed => {
                return Err(invalid_state(&self.original, SessionState::Closed, Phase::Commit))
            }
        };

        let t0 = Instant::now();
        if let Err(e) = writer.flush() {
            let err = Error::io(ErrorKind::DurabilityFailure, Phase::Flush, &self.temp_path, e);
            self.emit_failure(Stage::Commit, &err);
            return Err(err);
        }
        if let Err(e) = writer.get_ref().sync_all() {
            let err = Error::io(ErrorKind::DurabilityFailure, Phase::Sync, &self.temp_path, e);
            self.emit_failure(Stage::Commit, &err);
            return Err(err);
        }
        let fsync_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Err(e) = rename_in_dir(&self.dirfd, &self.temp_name, &self.target_name) {
            let err = Error::io(ErrorKind::CommitFailed, Phase::Rename, &self.original, e);
            self.emit_failure(Stage::Commit, &err);
            return Err(err);
        }

        let dir_sync_err = if self.sync_parent_dir {
            fsync_dirfd(&self.dirfd).err()
        } else {
            None
        };
        let dir_synced = self.sync_parent_dir && dir_sync_err.is_none();

        self.state = State::Committed;
        let report = CommitReport {
            path: self.original.clone(),
            bytes_written: self.bytes_written,
            after_hash: hex::encode(std::mem::take(&mut self.hasher).finalize()),
            fsync_ms,
            dir_synced,
        };

        let ev = self
            .stage_logger()
            .commit()
            .path(self.original.display().to_string())
            .field("bytes_written", json!(report.bytes_written))
            .field("after_hash", json!(report.after_hash))
            .field("hash_alg", json!("sha256"))
            .field("fsync_ms", json!(fsync_ms))
            .field("dir_synced", json!(dir_synced));
        if let Some(e) = dir_sync_err {
            // The rename already happened; the new content is visible but may
            // not survive a crash.
            self.audit.log(
                Level::Warn,
                &format!(
                    "commit: directory fsync failed for {}: {e}",
                    self.original.display()
                ),
            );
            ev.field("phase", json!(Phase::Sync.as_str()))
                .field("error_id", json!(id_str(id_for(ErrorKind::DurabilityFailure))))
                .field("error", json!(e.to_string()))
                .emit_warn();
        } else if fsync_ms > FSYNC_WARN_MS {
            ev.field("severity", json!("warn")).emit_success();
        } else {
            ev.emit_success();
        }
        Ok(report)
    }

    /// Discard the uncommitted data and delete the temporary file.
    ///
    /// The session is `Closed` afterwards even when the delete fails; a
    /// leftover temporary file is reported, not retried.
    ///
    /// # Errors
    ///
    /// - `CleanupFailed` (phase `abandon`) if the temporary file could not be removed.
    /// - `InvalidState` if the session already committed or closed.
    pub fn abandon(&mut self) -> Result<()> {
        let writer = match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(w) => w,
            State::Committed => {
                self.state = State::Committed;
                return Err(invalid_state(&self.original, SessionState::Committed, Phase::Abandon));
            }
            State::Closed => {
                return Err(invalid_state(&self.original, SessionState::Closed, Phase::Abandon));
            }
        };
        // Buffered bytes are dropped unwritten.
        let (file, _unflushed) = writer.into_parts();
        drop(file);

        match unlink_in_dir(&self.dirfd, &self.temp_name) {
            Ok(()) => {
                self.stage_logger()
                    .abandon()
                    .path(self.original.display().to_string())
                    .field("temp_path", json!(self.temp_path.display().to_string()))
                    .field("bytes_discarded", json!(self.bytes_written))
                    .emit_success();
                Ok(())
            }
            Err(e) => {
                let err = Error::io(ErrorKind::CleanupFailed, Phase::Abandon, &self.temp_path, e);
                self.emit_failure(Stage::Abandon, &err);
                Err(err)
            }
        }
    }

    /// Abandon if still open; a no-op once committed or closed.
    ///
    /// # Errors
    ///
    /// Same as [`abandon`](Self::abandon) when the session is still open.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            State::Open(_) => self.abandon(),
            State::Committed | State::Closed => Ok(()),
        }
    }
}

impl Write for AtomicFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.state {
            State::Open(w) => {
                let n = w.write(buf)?;
                self.hasher.update(&buf[..n]);
                self.bytes_written += n as u64;
                Ok(n)
            }
            State::Committed => {
                Err(invalid_state(&self.original, SessionState::Committed, Phase::Write).into())
            }
            State::Closed => {
                Err(invalid_state(&self.original, SessionState::Closed, Phase::Write).into())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.state {
            State::Open(w) => w.flush(),
            State::Committed => {
                Err(invalid_state(&self.original, SessionState::Committed, Phase::Flush).into())
            }
            State::Closed => {
                Err(invalid_state(&self.original, SessionState::Closed, Phase::Flush).into())
            }
        }
    }
}

impl Drop for AtomicFile<'_> {
    fn drop(&mut self) {
        if !self.state().is_terminal() {
            if let Err(e) = self.abandon() {
                self.audit.log(
                    Level::Error,
                    &format!("drop: leaked temporary file {}: {e}", self.temp_path.display()),
                );
            }
        }
    }
}

impl std::fmt::Debug for AtomicFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("original", &self.original)
            .field("temp_path", &self.temp_path)
            .field("state", &self.state())
            .field("session_id", &self.session_id)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}
