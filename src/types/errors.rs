//! Error types used across safefile.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// High-level failure categories. Each maps to one stable `ErrorId`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid target path")]
    InvalidPath,
    #[error("destination unavailable")]
    UnavailableDestination,
    #[error("access denied")]
    AccessDenied,
    #[error("temporary name allocation failed")]
    AllocationFailed,
    #[error("durability failure")]
    DurabilityFailure,
    #[error("commit failed")]
    CommitFailed,
    #[error("temporary file cleanup failed")]
    CleanupFailed,
    #[error("invalid session state")]
    InvalidState,
}

/// Protocol step during which an error occurred.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Allocate,
    Write,
    Commit,
    Flush,
    Sync,
    Rename,
    Abandon,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Allocate => "allocate",
            Phase::Write => "write",
            Phase::Commit => "commit",
            Phase::Flush => "flush",
            Phase::Sync => "sync",
            Phase::Rename => "rename",
            Phase::Abandon => "abandon",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error with a kind, the failing phase and the path involved.
#[derive(Debug, Error)]
#[error("{kind} during {phase} of {}: {msg}", .path.display())]
pub struct Error {
    pub kind: ErrorKind,
    pub phase: Phase,
    pub path: PathBuf,
    pub msg: String,
    #[source]
    pub source: Option<io::Error>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, phase: Phase, path: &Path, msg: impl Into<String>) -> Self {
        Self {
            kind,
            phase,
            path: path.to_path_buf(),
            msg: msg.into(),
            source: None,
        }
    }

    pub(crate) fn io(kind: ErrorKind, phase: Phase, path: &Path, source: io::Error) -> Self {
        Self {
            kind,
            phase,
            path: path.to_path_buf(),
            msg: source.to_string(),
            source: Some(source),
        }
    }

    /// Raw OS error code of the underlying failure, when there is one.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        self.source.as_ref().and_then(io::Error::raw_os_error)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind {
            ErrorKind::InvalidPath => io::ErrorKind::InvalidInput,
            ErrorKind::AccessDenied => io::ErrorKind::PermissionDenied,
            ErrorKind::UnavailableDestination => io::ErrorKind::NotFound,
            ErrorKind::AllocationFailed => io::ErrorKind::AlreadyExists,
            ErrorKind::InvalidState => io::ErrorKind::Other,
            ErrorKind::DurabilityFailure | ErrorKind::CommitFailed | ErrorKind::CleanupFailed => {
                e.source
                    .as_ref()
                    .map_or(io::ErrorKind::Other, io::Error::kind)
            }
        };
        io::Error::new(kind, e)
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
