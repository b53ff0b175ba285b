// Facade for API module; delegates to submodules under src/api/

use std::path::Path;

use crate::logging::{AuditSink, FactsEmitter, JsonlSink};
use crate::policy::Policy;
use crate::types::errors::Result;
use crate::types::CommitReport;

#[path = "api/errors.rs"]
pub mod errors;
#[path = "api/session.rs"]
mod session;
#[path = "api/write_file.rs"]
mod write_file;

pub use session::AtomicFile;

/// Entry point carrying the facts emitter, audit sink and policy shared by
/// every session it creates.
pub struct SafeFiles<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
}

impl<E: FactsEmitter + Sync, A: AuditSink + Sync> SafeFiles<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy) -> Self {
        Self {
            facts,
            audit,
            policy,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Start a session that will replace `path` on commit.
    ///
    /// # Errors
    ///
    /// Allocation errors (`InvalidPath`, `UnavailableDestination`, `AccessDenied`,
    /// `AllocationFailed`) propagate as-is; no session is produced.
    pub fn create(&self, path: impl AsRef<Path>, mode: u32) -> Result<AtomicFile<'_>> {
        AtomicFile::open(path.as_ref(), mode, &self.policy, &self.facts, &self.audit)
    }

    /// Atomically replace `path` with exactly `data`.
    ///
    /// # Errors
    ///
    /// The first failing step's error; the target is unchanged when this returns `Err`.
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        data: impl AsRef<[u8]>,
        mode: u32,
    ) -> Result<CommitReport> {
        let file = self.create(path, mode)?;
        write_file::run(file, data.as_ref())
    }
}

static DEFAULT_SINK: JsonlSink = JsonlSink;

/// Start a session with the default policy; facts go nowhere, audit messages go to `log`.
///
/// # Errors
///
/// See [`SafeFiles::create`].
pub fn create(path: impl AsRef<Path>, mode: u32) -> Result<AtomicFile<'static>> {
    AtomicFile::open(
        path.as_ref(),
        mode,
        &Policy::default(),
        &DEFAULT_SINK,
        &DEFAULT_SINK,
    )
}

/// Atomically replace `path` with exactly `data` using the default policy.
///
/// # Errors
///
/// See [`SafeFiles::write_file`].
pub fn write_file(
    path: impl AsRef<Path>,
    data: impl AsRef<[u8]>,
    mode: u32,
) -> Result<CommitReport> {
    let file = create(path, mode)?;
    write_file::run(file, data.as_ref())
}
