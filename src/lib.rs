#![forbid(unsafe_code)]
//! safefile: atomic, crash-safe replacement of file contents.
//!
//! Writes go to a temporary sibling of the target; `commit` flushes, fsyncs and
//! renames it over the target in one step, so observers see either the old or
//! the new content and never a partial file. A session that is closed or
//! dropped without committing deletes its temporary file.
//!
//! Safety model highlights:
//! - Every step addresses the target's parent through one directory handle
//!   (`openat(O_EXCL) -> fsync -> renameat -> fsync(dirfd)`), so the temporary
//!   file and the target always share a directory and a filesystem.
//! - Session state is an explicit `Open | Committed | Closed` machine; commit
//!   happens at most once, close is idempotent.
//! - This crate forbids `unsafe` and uses `rustix` for syscalls.
//!
//! ```no_run
//! use std::io::Write;
//!
//! let mut f = safefile::create("/tmp/x", 0o666)?;
//! f.write_all(b"Hello, safe file")?;
//! f.commit()?;
//! f.close()?;
//!
//! safefile::write_file("/tmp/z", b"Testing WriteFile", 0o666)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
pub use types::{CommitReport, Error, ErrorKind, Phase, Result, SessionState};
