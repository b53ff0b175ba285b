//! Temporary file allocation next to a target path.
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use rustix::fd::OwnedFd;
use rustix::io::Errno;
use uuid::Uuid;

use super::atomic::{create_exclusive, errno_to_io, open_dir};
use super::tempname::temp_name_for;
use crate::policy::types::Naming;
use crate::types::errors::{Error, ErrorKind, Phase, Result};

/// A freshly created, empty temporary file and the directory handle it lives in.
#[derive(Debug)]
pub struct TempFile {
    pub dirfd: OwnedFd,
    /// Final component of the target path.
    pub target_name: OsString,
    /// Final component of the temporary path.
    pub temp_name: OsString,
    pub temp_path: PathBuf,
    pub file: File,
}

/// Split `target` into (directory as given, final component), rejecting paths
/// that cannot name a regular file.
fn split_target(target: &Path) -> Result<(&Path, &OsStr)> {
    let invalid = |msg: &str| Error::new(ErrorKind::InvalidPath, Phase::Allocate, target, msg);
    let raw = target.as_os_str().as_bytes();
    if raw.is_empty() {
        return Err(invalid("empty path"));
    }
    let last = raw.rsplit(|b| *b == b'/').next().unwrap_or_default();
    match last {
        b"" => return Err(invalid("path ends with a separator")),
        b"." | b".." => return Err(invalid("path does not name a file")),
        _ => {}
    }
    let name = target
        .file_name()
        .ok_or_else(|| invalid("path does not name a file"))?;
    let dir = target.parent().unwrap_or_else(|| Path::new(""));
    Ok((dir, name))
}

fn kind_for(e: &io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::AccessDenied,
        _ => ErrorKind::UnavailableDestination,
    }
}

/// Create an empty temporary file in the same directory as `target`.
///
/// Candidate names come from [`temp_name_for`] with a fresh UUIDv4 nonce per
/// attempt; a name that already exists is skipped, up to `naming.max_attempts`.
///
/// # Errors
///
/// - `InvalidPath` if `target` does not name a file.
/// - `UnavailableDestination` if the directory is missing, not a directory, or read-only.
/// - `AccessDenied` if the directory cannot be opened or written due to permissions.
/// - `AllocationFailed` if every attempt collided with an existing name.
pub fn allocate(target: &Path, mode: u32, naming: &Naming) -> Result<TempFile> {
    let (dir, target_name) = split_target(target)?;
    let open_at = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let dirfd = open_dir(open_at).map_err(|e| Error::io(kind_for(&e), Phase::Allocate, open_at, e))?;

    for _ in 0..naming.max_attempts {
        let temp_name = temp_name_for(target_name, &Uuid::new_v4());
        match create_exclusive(&dirfd, &temp_name, mode) {
            Ok(file) => {
                let temp_path = dir.join(&temp_name);
                return Ok(TempFile {
                    dirfd,
                    target_name: target_name.to_os_string(),
                    temp_name,
                    temp_path,
                    file,
                });
            }
            Err(e) if e == Errno::EXIST => continue,
            Err(e) => {
                let e = errno_to_io(e);
                return Err(Error::io(kind_for(&e), Phase::Allocate, &dir.join(&temp_name), e));
            }
        }
    }
    Err(Error::new(
        ErrorKind::AllocationFailed,
        Phase::Allocate,
        target,
        format!("no free temporary name after {} attempts", naming.max_attempts),
    ))
}
