//! Directory-handle primitives for the write-sync-rename protocol.
//!
//! A session opens the target's parent directory once and performs every later
//! step relative to that handle:
//! `openat(O_EXCL, tmp) -> write -> fsync(tmp) -> renameat(tmp, final) -> fsync(dirfd)`.
//! Both names therefore always resolve inside the same directory, even if the
//! directory is renamed or replaced by path while the session is open.
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, renameat, unlinkat, AtFlags, Mode, OFlags, RawMode, CWD};
use rustix::io::Errno;

pub(crate) fn errno_to_io(e: Errno) -> io::Error {
    io::Error::from_raw_os_error(e.raw_os_error())
}

/// Open a directory with `O_DIRECTORY` for `*at` operations.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened (missing, not a directory, no access).
pub fn open_dir(dir: &Path) -> io::Result<OwnedFd> {
    openat(
        CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

/// Exclusively create `name` inside `dirfd` for writing, with permission bits `mode`.
///
/// Fails with `Errno::EXIST` when the name is taken; never follows a symlink at `name`.
///
/// # Errors
///
/// Returns the raw errno so callers can distinguish collisions from hard failures.
pub fn create_exclusive(dirfd: &OwnedFd, name: &OsStr, mode: u32) -> Result<fs::File, Errno> {
    #[allow(clippy::cast_possible_truncation, reason = "RawMode is u16 on some BSDs")]
    let mode = Mode::from_bits_truncate(mode as RawMode);
    let fd = openat(
        dirfd,
        name,
        OFlags::WRONLY | OFlags::CREATE | OFlags::EXCL | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        mode,
    )?;
    Ok(fs::File::from(fd))
}

/// Atomically rename `from` to `to`, both relative to the same directory handle.
///
/// # Errors
///
/// Returns an IO error if `renameat` fails (e.g. `EXDEV`, `EISDIR`, `EACCES`).
pub fn rename_in_dir(dirfd: &OwnedFd, from: &OsStr, to: &OsStr) -> io::Result<()> {
    renameat(dirfd, from, dirfd, to).map_err(errno_to_io)
}

/// Remove the regular file `name` from the directory handle.
///
/// # Errors
///
/// Returns an IO error if `unlinkat` fails, including `ENOENT`.
pub fn unlink_in_dir(dirfd: &OwnedFd, name: &OsStr) -> io::Result<()> {
    unlinkat(dirfd, name, AtFlags::empty()).map_err(errno_to_io)
}

/// Fsync a directory using an already-open directory file descriptor.
///
/// This avoids a TOCTOU window from re-opening the directory by path.
///
/// # Errors
///
/// Returns an IO error if the fsync fails.
pub fn fsync_dirfd(dirfd: &OwnedFd) -> io::Result<()> {
    rustix::fs::fsync(dirfd).map_err(errno_to_io)
}
