pub(crate) mod alloc;
pub(crate) mod atomic;
pub mod tempname;

pub(crate) use alloc::{allocate, TempFile};
pub(crate) use atomic::{fsync_dirfd, rename_in_dir, unlink_in_dir};
pub use tempname::{is_temp_name, temp_name_for};
