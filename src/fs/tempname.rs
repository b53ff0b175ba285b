//! Temporary name generation.
//!
//! Names are a pure function of the target's file name and a caller-supplied
//! nonce; the allocator draws a fresh nonce per attempt. Layout:
//! `.{fname}.{nonce}.safefile.tmp`, where `nonce` is `NONCE_HEX_LEN` lowercase hex chars.
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

use uuid::Uuid;

use crate::constants::{NONCE_HEX_LEN, TMP_PREFIX, TMP_SUFFIX};

/// Longest single path component accepted by common Unix filesystems.
const NAME_MAX: usize = 255;

/// Build the temporary sibling name for `file_name` using `nonce`.
///
/// Long file names are truncated so the result still fits in `NAME_MAX` bytes.
#[must_use]
pub fn temp_name_for(file_name: &OsStr, nonce: &Uuid) -> OsString {
    let hex = nonce.simple().to_string();
    let nonce_part = &hex[..NONCE_HEX_LEN];
    let overhead = TMP_PREFIX.len() + 1 + NONCE_HEX_LEN + TMP_SUFFIX.len();
    let base = file_name.as_bytes();
    let keep = base.len().min(NAME_MAX - overhead);

    let mut out = Vec::with_capacity(keep + overhead);
    out.extend_from_slice(TMP_PREFIX.as_bytes());
    out.extend_from_slice(&base[..keep]);
    out.push(b'.');
    out.extend_from_slice(nonce_part.as_bytes());
    out.extend_from_slice(TMP_SUFFIX.as_bytes());
    OsString::from_vec(out)
}

/// Recognize a name produced by [`temp_name_for`]; used by cleanup tooling.
#[must_use]
pub fn is_temp_name(name: &OsStr) -> bool {
    let Some(rest) = name
        .as_bytes()
        .strip_prefix(TMP_PREFIX.as_bytes())
        .and_then(|r| r.strip_suffix(TMP_SUFFIX.as_bytes()))
    else {
        return false;
    };
    if rest.len() < NONCE_HEX_LEN + 2 {
        return false;
    }
    let (head, nonce) = rest.split_at(rest.len() - NONCE_HEX_LEN);
    head.ends_with(b".") && nonce.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
