//! Shared crate-wide constants for safefile.
//!
//! Centralizes naming conventions and thresholds used across modules.

/// Suffix appended to every temporary name.
/// The full name is `.{fname}.{nonce}{TMP_SUFFIX}`; e.g. `.config.toml.3f9c0d2a41b87e6650aa.safefile.tmp`.
pub const TMP_SUFFIX: &str = ".safefile.tmp";

/// Leading marker for temporary names; keeps them hidden from plain `ls`.
pub const TMP_PREFIX: &str = ".";

/// Number of lowercase hex characters taken from a UUIDv4 for the name nonce (80 bits).
pub const NONCE_HEX_LEN: usize = 20;

/// Default bound on exclusive-create attempts before giving up with `AllocationFailed`.
pub const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Threshold in milliseconds above which a commit fsync is tagged with `severity=warn`.
pub const FSYNC_WARN_MS: u64 = 50;

/// Subsystem label used on every emitted fact.
pub const SUBSYSTEM: &str = "safefile";

/// Version of the fact envelope (`schema_version` field).
pub const SCHEMA_VERSION: i64 = 1;
