use crate::types::errors::ErrorKind;

// Stable identifiers attached to failure facts as `error_id`.
#[allow(non_camel_case_types, reason = "Error IDs are emitted verbatim in facts")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_INVALID_PATH,
    E_UNAVAILABLE,
    E_ACCESS,
    E_ALLOCATION,
    E_DURABILITY,
    E_COMMIT,
    E_CLEANUP,
    E_STATE,
}

#[must_use]
pub const fn id_for(kind: ErrorKind) -> ErrorId {
    match kind {
        ErrorKind::InvalidPath => ErrorId::E_INVALID_PATH,
        ErrorKind::UnavailableDestination => ErrorId::E_UNAVAILABLE,
        ErrorKind::AccessDenied => ErrorId::E_ACCESS,
        ErrorKind::AllocationFailed => ErrorId::E_ALLOCATION,
        ErrorKind::DurabilityFailure => ErrorId::E_DURABILITY,
        ErrorKind::CommitFailed => ErrorId::E_COMMIT,
        ErrorKind::CleanupFailed => ErrorId::E_CLEANUP,
        ErrorKind::InvalidState => ErrorId::E_STATE,
    }
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_INVALID_PATH => "E_INVALID_PATH",
        ErrorId::E_UNAVAILABLE => "E_UNAVAILABLE",
        ErrorId::E_ACCESS => "E_ACCESS",
        ErrorId::E_ALLOCATION => "E_ALLOCATION",
        ErrorId::E_DURABILITY => "E_DURABILITY",
        ErrorId::E_COMMIT => "E_COMMIT",
        ErrorId::E_CLEANUP => "E_CLEANUP",
        ErrorId::E_STATE => "E_STATE",
    }
}
