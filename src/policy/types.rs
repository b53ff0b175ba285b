use crate::constants::DEFAULT_MAX_NAME_ATTEMPTS;

/// Temporary name generation knobs.
#[derive(Clone, Debug)]
pub struct Naming {
    /// Upper bound on exclusive-create attempts with fresh nonces.
    pub max_attempts: u32,
}

impl Default for Naming {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_NAME_ATTEMPTS }
    }
}

#[derive(Clone, Debug)]
pub struct Durability {
    /// Fsync the parent directory after the rename so the new entry survives power loss.
    pub sync_parent_dir: bool,
}

impl Default for Durability {
    fn default() -> Self {
        Self { sync_parent_dir: true }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AuditPolicy {
    /// Zero timestamps and strip volatile fields (durations, hashes) from emitted facts.
    pub redact: bool,
}
