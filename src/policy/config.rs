use super::types::{AuditPolicy, Durability, Naming};

/// Policy governs temp naming, commit durability and fact emission for safefile.
///
/// The file fsync before rename is not a policy knob; it is always performed.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub naming: Naming,
    pub durability: Durability,
    pub audit: AuditPolicy,
}

impl Policy {
    /// Construct a Policy that skips the parent directory fsync after rename.
    ///
    /// Content is still fsynced before the rename, so readers never see a
    /// partial file; only the durability of the directory entry itself across
    /// power loss is traded for fewer syncs. Suited to scratch or cache files.
    ///
    /// # Example
    /// ```rust
    /// use safefile::policy::Policy;
    /// use safefile::{SafeFiles, logging::JsonlSink};
    ///
    /// let api = SafeFiles::new(JsonlSink, JsonlSink, Policy::fast_preset());
    /// # let _ = api;
    /// ```
    #[must_use]
    pub fn fast_preset() -> Self {
        let mut p = Self::default();
        p.durability.sync_parent_dir = false;
        p
    }

    /// Construct a Policy whose facts are redacted for deterministic comparison.
    #[must_use]
    pub fn redacted() -> Self {
        let mut p = Self::default();
        p.audit.redact = true;
        p
    }

    /// Override the exclusive-create attempt bound.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.naming.max_attempts = attempts;
        self
    }
}
