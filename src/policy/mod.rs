//! Policy configuration for temp naming, durability and audit emission.
//!
//! Consumers construct a [`Policy`](crate::policy::Policy) via `Default` or a
//! preset (`fast_preset`), customize fields, then hand it to
//! [`SafeFiles`](crate::SafeFiles).
//!
//! Submodules:
//! - `config`: policy struct and presets
//! - `types`: grouped policy sections

pub mod config;
pub mod types;

pub use config::Policy;
