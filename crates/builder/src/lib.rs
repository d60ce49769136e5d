//! Snapshot builder.
//!
//! Orchestrates one full rebuild cycle for one subject: liveness gate, bounded
//! stability/presence waits, forward resolution, transient-path reconciliation,
//! overlay collection, content hashing, and an atomic commit-or-rollback of the
//! subject's [`effigy_model::Snapshot`].
//!
//! One rebuild per subject category may be in flight at a time; the builder is
//! not internally reentrant-safe and relies on the external scheduler for that
//! exclusivity.

mod builder;
mod config;
mod error;

pub use builder::SnapshotBuilder;
pub use config::RebuildConfig;
pub use error::{RebuildError, RebuildOutcome};
