//! Error types for record storage.

use crate::Version;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while loading or storing the topology record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record changed underneath the caller's read-modify-write cycle.
    #[error("concurrent modification: record is at version {actual}, caller had {expected}")]
    Conflict { expected: Version, actual: Version },

    /// The record violates a topology invariant.
    #[error("record failed validation: {0}")]
    Invalid(#[from] beacon_topology::Error),

    /// The stored document could not be parsed.
    #[error("record document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Seeding was attempted over an existing record.
    #[error("record already seeded at {0}")]
    AlreadySeeded(PathBuf),

    /// The record file does not exist yet.
    #[error("no record at {0}; seed the topology first")]
    NotSeeded(PathBuf),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
