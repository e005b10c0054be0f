//! Error types for config derivation.

use beacon_topology::SlotId;
use thiserror::Error;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving a node's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested slot is not part of this topology.
    #[error("unknown slot {0}")]
    NotFound(SlotId),

    /// The record has no reflector, so mesh peering cannot be derived.
    #[error("topology has no reflector slot")]
    MissingReflector,
}
