//! Error types for the topology record.

use crate::slot::{RegionCode, SlotId};
use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing endpoints or validating a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The reported endpoint string could not be parsed.
    #[error("invalid endpoint {input:?}: {reason}")]
    InvalidEndpoint { input: String, reason: &'static str },

    /// The record contains no slots at all.
    #[error("topology record has no slots")]
    EmptyTopology,

    /// A slot key disagrees with the assignment stored under it.
    #[error("slot {key} stores an assignment labelled {actual}")]
    SlotKeyMismatch { key: SlotId, actual: SlotId },

    /// Two slots record the same endpoint host.
    #[error("endpoint host {host} is recorded on both {first} and {second}")]
    DuplicateEndpointHost {
        host: String,
        first: SlotId,
        second: SlotId,
    },

    /// Two slots carry the same region code.
    #[error("region {region} maps to both {first} and {second}")]
    DuplicateRegion {
        region: RegionCode,
        first: SlotId,
        second: SlotId,
    },

    /// The record does not have exactly one reflector slot.
    #[error("expected exactly one reflector slot, found {0}")]
    ReflectorCount(usize),
}
