//! Error taxonomy for assignment operations.
//!
//! Every variant is distinguishable by [`Error::kind`] so transport
//! layers can map them without string matching. No variant is ever
//! swallowed; a failed operation leaves the topology record unchanged.

use beacon_store::StoreError;
use beacon_topology::{RegionCode, SlotId};
use thiserror::Error;

/// Result type for assignment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the slot assignment engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The reported endpoint could not be parsed.
    #[error(transparent)]
    InvalidInput(beacon_topology::Error),

    /// The region resolver failed or does not know the host.
    ///
    /// Distinct from "no slot available": the caller could not even be
    /// located, so no claim decision was possible.
    #[error("could not determine region for {host}: {reason}")]
    RegionUndetermined { host: String, reason: String },

    /// The host's region resolved, but this mesh has no slot for it.
    #[error("region {region} has no slot in this mesh")]
    UnsupportedRegion { region: RegionCode },

    /// The geographic slot for the host's region is already occupied.
    #[error("slot {slot_id} is already occupied by {endpoint}")]
    SlotOccupied { slot_id: SlotId, endpoint: String },

    /// No slot owns the requested endpoint host.
    #[error("no slot owns endpoint host {0}")]
    NotFound(String),

    /// The record store failed. A `Conflict` here means the single
    /// claim retry also lost its race.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Stable machine-readable kind for programmatic dispatch.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::RegionUndetermined { .. } => "region_undetermined",
            Error::UnsupportedRegion { .. } => "unsupported_region",
            Error::SlotOccupied { .. } => "slot_occupied",
            Error::NotFound(_) => "not_found",
            Error::Store(StoreError::Conflict { .. }) => "store_conflict",
            Error::Store(_) => "store",
        }
    }
}
