//! Beacon Mesh Topology Record
//!
//! The single shared source of truth for a small fixed-size overlay mesh:
//! which physical node occupies which geographic identity slot, plus the
//! mesh-wide tunnel and routing parameters every node derives its
//! configuration from.
//!
//! # Model
//!
//! The slot set is fixed at deployment time, one slot per metro region.
//! Each slot carries a [`NodeAssignment`] with out-of-band-provisioned
//! overlay addresses and keys; only the `endpoint` field changes at
//! runtime, moving between the [`UNASSIGNED`] sentinel and a concrete
//! `host:port` as nodes claim their slots.
//!
//! # Invariants
//!
//! - Exactly one assignment per slot; the slot set never grows or shrinks
//!   at runtime.
//! - At most one slot records any given endpoint host.
//! - Exactly one slot has the reflector role.
//! - Region codes are unique across slots, so region-to-slot resolution
//!   is a function.
//!
//! [`TopologyRecord::validate`] checks all of these; the record stores
//! run it before accepting any write.

mod endpoint;
mod error;
mod record;
mod slot;

pub use endpoint::{Endpoint, UNASSIGNED};
pub use error::{Error, Result};
pub use record::{MeshParams, RoutingParams, ServiceInfo, TopologyRecord};
pub use slot::{NodeAssignment, RegionCode, Role, SlotId};
