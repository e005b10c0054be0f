//! Slots and their node assignments.

use crate::endpoint::UNASSIGNED;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Identifier of a fixed geographic slot (one per metro region).
///
/// Slot ids order lexicographically; every iteration over the record's
/// slot map therefore yields a stable ascending order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider region code as returned by the region resolver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Routing role of a slot within the internal mesh peering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Route reflector: peers with every other node as a client.
    Reflector,
    /// Edge node: peers only with the reflector.
    Edge,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reflector => f.write_str("reflector"),
            Role::Edge => f.write_str("edge"),
        }
    }
}

/// One slot's assignment: fixed identity material plus the mutable
/// physical endpoint.
///
/// Keys and overlay addresses are provisioned out-of-band when the record
/// is seeded and are only ever read and republished here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAssignment {
    pub slot_id: SlotId,
    pub region_code: RegionCode,
    pub overlay_ipv4: Ipv4Addr,
    pub overlay_ipv6: Ipv6Addr,
    pub public_key: String,
    pub private_key: String,
    /// `host:port` of the occupying node, or the `unassigned` sentinel.
    pub endpoint: String,
    pub role: Role,
}

impl NodeAssignment {
    /// Whether a physical node currently occupies this slot.
    pub fn is_assigned(&self) -> bool {
        self.endpoint != UNASSIGNED
    }

    /// Host portion of the recorded endpoint, if the slot is occupied.
    pub fn endpoint_host(&self) -> Option<&str> {
        if !self.is_assigned() {
            return None;
        }
        match self.endpoint.split_once(':') {
            Some((host, _)) => Some(host),
            None => Some(self.endpoint.as_str()),
        }
    }
}
