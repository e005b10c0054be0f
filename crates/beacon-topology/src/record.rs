//! The topology record document.

use crate::error::{Error, Result};
use crate::slot::{NodeAssignment, RegionCode, Role, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mesh-wide overlay tunnel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshParams {
    /// UDP port every node's tunnel listens on.
    pub listen_port: u16,
    /// Persistent keepalive interval for tunnel peers.
    pub keepalive_seconds: u16,
}

/// Mesh-wide routing-daemon settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingParams {
    /// Our autonomous system number.
    pub local_asn: u32,
    /// The upstream provider's autonomous system number.
    pub upstream_asn: u32,
    /// Provider route-server neighbors.
    pub upstream_ipv4_neighbor: String,
    pub upstream_ipv6_neighbor: String,
    /// eBGP multihop distance to the route servers.
    pub upstream_multihop: u8,
    /// Prefixes announced by every node.
    pub announced_ipv4: String,
    pub announced_ipv6: String,
}

/// Descriptive service metadata. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

/// The single shared topology document.
///
/// `slots` is a `BTreeMap` so every traversal is in ascending slot-id
/// order, which keeps derived peer lists and rendered documents
/// byte-identical across repeated reads of the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyRecord {
    pub slots: BTreeMap<SlotId, NodeAssignment>,
    pub mesh_params: MeshParams,
    pub routing_params: RoutingParams,
    pub service_info: ServiceInfo,
}

impl TopologyRecord {
    /// Check every structural invariant of the record.
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(Error::EmptyTopology);
        }

        for (key, assignment) in &self.slots {
            if *key != assignment.slot_id {
                return Err(Error::SlotKeyMismatch {
                    key: key.clone(),
                    actual: assignment.slot_id.clone(),
                });
            }
        }

        let mut seen_hosts: BTreeMap<&str, &SlotId> = BTreeMap::new();
        for assignment in self.slots.values() {
            if let Some(host) = assignment.endpoint_host() {
                if let Some(first) = seen_hosts.insert(host, &assignment.slot_id) {
                    return Err(Error::DuplicateEndpointHost {
                        host: host.to_string(),
                        first: first.clone(),
                        second: assignment.slot_id.clone(),
                    });
                }
            }
        }

        let mut seen_regions: BTreeMap<&RegionCode, &SlotId> = BTreeMap::new();
        for assignment in self.slots.values() {
            if let Some(first) = seen_regions.insert(&assignment.region_code, &assignment.slot_id) {
                return Err(Error::DuplicateRegion {
                    region: assignment.region_code.clone(),
                    first: first.clone(),
                    second: assignment.slot_id.clone(),
                });
            }
        }

        let reflectors = self
            .slots
            .values()
            .filter(|a| a.role == Role::Reflector)
            .count();
        if reflectors != 1 {
            return Err(Error::ReflectorCount(reflectors));
        }

        Ok(())
    }

    /// The fixed region-to-slot table, derived from per-slot region codes.
    pub fn slot_for_region(&self, region: &RegionCode) -> Option<&NodeAssignment> {
        self.slots.values().find(|a| a.region_code == *region)
    }

    /// The slot currently owning the given endpoint host, if any.
    pub fn slot_owning_host(&self, host: &str) -> Option<&NodeAssignment> {
        self.slots.values().find(|a| a.endpoint_host() == Some(host))
    }

    /// The single reflector slot.
    pub fn reflector(&self) -> Option<&NodeAssignment> {
        self.slots.values().find(|a| a.role == Role::Reflector)
    }

    /// All currently occupied slots, in ascending slot-id order.
    pub fn occupied(&self) -> impl Iterator<Item = &NodeAssignment> {
        self.slots.values().filter(|a| a.is_assigned())
    }
}
