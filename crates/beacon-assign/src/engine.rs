//! Claim, resolve, and audit over the shared topology record.

use crate::error::{Error, Result};
use crate::resolver::RegionResolver;
use beacon_store::{RecordStore, StoreError};
use beacon_topology::{Endpoint, SlotId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    /// A previously open slot now records this endpoint.
    Registered { slot_id: SlotId },
    /// The endpoint already owned a slot; its stored form was refreshed.
    Updated { slot_id: SlotId },
}

impl Assignment {
    pub fn slot_id(&self) -> &SlotId {
        match self {
            Assignment::Registered { slot_id } | Assignment::Updated { slot_id } => slot_id,
        }
    }
}

/// A slot whose recorded endpoint no longer resolves to its own region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    /// Endpoint host that is geographically misplaced.
    pub endpoint: String,
    /// Slot currently holding it.
    pub current_slot: SlotId,
    /// Slot its resolved region actually maps to.
    pub correct_slot: SlotId,
}

/// The slot assignment engine.
///
/// All mutation goes through [`SlotAssigner::claim`], a single
/// read-modify-write cycle against the versioned store. A lost race
/// surfaces as a store conflict and the whole cycle is retried exactly
/// once; there is no other locking, and reads never block writes.
#[derive(Clone)]
pub struct SlotAssigner {
    store: Arc<dyn RecordStore>,
    resolver: Arc<dyn RegionResolver>,
}

impl SlotAssigner {
    pub fn new(store: Arc<dyn RecordStore>, resolver: Arc<dyn RegionResolver>) -> Self {
        Self { store, resolver }
    }

    /// Register the reported endpoint into its geographic slot, or
    /// refresh the slot it already owns.
    ///
    /// Re-claiming the same endpoint always converges to the same slot.
    pub async fn claim(&self, input: &str) -> Result<Assignment> {
        let endpoint = Endpoint::parse(input).map_err(Error::InvalidInput)?;

        match self.try_claim(&endpoint).await {
            Err(Error::Store(StoreError::Conflict { .. })) => {
                debug!(host = endpoint.host(), "claim lost a write race, retrying once");
                self.try_claim(&endpoint).await
            }
            outcome => outcome,
        }
    }

    async fn try_claim(&self, endpoint: &Endpoint) -> Result<Assignment> {
        let (mut record, version) = self.store.load().await?;
        let canonical = endpoint.canonical(record.mesh_params.listen_port);

        // Existing owner: refresh the stored endpoint in place.
        if let Some(assignment) = record
            .slots
            .values_mut()
            .find(|a| a.endpoint_host() == Some(endpoint.host()))
        {
            let slot_id = assignment.slot_id.clone();
            if assignment.endpoint != canonical {
                assignment.endpoint = canonical.clone();
                self.store.store(&record, version).await?;
                info!(%slot_id, endpoint = %canonical, "refreshed slot endpoint");
            }
            return Ok(Assignment::Updated { slot_id });
        }

        // New claim: place the endpoint by its resolved region.
        let host = endpoint.host();
        let region = match self.resolver.region_of(host).await {
            Ok(Some(region)) => region,
            Ok(None) => {
                return Err(Error::RegionUndetermined {
                    host: host.to_string(),
                    reason: "host is not in the inventory".to_string(),
                })
            }
            Err(e) => {
                return Err(Error::RegionUndetermined {
                    host: host.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let slot_id = record
            .slot_for_region(&region)
            .map(|a| a.slot_id.clone())
            .ok_or(Error::UnsupportedRegion { region })?;

        let Some(assignment) = record.slots.get_mut(&slot_id) else {
            return Err(Error::NotFound(slot_id.to_string()));
        };
        if assignment.is_assigned() {
            return Err(Error::SlotOccupied {
                slot_id,
                endpoint: assignment.endpoint.clone(),
            });
        }

        assignment.endpoint = canonical.clone();
        self.store.store(&record, version).await?;
        info!(%slot_id, endpoint = %canonical, "registered endpoint into slot");
        Ok(Assignment::Registered { slot_id })
    }

    /// Look up the slot owning the given endpoint, without mutation.
    pub async fn resolve(&self, input: &str) -> Result<SlotId> {
        let endpoint = Endpoint::parse(input).map_err(Error::InvalidInput)?;
        let (record, _) = self.store.load().await?;

        record
            .slot_owning_host(endpoint.host())
            .map(|a| a.slot_id.clone())
            .ok_or_else(|| Error::NotFound(endpoint.host().to_string()))
    }

    /// Re-resolve every occupied slot's endpoint and report the ones
    /// sitting in the wrong geographic slot.
    ///
    /// Read-only: applying corrections is a separate, deliberate admin
    /// action. Slots whose region cannot currently be determined are
    /// logged and skipped rather than reported as corrections.
    pub async fn audit(&self) -> Result<Vec<Correction>> {
        let (record, _) = self.store.load().await?;
        let mut corrections = Vec::new();

        for assignment in record.occupied() {
            let Some(host) = assignment.endpoint_host() else {
                continue;
            };

            let region = match self.resolver.region_of(host).await {
                Ok(Some(region)) => region,
                Ok(None) => {
                    warn!(host, slot = %assignment.slot_id, "audit: host not in inventory, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(host, slot = %assignment.slot_id, error = %e, "audit: resolver failed, skipping");
                    continue;
                }
            };

            let Some(correct) = record.slot_for_region(&region) else {
                warn!(host, %region, "audit: resolved region has no slot, skipping");
                continue;
            };

            if correct.slot_id != assignment.slot_id {
                corrections.push(Correction {
                    endpoint: host.to_string(),
                    current_slot: assignment.slot_id.clone(),
                    correct_slot: correct.slot_id.clone(),
                });
            }
        }

        Ok(corrections)
    }
}
