//! Region resolver boundary.

use async_trait::async_trait;
use beacon_topology::RegionCode;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors from a region resolver backend.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The inventory request could not be completed.
    #[error("inventory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The inventory request exceeded its time budget.
    #[error("inventory request timed out after {0:?}")]
    Timeout(Duration),

    /// The inventory rejected the supplied credential.
    #[error("inventory rejected credentials (status {0})")]
    Unauthorized(u16),
}

/// Maps a physical endpoint host to the provider region hosting it.
///
/// `Ok(None)` means the host is simply not in the inventory; errors mean
/// the question could not be answered at all. The engine folds both into
/// `RegionUndetermined` for claims, so callers can always tell "you are
/// nowhere we know" apart from "your slot is taken".
#[async_trait]
pub trait RegionResolver: Send + Sync {
    async fn region_of(&self, host: &str) -> std::result::Result<Option<RegionCode>, ResolverError>;
}

/// Fixed host-to-region table.
///
/// Used in tests and in deployments where the inventory is known ahead
/// of time and no provider API is reachable.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    table: HashMap<String, RegionCode>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a host-to-region entry.
    pub fn with(mut self, host: impl Into<String>, region: impl Into<String>) -> Self {
        self.table.insert(host.into(), RegionCode::new(region));
        self
    }
}

#[async_trait]
impl RegionResolver for StaticResolver {
    async fn region_of(&self, host: &str) -> std::result::Result<Option<RegionCode>, ResolverError> {
        Ok(self.table.get(host).cloned())
    }
}
