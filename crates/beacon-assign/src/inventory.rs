//! Region resolver backed by the provider's instance inventory API.

use crate::resolver::{RegionResolver, ResolverError};
use async_trait::async_trait;
use beacon_topology::RegionCode;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default bound on a single inventory request.
///
/// Expiry is treated as failure, not retried; retry policy belongs to
/// the caller of the claim operation.
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolver that lists the provider's instances and matches the host
/// against each instance's main address.
///
/// The credential is supplied by deployment configuration and passed
/// through as a bearer token; nothing is compiled in.
pub struct InventoryResolver {
    client: reqwest::Client,
    base_url: String,
    credential: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct InstanceList {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Debug, Deserialize)]
struct Instance {
    #[serde(default)]
    main_ip: String,
    #[serde(default)]
    v6_main_ip: String,
    region: String,
}

impl InventoryResolver {
    /// Build a resolver against `base_url` (e.g. the provider API root)
    /// with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        credential: impl Into<String>,
        timeout: Duration,
    ) -> std::result::Result<Self, ResolverError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            credential: credential.into(),
            timeout,
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> ResolverError {
        if e.is_timeout() {
            ResolverError::Timeout(self.timeout)
        } else {
            ResolverError::Transport(e)
        }
    }
}

#[async_trait]
impl RegionResolver for InventoryResolver {
    async fn region_of(&self, host: &str) -> std::result::Result<Option<RegionCode>, ResolverError> {
        let url = format!("{}/v2/instances", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.credential)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ResolverError::Unauthorized(status.as_u16()));
        }

        let list: InstanceList = response
            .error_for_status()
            .map_err(|e| self.map_transport(e))?
            .json()
            .await
            .map_err(|e| self.map_transport(e))?;

        let region = list
            .instances
            .into_iter()
            .find(|i| i.main_ip == host || i.v6_main_ip == host)
            .map(|i| RegionCode::new(i.region));

        debug!(host, ?region, "inventory lookup");
        Ok(region)
    }
}
