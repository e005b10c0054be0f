//! Registry node - configuration and component wiring.

use crate::access::AllowList;
use crate::api;
use crate::error::Result;
use beacon_assign::{
    InventoryResolver, RegionResolver, SlotAssigner, StaticResolver, DEFAULT_RESOLVER_TIMEOUT,
};
use beacon_store::{FileStore, RecordStore};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where region lookups come from.
#[derive(Debug, Clone)]
pub enum ResolverConfig {
    /// The provider's instance inventory API.
    Inventory {
        base_url: String,
        credential: String,
        timeout: Duration,
    },
    /// A fixed host-to-region table.
    Static { table: Vec<(String, String)> },
}

impl ResolverConfig {
    /// Read the resolver configuration from environment variables.
    pub fn from_env() -> Self {
        match std::env::var("BEACON_REGION_SOURCE").as_deref() {
            Ok("static") => {
                let table = std::env::var("BEACON_REGION_TABLE")
                    .map(|raw| parse_region_table(&raw))
                    .unwrap_or_default();
                ResolverConfig::Static { table }
            }
            _ => ResolverConfig::Inventory {
                base_url: std::env::var("BEACON_INVENTORY_URL")
                    .expect("BEACON_INVENTORY_URL must be set for the inventory region source"),
                credential: std::env::var("BEACON_INVENTORY_TOKEN")
                    .expect("BEACON_INVENTORY_TOKEN must be set for the inventory region source"),
                timeout: std::env::var("BEACON_RESOLVER_TIMEOUT_SECS")
                    .ok()
                    .map(|s| {
                        Duration::from_secs(
                            s.parse().expect("Invalid BEACON_RESOLVER_TIMEOUT_SECS"),
                        )
                    })
                    .unwrap_or(DEFAULT_RESOLVER_TIMEOUT),
            },
        }
    }

    /// Build the resolver this configuration describes.
    pub fn build(&self) -> Result<Arc<dyn RegionResolver>> {
        match self {
            ResolverConfig::Inventory {
                base_url,
                credential,
                timeout,
            } => Ok(Arc::new(InventoryResolver::new(
                base_url.clone(),
                credential.clone(),
                *timeout,
            )?)),
            ResolverConfig::Static { table } => {
                let mut resolver = StaticResolver::new();
                for (host, region) in table {
                    resolver = resolver.with(host.clone(), region.clone());
                }
                Ok(Arc::new(resolver))
            }
        }
    }
}

/// `host=region,host=region` pairs.
fn parse_region_table(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (host, region) = entry
                .split_once('=')
                .expect("Invalid BEACON_REGION_TABLE entry, expected host=region");
            (host.trim().to_string(), region.trim().to_string())
        })
        .collect()
}

/// Configuration for a registry node.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Path of the seeded topology record
    pub record_path: PathBuf,

    /// Callers permitted to claim and audit
    pub allowed_callers: Vec<IpAddr>,

    /// Region resolver backend
    pub resolver: ResolverConfig,
}

impl RegistryConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// The allow-list defaults to loopback only, so a fresh node accepts
    /// claims solely from local callers until deployment supplies the
    /// mesh addresses.
    pub fn from_env() -> Self {
        let api_addr = std::env::var("BEACON_API_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid BEACON_API_ADDR");

        let record_path = std::env::var("BEACON_RECORD_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./beacon-data/topology.json"));

        let allowed_callers = std::env::var("BEACON_ALLOWED_CALLERS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| p.parse().expect("Invalid BEACON_ALLOWED_CALLERS entry"))
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                    IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
                ]
            });

        Self {
            api_addr,
            record_path,
            allowed_callers,
            resolver: ResolverConfig::from_env(),
        }
    }
}

/// Shared state for the registry node - one store and one assignment
/// engine shared by every handler.
pub struct AppState {
    pub assigner: SlotAssigner,
    pub store: Arc<dyn RecordStore>,
    pub allowed: AllowList,
}

/// A registry node instance.
pub struct RegistryNode {
    state: Arc<AppState>,
    config: RegistryConfig,
}

impl std::fmt::Debug for RegistryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryNode")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RegistryNode {
    /// Wire up a node against the seeded record file.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let store: Arc<dyn RecordStore> = Arc::new(FileStore::open(&config.record_path)?);
        let resolver = config.resolver.build()?;
        let assigner = SlotAssigner::new(Arc::clone(&store), resolver);

        let state = Arc::new(AppState {
            assigner,
            store,
            allowed: AllowList::new(config.allowed_callers.iter().copied()),
        });

        Ok(Self { state, config })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the HTTP service until shutdown.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Beacon registry starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Record: {}", self.config.record_path.display());
        tracing::info!("  Allowed callers: {}", self.state.allowed.len());

        let app = api::build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", self.config.api_addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
