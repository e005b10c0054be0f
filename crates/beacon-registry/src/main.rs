//! Beacon registry node binary.
//!
//! Serves slot claims, audits, and derived mesh configuration over HTTP.

use beacon_registry::{RegistryConfig, RegistryNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon_registry=info,beacon_assign=info,beacon_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Beacon registry node");

    let config = RegistryConfig::from_env();

    let node = RegistryNode::new(config)?;
    node.run().await?;

    Ok(())
}
