//! Beacon Registry - mesh membership and config service
//!
//! A single-node service in front of the shared topology record. Nodes
//! report their public endpoint to claim their geographic slot; anything
//! in the mesh can then fetch a node's derived tunnel and routing
//! configuration, or ask for a geographic audit of the current
//! assignments.
//!
//! # Architecture
//!
//! - **Node**: env-driven configuration and wiring of store, resolver,
//!   and assignment engine
//! - **API**: HTTP endpoints for claim, resolve, config, audit, status
//! - **Access**: allow-list filtering for the mutating endpoints
//! - **Admin CLI**: offline record work (seed, show, render, audit)
//!   via the `beacon-admin` binary
//!
//! # Example
//!
//! ```no_run
//! use beacon_registry::{RegistryConfig, RegistryNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::from_env();
//!     let node = RegistryNode::new(config)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod api;
pub mod error;
pub mod node;

pub use access::AllowList;
pub use error::{Error, Result};
pub use node::{AppState, RegistryConfig, RegistryNode, ResolverConfig};
