//! Beacon Mesh Config Deriver
//!
//! Turns the shared topology record into the materialised configuration
//! one node needs to join the mesh: its tunnel interface plus the full
//! peer list, and the routing-daemon fragments for its role.
//!
//! # Determinism
//!
//! Rendering is a pure function of the record. Peers appear in ascending
//! slot-id order and every text document is rebuilt from typed values,
//! so repeated renders of the same record are byte-identical - redeploys
//! diff clean, and tests can compare whole documents.
//!
//! # Unassigned peers
//!
//! A slot nobody has claimed yet still renders as a peer carrying the
//! `unassigned` sentinel endpoint. Omitting it instead would give each
//! node a different view of the overlay's allowed addresses; the
//! consuming daemon treats the sentinel as "no route yet".

mod config;
mod error;
mod fragments;

pub use config::{
    render_node_config, ConfigFile, InterfaceConfig, NodeConfig, PeerConfig, RoutingFragments,
};
pub use error::{Error, Result};
