//! Error types for the registry node.

use thiserror::Error;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while wiring or running the registry node.
#[derive(Debug, Error)]
pub enum Error {
    /// Record store failure.
    #[error("storage error: {0}")]
    Store(#[from] beacon_store::StoreError),

    /// Region resolver could not be constructed.
    #[error("resolver setup failed: {0}")]
    Resolver(#[from] beacon_assign::ResolverError),

    /// Assignment engine failure.
    #[error(transparent)]
    Assign(#[from] beacon_assign::Error),

    /// Config derivation failure.
    #[error(transparent)]
    Render(#[from] beacon_render::Error),

    /// Filesystem or network error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
