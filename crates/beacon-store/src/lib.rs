//! Versioned storage for the Beacon topology record.
//!
//! The record is a single small document mutated by read-modify-write
//! cycles. Instead of a global lock, every load returns a [`Version`]
//! token and every store requires the token it read; a stale token fails
//! with [`StoreError::Conflict`] and the caller retries the whole cycle.
//! Writers never leave a partial document behind: the file-backed store
//! replaces the document atomically, so concurrent readers always see a
//! consistent snapshot.
//!
//! Two implementations:
//!
//! - [`MemoryStore`] - in-process, for tests and embedded use
//! - [`FileStore`] - JSON document on disk, seeded once at deployment

mod error;
mod file;
mod memory;

use async_trait::async_trait;
use beacon_topology::TopologyRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Opaque optimistic-concurrency token. Monotonically increasing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version of a freshly seeded record.
    pub const INITIAL: Self = Self(0);

    /// Reconstruct a token from its raw value. Store implementations
    /// use this when reading a persisted version back in.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The token a successful store advances to.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage boundary for the shared topology record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the current record and its version token.
    async fn load(&self) -> Result<(TopologyRecord, Version)>;

    /// Replace the record. `expected` must be the token returned by the
    /// `load` that started this read-modify-write cycle; a stale token
    /// fails with [`StoreError::Conflict`] and leaves the stored record
    /// untouched.
    async fn store(&self, record: &TopologyRecord, expected: Version) -> Result<Version>;
}
