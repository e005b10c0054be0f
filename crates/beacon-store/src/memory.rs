//! In-process record store.

use crate::error::{Result, StoreError};
use crate::{RecordStore, Version};
use async_trait::async_trait;
use beacon_topology::TopologyRecord;
use tokio::sync::RwLock;

/// In-memory store for tests and embedded use.
pub struct MemoryStore {
    inner: RwLock<(TopologyRecord, Version)>,
}

impl MemoryStore {
    /// Create a store seeded with the given record.
    pub fn new(record: TopologyRecord) -> Result<Self> {
        record.validate()?;
        Ok(Self {
            inner: RwLock::new((record, Version::INITIAL)),
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<(TopologyRecord, Version)> {
        let guard = self.inner.read().await;
        Ok((guard.0.clone(), guard.1))
    }

    async fn store(&self, record: &TopologyRecord, expected: Version) -> Result<Version> {
        record.validate()?;
        let mut guard = self.inner.write().await;
        if guard.1 != expected {
            return Err(StoreError::Conflict {
                expected,
                actual: guard.1,
            });
        }
        guard.0 = record.clone();
        guard.1 = guard.1.next();
        Ok(guard.1)
    }
}
