//! File-backed record store with atomic replacement.

use crate::error::{Result, StoreError};
use crate::{RecordStore, Version};
use async_trait::async_trait;
use beacon_topology::TopologyRecord;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

/// On-disk envelope wrapping the record with its version token.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: Version,
    record: TopologyRecord,
}

/// Single-document JSON store.
///
/// Writes go to a temp file in the same directory followed by an atomic
/// rename, so a reader never observes a half-written document and a
/// failed write leaves the previous record intact. The version check and
/// replacement happen under a writer mutex; plain reads take no lock.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileStore {
    /// Create the record file at deployment time.
    ///
    /// Fails with [`StoreError::AlreadySeeded`] if a record already
    /// exists - the record is created exactly once and only mutated
    /// through [`RecordStore::store`] afterwards.
    pub fn seed(path: impl Into<PathBuf>, record: TopologyRecord) -> Result<Self> {
        let path = path.into();
        record.validate()?;
        if path.exists() {
            return Err(StoreError::AlreadySeeded(path));
        }

        let store = Self {
            path,
            write_guard: Mutex::new(()),
        };
        store.write_envelope(&Envelope {
            version: Version::INITIAL,
            record,
        })?;
        debug!(path = %store.path.display(), "seeded topology record");
        Ok(store)
    }

    /// Open an existing record file, verifying it parses and validates.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        };
        store.read_envelope()?;
        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_envelope(&self) -> Result<Envelope> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotSeeded(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        envelope.record.validate()?;
        Ok(envelope)
    }

    fn write_envelope(&self, envelope: &Envelope) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, envelope)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn load(&self) -> Result<(TopologyRecord, Version)> {
        let envelope = self.read_envelope()?;
        Ok((envelope.record, envelope.version))
    }

    async fn store(&self, record: &TopologyRecord, expected: Version) -> Result<Version> {
        record.validate()?;
        let _guard = self.write_guard.lock().await;

        let current = self.read_envelope()?;
        if current.version != expected {
            return Err(StoreError::Conflict {
                expected,
                actual: current.version,
            });
        }

        let next = expected.next();
        self.write_envelope(&Envelope {
            version: next,
            record: record.clone(),
        })?;
        debug!(version = %next, "stored topology record");
        Ok(next)
    }
}
