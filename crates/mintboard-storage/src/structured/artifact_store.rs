//! Persisted artifact records
//!
//! Implements the registry's `ArtifactStore` on top of redb.

use std::sync::Arc;

use mintboard_registry::{Amount, ArtifactId, ArtifactRecord, ArtifactStore, RegistryError};
use tracing::debug;

use super::tables::{RedbStorage, ARTIFACTS, NEXT_ARTIFACT_ID};
use crate::error::StorageError;

type Result<T> = std::result::Result<T, RegistryError>;

/// Artifact store backed by the `artifacts` table
pub struct RedbArtifactStore {
    storage: Arc<RedbStorage>,
}

impl RedbArtifactStore {
    /// Create a new artifact store
    pub fn new(storage: Arc<RedbStorage>) -> Self {
        Self { storage }
    }

    fn decode(value: &[u8]) -> std::result::Result<ArtifactRecord, StorageError> {
        postcard::from_bytes(value).map_err(|e| StorageError::deserialization(e.to_string()))
    }

    fn encode(record: &ArtifactRecord) -> std::result::Result<Vec<u8>, StorageError> {
        postcard::to_allocvec(record).map_err(|e| StorageError::serialization(e.to_string()))
    }
}

impl ArtifactStore for RedbArtifactStore {
    fn next_id(&self) -> Result<u64> {
        Ok(self.storage.counter(NEXT_ARTIFACT_ID)?)
    }

    fn insert_artifact(&mut self, record: &ArtifactRecord) -> Result<()> {
        let value = Self::encode(record)?;
        self.storage
            .append(ARTIFACTS, NEXT_ARTIFACT_ID, record.id.value(), &value)?;
        debug!(artifact_id = %record.id, "Stored artifact record");
        Ok(())
    }

    fn get_artifact(&self, id: ArtifactId) -> Result<Option<ArtifactRecord>> {
        match self.storage.get(ARTIFACTS, id.value())? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    fn set_total_donations(&mut self, id: ArtifactId, total: Amount) -> Result<()> {
        let mut record = self
            .get_artifact(id)?
            .ok_or(RegistryError::ArtifactNotFound(id))?;
        record.total_donations = total;

        let value = Self::encode(&record)?;
        self.storage.replace(ARTIFACTS, id.value(), &value)?;
        debug!(artifact_id = %id, total = %total, "Updated donation total");
        Ok(())
    }

    fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>> {
        let entries = self.storage.scan(ARTIFACTS)?;
        let mut records = Vec::with_capacity(entries.len());

        for value in entries {
            records.push(Self::decode(&value)?);
        }

        Ok(records)
    }
}
