//! In-memory content-addressed object store.

use crate::ports::{ObjectStore, ObjectStoreError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_types::ContentHash;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory object store addressing content by SHA-256.
///
/// Same input always yields the same identifier, puts are idempotent, and
/// a hash returned by a put is immediately readable. Unreferenced objects
/// (e.g. from submissions that never reached the ledger) simply stay put;
/// content-addressed storage is safe to leave orphans in.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ContentHash, Vec<u8>>>,
}

impl InMemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct objects stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn put(&self, bytes: Vec<u8>) -> ContentHash {
        let hash = hash_bytes(&bytes);
        self.objects.write().unwrap().entry(hash).or_insert(bytes);
        debug!(hash = %hash, "Object stored");
        hash
    }
}

/// SHA-256 of `bytes` as a content identifier.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    ContentHash(hasher.finalize().into())
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_blob(&self, bytes: &[u8]) -> Result<ContentHash, ObjectStoreError> {
        Ok(self.put(bytes.to_vec()))
    }

    async fn put_json(&self, value: &serde_json::Value) -> Result<ContentHash, ObjectStoreError> {
        // serde_json orders map keys, so equal values serialize to equal
        // bytes and hash identically.
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ObjectStoreError::Serialization(e.to_string()))?;
        Ok(self.put(bytes))
    }

    async fn get_blob(&self, hash: &ContentHash) -> Result<Vec<u8>, ObjectStoreError> {
        self.objects
            .read()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or(ObjectStoreError::NotFound(*hash))
    }

    async fn get_json(&self, hash: &ContentHash) -> Result<serde_json::Value, ObjectStoreError> {
        let bytes = self.get_blob(hash).await?;
        serde_json::from_slice(&bytes).map_err(|e| ObjectStoreError::Serialization(e.to_string()))
    }
}
