//! Failure-injection adapters for exercising degraded-collaborator paths.
//!
//! Used by this crate's service tests and by the workspace integration
//! suite to simulate outages of individual collaborators: object store
//! down, analysis engine down, projection store down, ledger flapping.

use crate::adapters::{InMemoryLedger, InMemoryObjectStore};
use crate::ports::{
    AnalysisEngine, AnalysisError, DocumentLedger, LedgerError, ObjectStore, ObjectStoreError,
    ProjectionError, ProjectionStore,
};
use async_trait::async_trait;
use shared_types::{
    Address, AnalysisReport, ContentHash, DocumentId, DocumentRecord, DocumentStatus, DocumentType,
    ProjectionPatch, ProjectionRow,
};
use std::sync::atomic::{AtomicU32, Ordering};

/// Object store that refuses every operation.
pub struct UnavailableObjectStore;

#[async_trait]
impl ObjectStore for UnavailableObjectStore {
    async fn put_blob(&self, _bytes: &[u8]) -> Result<ContentHash, ObjectStoreError> {
        Err(ObjectStoreError::Unavailable("object store down".to_string()))
    }

    async fn put_json(&self, _value: &serde_json::Value) -> Result<ContentHash, ObjectStoreError> {
        Err(ObjectStoreError::Unavailable("object store down".to_string()))
    }

    async fn get_blob(&self, _hash: &ContentHash) -> Result<Vec<u8>, ObjectStoreError> {
        Err(ObjectStoreError::Unavailable("object store down".to_string()))
    }

    async fn get_json(&self, _hash: &ContentHash) -> Result<serde_json::Value, ObjectStoreError> {
        Err(ObjectStoreError::Unavailable("object store down".to_string()))
    }
}

/// Object store whose writes fail a fixed number of times, then recover.
///
/// Models a transient outage for retry-path tests; reads always work.
pub struct FlakyObjectStore {
    inner: InMemoryObjectStore,
    failures_remaining: AtomicU32,
}

impl FlakyObjectStore {
    /// Fail the first `failures` writes, then behave normally.
    #[must_use]
    pub fn failing_times(failures: u32) -> Self {
        Self {
            inner: InMemoryObjectStore::new(),
            failures_remaining: AtomicU32::new(failures),
        }
    }

    fn should_fail(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ObjectStore for FlakyObjectStore {
    async fn put_blob(&self, bytes: &[u8]) -> Result<ContentHash, ObjectStoreError> {
        if self.should_fail() {
            return Err(ObjectStoreError::Unavailable("transient outage".to_string()));
        }
        self.inner.put_blob(bytes).await
    }

    async fn put_json(&self, value: &serde_json::Value) -> Result<ContentHash, ObjectStoreError> {
        if self.should_fail() {
            return Err(ObjectStoreError::Unavailable("transient outage".to_string()));
        }
        self.inner.put_json(value).await
    }

    async fn get_blob(&self, hash: &ContentHash) -> Result<Vec<u8>, ObjectStoreError> {
        self.inner.get_blob(hash).await
    }

    async fn get_json(&self, hash: &ContentHash) -> Result<serde_json::Value, ObjectStoreError> {
        self.inner.get_json(hash).await
    }
}

/// Analysis engine that always fails.
pub struct UnavailableAnalysisEngine;

#[async_trait]
impl AnalysisEngine for UnavailableAnalysisEngine {
    async fn analyze(
        &self,
        _bytes: &[u8],
        _document_type: DocumentType,
    ) -> Result<AnalysisReport, AnalysisError> {
        Err(AnalysisError::Unavailable("model backend down".to_string()))
    }
}

/// Projection store that refuses every operation.
pub struct FailingProjectionStore;

#[async_trait]
impl ProjectionStore for FailingProjectionStore {
    async fn upsert(&self, _row: ProjectionRow) -> Result<(), ProjectionError> {
        Err(ProjectionError::Unavailable("projection db down".to_string()))
    }

    async fn apply(
        &self,
        _id: DocumentId,
        _patch: ProjectionPatch,
    ) -> Result<(), ProjectionError> {
        Err(ProjectionError::Unavailable("projection db down".to_string()))
    }

    async fn find(&self, _id: DocumentId) -> Result<Option<ProjectionRow>, ProjectionError> {
        Err(ProjectionError::Unavailable("projection db down".to_string()))
    }

    async fn list_by_owner(&self, _owner: Address) -> Result<Vec<ProjectionRow>, ProjectionError> {
        Err(ProjectionError::Unavailable("projection db down".to_string()))
    }
}

/// Ledger whose mutating calls fail a fixed number of times, then recover.
///
/// Reads and authorization checks pass through so that retry tests
/// exercise only the commit-critical paths.
pub struct FlakyLedger {
    inner: InMemoryLedger,
    failures_remaining: AtomicU32,
}

impl FlakyLedger {
    /// Fail the first `failures` mutating calls, then behave normally.
    #[must_use]
    pub fn failing_times(failures: u32, issuers: impl IntoIterator<Item = Address>) -> Self {
        Self {
            inner: InMemoryLedger::with_issuers(issuers),
            failures_remaining: AtomicU32::new(failures),
        }
    }

    fn should_fail(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DocumentLedger for FlakyLedger {
    async fn register(
        &self,
        owner: Address,
        document_type: DocumentType,
        content_hash: ContentHash,
        metadata_hash: ContentHash,
        expiry: u64,
    ) -> Result<DocumentId, LedgerError> {
        if self.should_fail() {
            return Err(LedgerError::Unavailable("transient outage".to_string()));
        }
        self.inner
            .register(owner, document_type, content_hash, metadata_hash, expiry)
            .await
    }

    async fn get_document(&self, id: DocumentId) -> Result<DocumentRecord, LedgerError> {
        self.inner.get_document(id).await
    }

    async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentId>, LedgerError> {
        self.inner.list_documents(owner).await
    }

    async fn is_authorized_issuer(&self, address: Address) -> Result<bool, LedgerError> {
        self.inner.is_authorized_issuer(address).await
    }

    async fn transition(
        &self,
        id: DocumentId,
        target: DocumentStatus,
        actor: Address,
        reason: Option<String>,
    ) -> Result<(), LedgerError> {
        if self.should_fail() {
            return Err(LedgerError::Unavailable("transient outage".to_string()));
        }
        self.inner.transition(id, target, actor, reason).await
    }
}
