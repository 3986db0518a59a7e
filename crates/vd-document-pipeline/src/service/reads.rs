//! # Query Service
//!
//! Owner-gated reads returning the merged view: the ledger record
//! (authoritative) plus projection enrichment (advisory). A missing or
//! stale projection row is a reconciliation trigger, not an error; the
//! detail read falls back to the object store's metadata copy and repairs
//! the row in passing.

use crate::error::{DocumentPipelineError, Result};
use crate::ports::{DocumentLedger, DocumentView, ObjectStore, ProjectionStore};
use crate::service::guard::AuthorizationGuard;
use shared_types::{
    Address, DocumentId, DocumentMetadata, DocumentRecord, ProjectionRow,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-side orchestrator.
pub struct DocumentQueryService {
    ledger: Arc<dyn DocumentLedger>,
    object_store: Arc<dyn ObjectStore>,
    projection: Arc<dyn ProjectionStore>,
    guard: AuthorizationGuard,
}

impl DocumentQueryService {
    /// Create a query service over the given collaborators.
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        object_store: Arc<dyn ObjectStore>,
        projection: Arc<dyn ProjectionStore>,
        guard: AuthorizationGuard,
    ) -> Self {
        Self {
            ledger,
            object_store,
            projection,
            guard,
        }
    }

    /// Fetch the merged view of one document. Owner-only.
    pub async fn get_document(
        &self,
        document_id: DocumentId,
        caller: Address,
    ) -> Result<DocumentView> {
        // The ledger record comes first and is authoritative; the
        // ownership check runs against it, never against the projection.
        let record = self
            .ledger
            .get_document(document_id)
            .await
            .map_err(DocumentPipelineError::from)?;
        self.guard.ensure_owner(&record, caller, "read document")?;

        let row = self.find_row(document_id).await;
        let row_is_fresh = row
            .as_ref()
            .is_some_and(|r| r.status == record.status && r.metadata.is_some());

        if let (true, Some(row)) = (row_is_fresh, row.as_ref()) {
            return Ok(DocumentView {
                document_id,
                metadata: row.metadata.clone(),
                analysis: row.analysis.clone(),
                record,
            });
        }

        // Stale or missing row: rebuild from the authoritative stores and
        // repair the cache in passing.
        let metadata = match row.as_ref().and_then(|r| r.metadata.clone()) {
            // Metadata is immutable once stored, so a stale row's copy is
            // still good even when its lifecycle fields are behind.
            Some(metadata) => Some(metadata),
            None => self.fetch_metadata(&record).await,
        };

        let mut repaired = ProjectionRow::from_record(document_id, &record);
        if let Some(metadata) = metadata.clone() {
            repaired = repaired.with_metadata(metadata);
        }
        let analysis = repaired.analysis.clone();
        if let Err(e) = self.projection.upsert(repaired).await {
            warn!(
                document_id = %document_id,
                error = %e,
                "Projection repair failed; will retry on next read"
            );
        } else {
            debug!(document_id = %document_id, "Projection row repaired from ledger");
        }

        Ok(DocumentView {
            document_id,
            metadata,
            analysis,
            record,
        })
    }

    /// Fetch the canonical document bytes. Owner-only.
    pub async fn get_document_content(
        &self,
        document_id: DocumentId,
        caller: Address,
    ) -> Result<Vec<u8>> {
        let record = self
            .ledger
            .get_document(document_id)
            .await
            .map_err(DocumentPipelineError::from)?;
        self.guard
            .ensure_owner(&record, caller, "read document content")?;

        self.object_store
            .get_blob(&record.content_hash)
            .await
            .map_err(DocumentPipelineError::from)
    }

    /// List the merged views of all documents registered to `owner`.
    ///
    /// Enrichment comes from whatever the projection has; a missing row
    /// never fails the listing and is left for the detail read to repair.
    pub async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentView>> {
        let ids = self
            .ledger
            .list_documents(owner)
            .await
            .map_err(DocumentPipelineError::from)?;

        let mut views = Vec::with_capacity(ids.len());
        for document_id in ids {
            let record = self
                .ledger
                .get_document(document_id)
                .await
                .map_err(DocumentPipelineError::from)?;

            let row = self.find_row(document_id).await;
            views.push(DocumentView {
                document_id,
                metadata: row.as_ref().and_then(|r| r.metadata.clone()),
                analysis: row.as_ref().and_then(|r| r.analysis.clone()),
                record,
            });
        }
        Ok(views)
    }

    async fn find_row(&self, document_id: DocumentId) -> Option<ProjectionRow> {
        match self.projection.find(document_id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Projection read failed");
                None
            }
        }
    }

    async fn fetch_metadata(&self, record: &DocumentRecord) -> Option<DocumentMetadata> {
        let value = match self.object_store.get_json(&record.metadata_hash).await {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    metadata_hash = %record.metadata_hash,
                    error = %e,
                    "Metadata fetch failed; returning record without enrichment"
                );
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(
                    metadata_hash = %record.metadata_hash,
                    error = %e,
                    "Stored metadata did not parse"
                );
                None
            }
        }
    }
}
