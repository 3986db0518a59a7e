//! # Ingestion Pipeline
//!
//! Orchestrates "submit a new document" across the object store, the
//! analysis engine, the ledger, the projection, and the notification bus.
//!
//! The ledger registration is the commit point. Everything before it is
//! abortable with no externally visible state beyond orphaned
//! content-addressed blobs; everything after it degrades gracefully
//! because the document already durably exists.
//!
//! ```text
//! prepared bytes ──put_blob──→ content_hash
//!                 ──analyze──→ analysis        (best-effort, bounded)
//!                 ──put_json──→ metadata_hash
//!                 ──register──→ document_id    ◄── commit point
//!                 ──upsert────→ projection     (non-fatal)
//!                 ──publish───→ owner topic    (fire-and-forget)
//! ```

use crate::config::PipelineConfig;
use crate::domain::PreparedContent;
use crate::error::{DocumentPipelineError, Result};
use crate::ports::{
    AnalysisEngine, DocumentLedger, ObjectStore, ProjectionStore, SubmissionReceipt,
};
use crate::retry::with_retry;
use chrono::{DateTime, Utc};
use shared_bus::{DocumentEvent, NotificationBus};
use shared_types::{
    Address, AnalysisReport, DocumentMetadata, DocumentStatus, DocumentType, ProjectionRow,
    NO_EXPIRY,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A submission whose content has already been canonicalized.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub owner: Address,
    pub document_type: DocumentType,
    /// Canonical bytes destined for content-addressed storage.
    pub prepared: PreparedContent,
    /// Mime type declared for the raw upload, recorded in metadata.
    pub declared_mime: String,
    /// Original filename, when known.
    pub original_name: Option<String>,
    /// Raw upload size in bytes, recorded in metadata.
    pub original_size: u64,
    /// Requested expiry; `None` means the document never expires.
    pub expiry: Option<DateTime<Utc>>,
}

/// Orchestrator for document submission.
pub struct IngestionPipeline {
    object_store: Arc<dyn ObjectStore>,
    ledger: Arc<dyn DocumentLedger>,
    analysis: Arc<dyn AnalysisEngine>,
    projection: Arc<dyn ProjectionStore>,
    bus: Arc<dyn NotificationBus>,
    config: PipelineConfig,
}

impl IngestionPipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn DocumentLedger>,
        analysis: Arc<dyn AnalysisEngine>,
        projection: Arc<dyn ProjectionStore>,
        bus: Arc<dyn NotificationBus>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            object_store,
            ledger,
            analysis,
            projection,
            bus,
            config,
        }
    }

    /// Submit a prepared document.
    ///
    /// Succeeds if and only if the ledger registration succeeded; a
    /// commit-critical failure before that point surfaces with no id ever
    /// observable, so the caller may safely retry the whole submission.
    pub async fn submit(&self, submission: PreparedSubmission) -> Result<SubmissionReceipt> {
        let PreparedSubmission {
            owner,
            document_type,
            prepared,
            declared_mime,
            original_name,
            original_size,
            expiry,
        } = submission;

        let expiry_ts = expiry_to_epoch(expiry)?;
        let object_store = self.object_store.as_ref();

        // Store the canonical bytes. Registration needs the resulting
        // hash, so this strictly precedes it.
        let bytes = prepared.bytes.as_slice();
        let content_hash = with_retry(&self.config.retry, "object_store.put_blob", || async move {
            object_store.put_blob(bytes).await.map_err(Into::into)
        })
        .await?;
        debug!(owner = %owner, content_hash = %content_hash, "Document bytes stored");

        // Enrichment is optional: a missing analysis must never block
        // registration of a legal document.
        let analysis = self.run_analysis(&prepared.bytes, document_type).await;
        let analysis_summary = analysis.as_ref().map(|report| report.summary.clone());

        let metadata = DocumentMetadata {
            original_name,
            mime_type: declared_mime,
            original_size,
            uploaded_at: Utc::now(),
            document_type,
            analysis,
        };
        let metadata_value = serde_json::to_value(&metadata)
            .map_err(|e| DocumentPipelineError::Internal(e.to_string()))?;
        let metadata_ref = &metadata_value;
        let metadata_hash = with_retry(&self.config.retry, "object_store.put_json", || async move {
            object_store.put_json(metadata_ref).await.map_err(Into::into)
        })
        .await?;

        // The commit point. On failure the two blobs above stay orphaned,
        // which content-addressed storage tolerates; no compensating
        // delete.
        let ledger = self.ledger.as_ref();
        let document_id = with_retry(&self.config.retry, "ledger.register", || async move {
            ledger
                .register(owner, document_type, content_hash, metadata_hash, expiry_ts)
                .await
                .map_err(Into::into)
        })
        .await?;
        info!(
            document_id = %document_id,
            owner = %owner,
            document_type = %document_type,
            "Document registered"
        );

        // Derived state only from here on: the document already exists.
        let row = ProjectionRow {
            document_id,
            owner,
            document_type,
            status: DocumentStatus::Pending,
            content_hash,
            metadata_hash,
            expiry: expiry_ts,
            analysis: metadata.analysis.clone(),
            metadata: Some(metadata),
            verified_by: None,
            verified_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            updated_at: Utc::now(),
        };
        if let Err(e) = self.projection.upsert(row).await {
            warn!(
                document_id = %document_id,
                error = %e,
                "Projection write failed; row will be repaired on read"
            );
        }

        self.bus
            .publish(DocumentEvent::DocumentUploaded {
                correlation_id: uuid::Uuid::new_v4().to_string(),
                owner,
                document_id,
                document_type,
                status: DocumentStatus::Pending,
            })
            .await;

        Ok(SubmissionReceipt {
            document_id,
            content_hash,
            analysis_summary,
        })
    }

    async fn run_analysis(
        &self,
        bytes: &[u8],
        document_type: DocumentType,
    ) -> Option<AnalysisReport> {
        let budget = self.config.analysis_timeout();
        match tokio::time::timeout(budget, self.analysis.analyze(bytes, document_type)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                warn!(error = %e, "Analysis failed; registering without enrichment");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.analysis_timeout_ms,
                    "Analysis timed out; registering without enrichment"
                );
                None
            }
        }
    }
}

fn expiry_to_epoch(expiry: Option<DateTime<Utc>>) -> Result<u64> {
    match expiry {
        None => Ok(NO_EXPIRY),
        Some(at) => u64::try_from(at.timestamp())
            .map_err(|_| DocumentPipelineError::Validation("expiry predates the epoch".to_string())),
    }
}
