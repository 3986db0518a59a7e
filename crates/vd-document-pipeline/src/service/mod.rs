//! Service layer: the orchestrators over the outbound ports.
//!
//! [`DocumentVerificationService`] is the concrete implementation of the
//! inbound [`DocumentApi`](crate::ports::DocumentApi) port, composed of
//! the ingestion pipeline, the lifecycle manager, and the query service,
//! with a single authorization guard shared between them.

pub mod guard;
pub mod ingestion;
pub mod lifecycle;
pub mod reads;

pub use guard::AuthorizationGuard;
pub use ingestion::{IngestionPipeline, PreparedSubmission};
pub use lifecycle::LifecycleManager;
pub use reads::DocumentQueryService;

use crate::config::PipelineConfig;
use crate::domain::ContentPreparer;
use crate::error::Result;
use crate::ports::{
    AnalysisEngine, DocumentApi, DocumentLedger, DocumentView, ObjectStore, ProjectionStore,
    SubmissionReceipt, SubmissionRequest,
};
use async_trait::async_trait;
use shared_bus::NotificationBus;
use shared_types::{Address, DocumentId};
use std::sync::Arc;

/// Concrete document verification service.
///
/// Wires the content preparer in front of the ingestion pipeline and
/// delegates lifecycle and read operations to their orchestrators. This
/// is the type an upstream transport layer holds.
pub struct DocumentVerificationService {
    preparer: ContentPreparer,
    ingestion: IngestionPipeline,
    lifecycle: LifecycleManager,
    queries: DocumentQueryService,
}

impl DocumentVerificationService {
    /// Create a service over the given collaborators.
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn DocumentLedger>,
        analysis: Arc<dyn AnalysisEngine>,
        projection: Arc<dyn ProjectionStore>,
        bus: Arc<dyn NotificationBus>,
        config: PipelineConfig,
    ) -> Self {
        let guard = AuthorizationGuard::new(Arc::clone(&ledger));
        let preparer = ContentPreparer::from_config(&config);

        let ingestion = IngestionPipeline::new(
            Arc::clone(&object_store),
            Arc::clone(&ledger),
            analysis,
            Arc::clone(&projection),
            Arc::clone(&bus),
            config.clone(),
        );
        let lifecycle = LifecycleManager::new(
            Arc::clone(&ledger),
            Arc::clone(&projection),
            bus,
            guard.clone(),
            config.retry.clone(),
        );
        let queries = DocumentQueryService::new(ledger, object_store, projection, guard);

        Self {
            preparer,
            ingestion,
            lifecycle,
            queries,
        }
    }
}

#[async_trait]
impl DocumentApi for DocumentVerificationService {
    async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionReceipt> {
        // Canonicalize before any external call: bad uploads fail here
        // with zero side effects.
        let original_size = request.raw_bytes.len() as u64;
        let prepared = self
            .preparer
            .prepare(&request.raw_bytes, &request.declared_mime)?;

        self.ingestion
            .submit(PreparedSubmission {
                owner: request.owner,
                document_type: request.document_type,
                prepared,
                declared_mime: request.declared_mime,
                original_name: request.original_name,
                original_size,
                expiry: request.expiry,
            })
            .await
    }

    async fn verify(&self, document_id: DocumentId, issuer: Address) -> Result<()> {
        self.lifecycle.verify(document_id, issuer).await
    }

    async fn reject(&self, document_id: DocumentId, issuer: Address, reason: &str) -> Result<()> {
        self.lifecycle.reject(document_id, issuer, reason).await
    }

    async fn get_document(
        &self,
        document_id: DocumentId,
        caller: Address,
    ) -> Result<DocumentView> {
        self.queries.get_document(document_id, caller).await
    }

    async fn get_document_content(
        &self,
        document_id: DocumentId,
        caller: Address,
    ) -> Result<Vec<u8>> {
        self.queries.get_document_content(document_id, caller).await
    }

    async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentView>> {
        self.queries.list_documents(owner).await
    }
}
