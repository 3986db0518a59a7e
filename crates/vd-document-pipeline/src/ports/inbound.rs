//! Inbound ports (driving side - API)
//!
//! The surface an upstream transport layer consumes. Ownership and issuer
//! authorization are enforced here, inside the core, not left to the
//! transport.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    Address, AnalysisReport, ContentHash, DocumentId, DocumentMetadata, DocumentRecord,
    DocumentType,
};

/// Primary port: the document verification service
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Submit a new document for verification.
    ///
    /// On success the document exists on the ledger with status pending;
    /// on a commit-critical error no id is ever observable for this
    /// submission and the caller may safely retry.
    async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionReceipt>;

    /// Mark a pending document verified. `issuer` must be recognized by
    /// the ledger at call time.
    async fn verify(&self, document_id: DocumentId, issuer: Address) -> Result<()>;

    /// Mark a pending document rejected with a non-empty reason.
    async fn reject(&self, document_id: DocumentId, issuer: Address, reason: &str) -> Result<()>;

    /// Fetch the merged view of a document. Owner-only.
    async fn get_document(&self, document_id: DocumentId, caller: Address)
        -> Result<DocumentView>;

    /// Fetch the canonical document bytes. Owner-only.
    async fn get_document_content(
        &self,
        document_id: DocumentId,
        caller: Address,
    ) -> Result<Vec<u8>>;

    /// List the merged views of all documents registered to `owner`.
    async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentView>>;
}

/// A raw submission as received from the upstream layer.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// The submitting citizen.
    pub owner: Address,
    /// Declared document category.
    pub document_type: DocumentType,
    /// Raw upload bytes, unprepared.
    pub raw_bytes: Vec<u8>,
    /// Declared mime type of the upload.
    pub declared_mime: String,
    /// Original filename, when the upstream layer knows it.
    pub original_name: Option<String>,
    /// Requested expiry; `None` means the document never expires.
    pub expiry: Option<DateTime<Utc>>,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Ledger-assigned id; the document's birth certificate.
    pub document_id: DocumentId,
    /// Content identifier of the canonicalized bytes.
    pub content_hash: ContentHash,
    /// Analysis summary, when the engine answered in time.
    pub analysis_summary: Option<String>,
}

/// Merged read model: the authoritative ledger record plus projection
/// enrichment, which may be absent while the projection catches up.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    pub document_id: DocumentId,
    /// The ledger's record; authoritative for ownership and status.
    pub record: DocumentRecord,
    /// Metadata copy, when the projection (or lazy repair) supplied it.
    pub metadata: Option<DocumentMetadata>,
    /// Analysis copy, when available.
    pub analysis: Option<AnalysisReport>,
}
