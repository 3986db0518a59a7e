//! # Outbound Ports (Driven Ports)
//!
//! Contracts the pipeline requires from its collaborators. Each
//! collaborator fails independently; the error enums here carry just
//! enough structure for the services to classify a failure as transient,
//! a conflict, or terminal.

use async_trait::async_trait;
use shared_types::{
    Address, AnalysisReport, ContentHash, DocumentId, DocumentRecord, DocumentStatus, DocumentType,
    ProjectionPatch, ProjectionRow,
};
use thiserror::Error;

/// Content-addressed storage for document bytes and metadata JSON.
///
/// Same input always yields the same identifier, and an identifier
/// returned by a put is immediately readable.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store raw bytes, returning their content identifier.
    async fn put_blob(&self, bytes: &[u8]) -> Result<ContentHash, ObjectStoreError>;

    /// Store a JSON value, returning the content identifier of its
    /// canonical serialization.
    async fn put_json(&self, value: &serde_json::Value) -> Result<ContentHash, ObjectStoreError>;

    /// Fetch raw bytes by content identifier.
    async fn get_blob(&self, hash: &ContentHash) -> Result<Vec<u8>, ObjectStoreError>;

    /// Fetch and parse a JSON value by content identifier.
    async fn get_json(&self, hash: &ContentHash) -> Result<serde_json::Value, ObjectStoreError>;
}

/// The append-only authoritative store of document existence, ownership,
/// content identifiers, expiry, and lifecycle status.
///
/// The ledger is the final authority on issuer authorization and the sole
/// arbiter of lifecycle transitions: for concurrent transition attempts on
/// one document it accepts exactly one and rejects the rest.
#[async_trait]
pub trait DocumentLedger: Send + Sync {
    /// Register a new document. This is the birth event: the returned id
    /// is the first externally observable trace of the document.
    async fn register(
        &self,
        owner: Address,
        document_type: DocumentType,
        content_hash: ContentHash,
        metadata_hash: ContentHash,
        expiry: u64,
    ) -> Result<DocumentId, LedgerError>;

    /// Read the authoritative record for a document.
    async fn get_document(&self, id: DocumentId) -> Result<DocumentRecord, LedgerError>;

    /// List the document ids registered to an owner.
    async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentId>, LedgerError>;

    /// Whether the ledger currently recognizes `address` as an authorized
    /// issuer. Callers must not cache the answer; revocation takes effect
    /// immediately.
    async fn is_authorized_issuer(&self, address: Address) -> Result<bool, LedgerError>;

    /// Transition a document's status, compare-and-set on the current
    /// status. Fails with [`LedgerError::AlreadyFinalized`] when the
    /// document is no longer pending, and with
    /// [`LedgerError::NotAuthorizedIssuer`] for unrecognized actors.
    async fn transition(
        &self,
        id: DocumentId,
        target: DocumentStatus,
        actor: Address,
        reason: Option<String>,
    ) -> Result<(), LedgerError>;
}

/// Document analysis engine. May be slow or unavailable; callers bound it
/// with a timeout and treat its output as optional enrichment.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Analyze prepared content declared as `document_type`.
    async fn analyze(
        &self,
        bytes: &[u8],
        document_type: DocumentType,
    ) -> Result<AnalysisReport, AnalysisError>;
}

/// Fast-read projection of ledger state, keyed by document id.
///
/// Writes must be idempotent so duplicate or out-of-order reconciliation
/// attempts converge; the store never holds the authoritative copy.
#[async_trait]
pub trait ProjectionStore: Send + Sync {
    /// Insert or replace the row for a document.
    async fn upsert(&self, row: ProjectionRow) -> Result<(), ProjectionError>;

    /// Apply a partial update to an existing row. Applying to a missing
    /// row is not an error: the row is repaired from the ledger on the
    /// next read.
    async fn apply(&self, id: DocumentId, patch: ProjectionPatch) -> Result<(), ProjectionError>;

    /// Fetch a row, if present.
    async fn find(&self, id: DocumentId) -> Result<Option<ProjectionRow>, ProjectionError>;

    /// List rows for an owner.
    async fn list_by_owner(&self, owner: Address) -> Result<Vec<ProjectionRow>, ProjectionError>;
}

/// Object store operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObjectStoreError {
    /// Store unreachable or write failed; safe to retry.
    #[error("Object store unavailable: {0}")]
    Unavailable(String),

    /// No object stored under this identifier.
    #[error("Object not found: {0}")]
    NotFound(ContentHash),

    /// Value could not be serialized or parsed as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Ledger operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Ledger unreachable before the operation committed; safe to retry.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// Unknown document id.
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Actor is not a recognized issuer at call time.
    #[error("Not an authorized issuer: {0}")]
    NotAuthorizedIssuer(Address),

    /// Compare-and-set lost: the document already reached a terminal
    /// status. Never retried; by definition the transition is no longer
    /// valid.
    #[error("Document {id} already finalized as {current}")]
    AlreadyFinalized {
        id: DocumentId,
        current: DocumentStatus,
    },

    /// The requested target is not a valid transition target.
    #[error("Invalid transition target: {0}")]
    InvalidTarget(DocumentStatus),
}

/// Analysis engine errors. Swallowed by the pipeline: enrichment never
/// blocks registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Engine unreachable or failed.
    #[error("Analysis engine unavailable: {0}")]
    Unavailable(String),

    /// Engine gave no answer within the caller's budget.
    #[error("Analysis timed out")]
    Timeout,
}

/// Projection store errors. Non-fatal to callers: a failed write is a
/// staleness condition reconciled on a later read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// Store unreachable or write failed.
    #[error("Projection store unavailable: {0}")]
    Unavailable(String),
}
