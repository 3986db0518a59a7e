//! Error types for the document pipeline

use crate::ports::{LedgerError, ObjectStoreError};
use shared_types::{Address, DocumentId, DocumentStatus};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, DocumentPipelineError>;

/// Errors surfaced by the document pipeline.
///
/// Commit-critical failures (`StorageUnavailable`, `LedgerUnavailable`)
/// abort the whole operation with no partial success and are the only
/// variants eligible for retry. Everything else is terminal for the call
/// that raised it.
#[derive(Debug, Error)]
pub enum DocumentPipelineError {
    /// Mime type outside the accepted set. Raised before any external call.
    #[error("Unsupported content type: {mime}")]
    UnsupportedContent { mime: String },

    /// Upload exceeds the size cap. Raised before any external call.
    #[error("Content too large: {size} bytes (limit {limit})")]
    ContentTooLarge { size: u64, limit: u64 },

    /// Bytes did not decode as the declared content type.
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Request-level validation failure (e.g. empty rejection reason).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Object store failure on a commit-critical write or read.
    #[error("Object store unavailable: {0}")]
    StorageUnavailable(String),

    /// Ledger failure before the operation committed.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Caller is not the owner, or not a ledger-recognized issuer.
    #[error("Access denied for {address}: {action}")]
    AuthorizationDenied {
        /// Address that attempted the action
        address: Address,
        /// What was attempted
        action: String,
    },

    /// Lifecycle conflict: the document already reached a terminal status.
    #[error("Document {document_id} already finalized as {current}")]
    AlreadyFinalized {
        /// The contested document
        document_id: DocumentId,
        /// Its terminal status at the ledger
        current: DocumentStatus,
    },

    /// Unknown document id.
    #[error("Document not found: {document_id}")]
    NotFound { document_id: DocumentId },

    /// Internal invariant failure (serialization, state corruption).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocumentPipelineError {
    /// Whether the error is transient and the call may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::LedgerUnavailable(_)
        )
    }

    /// Whether the error reports a lifecycle conflict rather than a failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyFinalized { .. })
    }
}

impl From<ObjectStoreError> for DocumentPipelineError {
    fn from(err: ObjectStoreError) -> Self {
        match err {
            ObjectStoreError::Unavailable(message) => Self::StorageUnavailable(message),
            ObjectStoreError::NotFound(hash) => {
                Self::StorageUnavailable(format!("object {hash} missing"))
            }
            ObjectStoreError::Serialization(message) => Self::Internal(message),
        }
    }
}

impl From<LedgerError> for DocumentPipelineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unavailable(message) => Self::LedgerUnavailable(message),
            LedgerError::NotFound(document_id) => Self::NotFound { document_id },
            LedgerError::NotAuthorizedIssuer(address) => Self::AuthorizationDenied {
                address,
                action: "transition document status".to_string(),
            },
            LedgerError::AlreadyFinalized { id, current } => Self::AlreadyFinalized {
                document_id: id,
                current,
            },
            LedgerError::InvalidTarget(target) => {
                Self::Validation(format!("invalid transition target: {target}"))
            }
        }
    }
}
