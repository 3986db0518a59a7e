//! # Projection Row and Patch
//!
//! The denormalized row kept by the fast-read projection store, and the
//! partial patch applied on lifecycle transitions.
//!
//! The projection is advisory: the ledger's [`DocumentRecord`] is
//! authoritative on every read, and a stale or missing row is a staleness
//! condition, never corruption. Patches are idempotent and convergent so
//! that duplicate or out-of-order reconciliation attempts settle on the
//! same final row.

use crate::entities::{Address, ContentHash, DocumentId, DocumentRecord, DocumentStatus, DocumentType};
use crate::metadata::{AnalysisReport, DocumentMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Denormalized cache row keyed by ledger-assigned document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub document_id: DocumentId,
    pub owner: Address,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
    pub content_hash: ContentHash,
    pub metadata_hash: ContentHash,
    /// Expiry epoch seconds; zero means "never expires".
    pub expiry: u64,
    /// Full metadata copy for detail reads without an object-store hit.
    pub metadata: Option<DocumentMetadata>,
    /// Analysis copy for list/detail reads.
    pub analysis: Option<AnalysisReport>,
    pub verified_by: Option<Address>,
    pub verified_at: Option<u64>,
    pub rejected_by: Option<Address>,
    pub rejected_at: Option<u64>,
    pub rejection_reason: Option<String>,
    /// Last write time of this row.
    pub updated_at: DateTime<Utc>,
}

impl ProjectionRow {
    /// Derive a fresh row from the ledger's record.
    #[must_use]
    pub fn from_record(id: DocumentId, record: &DocumentRecord) -> Self {
        Self {
            document_id: id,
            owner: record.owner,
            document_type: record.document_type,
            status: record.status,
            content_hash: record.content_hash,
            metadata_hash: record.metadata_hash,
            expiry: record.expiry,
            metadata: None,
            analysis: None,
            verified_by: record.verified_by,
            verified_at: record.verified_at,
            rejected_by: record.rejected_by,
            rejected_at: record.rejected_at,
            rejection_reason: record.rejection_reason.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Attach the metadata copy (and its embedded analysis) to the row.
    #[must_use]
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.analysis = metadata.analysis.clone();
        self.metadata = Some(metadata);
        self
    }

    /// Apply a partial update in place.
    ///
    /// Convergence rule: a terminal status is never downgraded. A stale
    /// patch carrying `Pending` (or nothing) against a finalized row leaves
    /// the lifecycle fields untouched, so replayed reconciliation attempts
    /// cannot un-finalize a document.
    pub fn apply(&mut self, patch: ProjectionPatch) {
        if let Some(status) = patch.status {
            let downgrade = self.status.is_terminal() && !status.is_terminal();
            if !downgrade {
                self.status = status;
                if let Some(by) = patch.verified_by {
                    self.verified_by = Some(by);
                }
                if let Some(at) = patch.verified_at {
                    self.verified_at = Some(at);
                }
                if let Some(by) = patch.rejected_by {
                    self.rejected_by = Some(by);
                }
                if let Some(at) = patch.rejected_at {
                    self.rejected_at = Some(at);
                }
                if let Some(reason) = patch.rejection_reason {
                    self.rejection_reason = Some(reason);
                }
            }
        }
        if let Some(metadata) = patch.metadata {
            self.analysis = metadata.analysis.clone().or(self.analysis.take());
            self.metadata = Some(metadata);
        }
        if let Some(analysis) = patch.analysis {
            self.analysis = Some(analysis);
        }
        self.updated_at = Utc::now();
    }
}

/// Partial, idempotent projection update.
///
/// Fields left `None` are unchanged by [`ProjectionRow::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPatch {
    pub status: Option<DocumentStatus>,
    pub verified_by: Option<Address>,
    pub verified_at: Option<u64>,
    pub rejected_by: Option<Address>,
    pub rejected_at: Option<u64>,
    pub rejection_reason: Option<String>,
    pub metadata: Option<DocumentMetadata>,
    pub analysis: Option<AnalysisReport>,
}

impl ProjectionPatch {
    /// Patch recording a successful verification.
    #[must_use]
    pub fn verified(issuer: Address, at: u64) -> Self {
        Self {
            status: Some(DocumentStatus::Verified),
            verified_by: Some(issuer),
            verified_at: Some(at),
            ..Self::default()
        }
    }

    /// Patch recording a rejection.
    #[must_use]
    pub fn rejected(issuer: Address, at: u64, reason: String) -> Self {
        Self {
            status: Some(DocumentStatus::Rejected),
            rejected_by: Some(issuer),
            rejected_at: Some(at),
            rejection_reason: Some(reason),
            ..Self::default()
        }
    }
}
