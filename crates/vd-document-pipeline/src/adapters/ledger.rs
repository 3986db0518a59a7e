//! In-memory document ledger.
//!
//! Single-node implementation of the [`DocumentLedger`] port: an
//! append-only document table, an issuer registry, and compare-and-set
//! lifecycle transitions under one write lock, which makes the
//! at-most-one-success arbitration for racing issuers immediate.

use crate::domain::{check_transition, TransitionError};
use crate::ports::{DocumentLedger, LedgerError};
use async_trait::async_trait;
use shared_types::{
    Address, ContentHash, DocumentId, DocumentRecord, DocumentStatus, DocumentType,
};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

struct LedgerState {
    documents: HashMap<DocumentId, DocumentRecord>,
    by_owner: HashMap<Address, Vec<DocumentId>>,
    issuers: HashSet<Address>,
    next_id: u64,
}

/// In-memory ledger adapter.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger with no authorized issuers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState {
                documents: HashMap::new(),
                by_owner: HashMap::new(),
                issuers: HashSet::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a ledger with an initial issuer set.
    #[must_use]
    pub fn with_issuers<I: IntoIterator<Item = Address>>(issuers: I) -> Self {
        let ledger = Self::new();
        ledger.state.write().unwrap().issuers.extend(issuers);
        ledger
    }

    /// Grant issuer authorization to an address.
    pub fn authorize_issuer(&self, address: Address) {
        self.state.write().unwrap().issuers.insert(address);
        info!(issuer = %address, "Issuer authorized");
    }

    /// Revoke issuer authorization. Takes effect on the next call that
    /// checks authorization; nothing is cached.
    pub fn revoke_issuer(&self, address: Address) {
        self.state.write().unwrap().issuers.remove(&address);
        info!(issuer = %address, "Issuer revoked");
    }

    /// Number of registered documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.state.read().unwrap().documents.len()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[async_trait]
impl DocumentLedger for InMemoryLedger {
    async fn register(
        &self,
        owner: Address,
        document_type: DocumentType,
        content_hash: ContentHash,
        metadata_hash: ContentHash,
        expiry: u64,
    ) -> Result<DocumentId, LedgerError> {
        let mut state = self.state.write().unwrap();

        let id = DocumentId(state.next_id);
        state.next_id += 1;

        let record = DocumentRecord {
            owner,
            document_type,
            content_hash,
            metadata_hash,
            status: DocumentStatus::Pending,
            expiry,
            registered_at: epoch_seconds(),
            verified_by: None,
            verified_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        };

        state.documents.insert(id, record);
        state.by_owner.entry(owner).or_default().push(id);

        info!(
            document_id = %id,
            owner = %owner,
            document_type = %document_type,
            "Document registered"
        );
        Ok(id)
    }

    async fn get_document(&self, id: DocumentId) -> Result<DocumentRecord, LedgerError> {
        self.state
            .read()
            .unwrap()
            .documents
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))
    }

    async fn list_documents(&self, owner: Address) -> Result<Vec<DocumentId>, LedgerError> {
        Ok(self
            .state
            .read()
            .unwrap()
            .by_owner
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn is_authorized_issuer(&self, address: Address) -> Result<bool, LedgerError> {
        Ok(self.state.read().unwrap().issuers.contains(&address))
    }

    async fn transition(
        &self,
        id: DocumentId,
        target: DocumentStatus,
        actor: Address,
        reason: Option<String>,
    ) -> Result<(), LedgerError> {
        // One write lock for the whole check-then-set: of two racing
        // issuers, exactly one observes a pending document.
        let mut state = self.state.write().unwrap();

        if !state.issuers.contains(&actor) {
            return Err(LedgerError::NotAuthorizedIssuer(actor));
        }

        let record = state
            .documents
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;

        check_transition(record.status, target).map_err(|e| match e {
            TransitionError::Finalized { current } => LedgerError::AlreadyFinalized { id, current },
            TransitionError::InvalidTarget { target } => LedgerError::InvalidTarget(target),
        })?;

        let now = epoch_seconds();
        record.status = target;
        match target {
            DocumentStatus::Verified => {
                record.verified_by = Some(actor);
                record.verified_at = Some(now);
            }
            DocumentStatus::Rejected => {
                record.rejected_by = Some(actor);
                record.rejected_at = Some(now);
                record.rejection_reason = reason;
            }
            DocumentStatus::Pending => unreachable!("rejected by check_transition"),
        }

        debug!(document_id = %id, status = %target, actor = %actor, "Document transitioned");
        Ok(())
    }
}
