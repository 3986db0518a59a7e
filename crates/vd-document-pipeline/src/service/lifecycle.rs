//! # Lifecycle Manager
//!
//! Orchestrates authorized verify/reject transitions and their
//! propagation. The ledger arbitrates: of two issuers racing on the same
//! pending document, exactly one transition lands and the other comes
//! back as a conflict, which is surfaced to the caller and never retried.

use crate::config::RetryConfig;
use crate::domain::LifecycleAction;
use crate::error::{DocumentPipelineError, Result};
use crate::ports::{DocumentLedger, ProjectionStore};
use crate::retry::with_retry;
use crate::service::guard::AuthorizationGuard;
use shared_bus::{DocumentEvent, NotificationBus};
use shared_types::{Address, DocumentId, ProjectionPatch};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Orchestrator for verify/reject transitions.
pub struct LifecycleManager {
    ledger: Arc<dyn DocumentLedger>,
    projection: Arc<dyn ProjectionStore>,
    bus: Arc<dyn NotificationBus>,
    guard: AuthorizationGuard,
    retry: RetryConfig,
}

impl LifecycleManager {
    /// Create a manager over the given collaborators.
    pub fn new(
        ledger: Arc<dyn DocumentLedger>,
        projection: Arc<dyn ProjectionStore>,
        bus: Arc<dyn NotificationBus>,
        guard: AuthorizationGuard,
        retry: RetryConfig,
    ) -> Self {
        Self {
            ledger,
            projection,
            bus,
            guard,
            retry,
        }
    }

    /// Mark a pending document verified.
    pub async fn verify(&self, document_id: DocumentId, issuer: Address) -> Result<()> {
        self.transition(document_id, LifecycleAction::Verify, issuer, None)
            .await
    }

    /// Mark a pending document rejected. Requires a non-empty reason.
    pub async fn reject(
        &self,
        document_id: DocumentId,
        issuer: Address,
        reason: &str,
    ) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DocumentPipelineError::Validation(
                "rejection reason is required".to_string(),
            ));
        }
        self.transition(
            document_id,
            LifecycleAction::Reject,
            issuer,
            Some(reason.to_string()),
        )
        .await
    }

    async fn transition(
        &self,
        document_id: DocumentId,
        action: LifecycleAction,
        issuer: Address,
        reason: Option<String>,
    ) -> Result<()> {
        // Authorization is asked of the ledger on every call, so a
        // revoked issuer is refused immediately.
        self.guard.ensure_issuer(issuer, action.as_str()).await?;

        let target = action.target();
        let ledger = self.ledger.as_ref();
        let transition_reason = reason.clone();
        with_retry(&self.retry, "ledger.transition", || {
            let reason = transition_reason.clone();
            async move {
                ledger
                    .transition(document_id, target, issuer, reason)
                    .await
                    .map_err(Into::into)
            }
        })
        .await?;
        info!(
            document_id = %document_id,
            action = action.as_str(),
            issuer = %issuer,
            "Document transitioned"
        );

        // Derived state: the authoritative transition already happened, so
        // a projection failure is staleness, not an error for the issuer.
        let now = epoch_seconds();
        let patch = match action {
            LifecycleAction::Verify => ProjectionPatch::verified(issuer, now),
            LifecycleAction::Reject => {
                ProjectionPatch::rejected(issuer, now, reason.clone().unwrap_or_default())
            }
        };
        if let Err(e) = self.projection.apply(document_id, patch).await {
            warn!(
                document_id = %document_id,
                error = %e,
                "Projection update failed; row will be repaired on read"
            );
        }

        // Owner comes from the ledger, not the projection, so the
        // notification cannot act on stale data.
        match self.ledger.get_document(document_id).await {
            Ok(record) => {
                let event = match action {
                    LifecycleAction::Verify => DocumentEvent::DocumentVerified {
                        correlation_id: uuid::Uuid::new_v4().to_string(),
                        owner: record.owner,
                        document_id,
                        verified_by: issuer,
                    },
                    LifecycleAction::Reject => DocumentEvent::DocumentRejected {
                        correlation_id: uuid::Uuid::new_v4().to_string(),
                        owner: record.owner,
                        document_id,
                        rejected_by: issuer,
                        reason: reason.unwrap_or_default(),
                    },
                };
                self.bus.publish(event).await;
            }
            Err(e) => {
                warn!(
                    document_id = %document_id,
                    error = %e,
                    "Owner read-back failed; notification skipped"
                );
            }
        }

        Ok(())
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
