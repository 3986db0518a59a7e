//! Centralized authorization checks.
//!
//! Every mutating or read-sensitive operation passes through this guard
//! before touching anything, so ownership and issuer rules live in one
//! place instead of being repeated per entry point. Issuer authorization
//! is asked of the ledger on every call, never cached, so a revocation
//! takes effect immediately.

use crate::error::{DocumentPipelineError, Result};
use crate::ports::DocumentLedger;
use shared_types::{Address, DocumentRecord};
use std::sync::Arc;
use tracing::debug;

/// Guard over the ledger's authorization facts.
#[derive(Clone)]
pub struct AuthorizationGuard {
    ledger: Arc<dyn DocumentLedger>,
}

impl AuthorizationGuard {
    #[must_use]
    pub fn new(ledger: Arc<dyn DocumentLedger>) -> Self {
        Self { ledger }
    }

    /// Require that `address` is a ledger-recognized issuer right now.
    pub async fn ensure_issuer(&self, address: Address, action: &str) -> Result<()> {
        let authorized = self
            .ledger
            .is_authorized_issuer(address)
            .await
            .map_err(DocumentPipelineError::from)?;

        if authorized {
            Ok(())
        } else {
            debug!(address = %address, action, "Issuer check refused");
            Err(DocumentPipelineError::AuthorizationDenied {
                address,
                action: action.to_string(),
            })
        }
    }

    /// Require that `caller` owns the document described by `record`.
    pub fn ensure_owner(
        &self,
        record: &DocumentRecord,
        caller: Address,
        action: &str,
    ) -> Result<()> {
        if record.owner == caller {
            Ok(())
        } else {
            debug!(caller = %caller, owner = %record.owner, action, "Owner check refused");
            Err(DocumentPipelineError::AuthorizationDenied {
                address: caller,
                action: action.to_string(),
            })
        }
    }
}
