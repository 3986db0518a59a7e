//! # Lifecycle Transition Rules
//!
//! Pure rules of the document state machine:
//!
//! ```text
//!             verify
//!   pending ──────────→ verified   (terminal)
//!      │
//!      │     reject
//!      └──────────────→ rejected   (terminal)
//! ```
//!
//! No transition is defined out of a terminal status. The ledger is the
//! runtime arbiter of these rules; services never infer a transition
//! locally.

use shared_types::DocumentStatus;
use thiserror::Error;

/// The two authorized-issuer actions on a pending document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Verify,
    Reject,
}

impl LifecycleAction {
    /// The terminal status this action drives to.
    #[must_use]
    pub fn target(&self) -> DocumentStatus {
        match self {
            Self::Verify => DocumentStatus::Verified,
            Self::Reject => DocumentStatus::Rejected,
        }
    }

    /// Action name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Reject => "reject",
        }
    }
}

/// Why a transition is not permitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The document already reached a terminal status.
    #[error("Already finalized as {current}")]
    Finalized { current: DocumentStatus },

    /// The requested target is not a terminal status.
    #[error("Invalid transition target: {target}")]
    InvalidTarget { target: DocumentStatus },
}

/// Check whether `current → target` is a legal transition.
///
/// Legal exactly when `current` is pending and `target` is terminal.
pub fn check_transition(
    current: DocumentStatus,
    target: DocumentStatus,
) -> Result<(), TransitionError> {
    if !target.is_terminal() {
        return Err(TransitionError::InvalidTarget { target });
    }
    if current.is_terminal() {
        return Err(TransitionError::Finalized { current });
    }
    Ok(())
}
