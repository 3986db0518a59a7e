//! # Document Lifecycle Events
//!
//! Defines the events that flow through the notification bus. Every event
//! belongs to exactly one citizen's topic, named after the owner address.

use serde::{Deserialize, Serialize};
use shared_types::{Address, DocumentId, DocumentStatus, DocumentType};

/// Events published to a citizen's notification topic.
///
/// Events carry a correlation id so an upstream session layer can
/// de-duplicate redeliveries across reconnects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A new document was registered on the ledger.
    DocumentUploaded {
        correlation_id: String,
        owner: Address,
        document_id: DocumentId,
        document_type: DocumentType,
        status: DocumentStatus,
    },

    /// An authorized issuer verified a document.
    DocumentVerified {
        correlation_id: String,
        owner: Address,
        document_id: DocumentId,
        verified_by: Address,
    },

    /// An authorized issuer rejected a document.
    DocumentRejected {
        correlation_id: String,
        owner: Address,
        document_id: DocumentId,
        rejected_by: Address,
        reason: String,
    },
}

impl DocumentEvent {
    /// The owner whose topic this event is published to.
    #[must_use]
    pub fn owner(&self) -> Address {
        match self {
            Self::DocumentUploaded { owner, .. }
            | Self::DocumentVerified { owner, .. }
            | Self::DocumentRejected { owner, .. } => *owner,
        }
    }

    /// The document this event concerns.
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        match self {
            Self::DocumentUploaded { document_id, .. }
            | Self::DocumentVerified { document_id, .. }
            | Self::DocumentRejected { document_id, .. } => *document_id,
        }
    }

    /// Topic name for this event, one topic per citizen.
    #[must_use]
    pub fn topic(&self) -> String {
        topic_for(self.owner())
    }

    /// Short event kind name, for logs and upstream payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DocumentUploaded { .. } => "document-uploaded",
            Self::DocumentVerified { .. } => "document-verified",
            Self::DocumentRejected { .. } => "document-rejected",
        }
    }
}

/// Topic name for a citizen's notifications.
#[must_use]
pub fn topic_for(owner: Address) -> String {
    format!("citizen-{owner}")
}

/// Filter for subscribing to specific owners' events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Owners to include. Empty means all owners.
    pub owners: Vec<Address>,
}

impl EventFilter {
    /// Accept every event on the bus.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only events for one owner's topic.
    #[must_use]
    pub fn owner(owner: Address) -> Self {
        Self { owners: vec![owner] }
    }

    /// Accept events for any of the given owners.
    #[must_use]
    pub fn owners(owners: Vec<Address>) -> Self {
        Self { owners }
    }

    /// Check whether an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &DocumentEvent) -> bool {
        self.owners.is_empty() || self.owners.contains(&event.owner())
    }
}
