//! # Notification Publisher
//!
//! Defines the publishing side of the notification bus.

use crate::events::{DocumentEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing lifecycle events to the bus.
///
/// Fire-and-forget: publishing never blocks the caller and never reports
/// failure upward. Dropped events are a delivery gap, not an error in the
/// operation that produced them.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    /// Publish an event to its owner's topic.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    async fn publish(&self, event: DocumentEvent) -> usize;

    /// Total number of events published so far.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the notification bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-node operation; a multi-node deployment
/// would back this with an external broker.
pub struct InMemoryNotificationBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<DocumentEvent>,

    /// Active subscription count by topic key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryNotificationBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with a specific per-subscriber buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Returns a [`Subscription`] handle that receives matching events
    /// published after this call.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = if filter.owners.is_empty() {
            "*".to_string()
        } else {
            filter
                .owners
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };

        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(topic_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(topic = %topic_key, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Number of active subscribers across all topics.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryNotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBus for InMemoryNotificationBus {
    async fn publish(&self, event: DocumentEvent) -> usize {
        let topic = event.topic();
        let kind = event.kind();
        let document_id = event.document_id();

        // Counter tracks attempts, delivered or not.
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    topic = %topic,
                    kind = kind,
                    document_id = %document_id,
                    receivers = receiver_count,
                    "Event published"
                );
                receiver_count
            }
            Err(e) => {
                // No receivers - the event is dropped; delivery is best-effort.
                warn!(
                    topic = %topic,
                    kind = kind,
                    document_id = %document_id,
                    error = %e,
                    "Event dropped (no receivers)"
                );
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
