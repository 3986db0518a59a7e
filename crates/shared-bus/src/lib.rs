//! # Shared Bus - Notification Fan-Out for Document Lifecycle Events
//!
//! Best-effort, topic-based broadcast of document lifecycle events to a
//! citizen's open sessions. Publishing is decoupled from the commit path:
//! it never blocks and never fails the operation that produced the event.
//!
//! ## Fan-Out Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Ingestion /  │                    │ Citizen      │
//! │ Lifecycle    │    publish()       │ session      │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Notification │          │
//!                  │     Bus      │ ─────────┘
//!                  └──────────────┘  subscribe(owner)
//! ```
//!
//! ## Delivery Contract
//!
//! - **Best-effort**: events to topics with no subscribers are dropped.
//! - **Per-citizen topics**: each owner address names a topic; a
//!   subscription filter selects the owners of interest.
//! - **Lag tolerance**: slow subscribers skip missed events rather than
//!   stalling the bus.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{DocumentEvent, EventFilter};
pub use publisher::{InMemoryNotificationBus, NotificationBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lag kicks in.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
