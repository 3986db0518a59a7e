//! # Document Pipeline Subsystem
//!
//! The core of VeriDoc: a cross-store ingestion-and-verification pipeline
//! that records citizen document submissions on an append-only ledger,
//! stores document bytes and derived metadata in a content-addressed
//! object store, keeps a fast-read projection, and fans lifecycle events
//! out to the owning citizen's notification topic.
//!
//! ## Key responsibilities
//!
//! - Canonicalize uploads before hashing so content identifiers are stable
//! - Orchestrate submission: blob → analysis → metadata → ledger → projection → notify
//! - Enforce the document lifecycle state machine through the ledger,
//!   the single arbiter for concurrent verify/reject attempts
//! - Gate reads on ownership and transitions on issuer authorization
//!
//! ## Consistency model
//!
//! The ledger registration is the single commit point: a document exists
//! if and only if the ledger says so. Object-store writes that precede it
//! are safely orphanable; the projection is derived state, repaired from
//! the ledger on read when stale or missing; notifications are
//! fire-and-forget and never gate the commit path.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): content preparation and lifecycle
//!   transition rules, no I/O dependencies
//! - **Ports Layer** (`ports/`): inbound API trait, outbound collaborator
//!   traits (object store, ledger, analysis engine, projection store)
//! - **Adapters Layer** (`adapters/`): in-memory collaborator
//!   implementations for single-node operation and tests
//! - **Service Layer** (`service/`): the ingestion pipeline, lifecycle
//!   manager, query service, and authorization guard

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod retry;
pub mod service;
pub mod test_utils;

// Re-export main types for convenience
pub use config::{PipelineConfig, RetryConfig};
pub use domain::{ContentPreparer, LifecycleAction, PreparedContent};
pub use error::{DocumentPipelineError, Result};
pub use ports::{
    AnalysisEngine, AnalysisError, DocumentApi, DocumentLedger, DocumentView, LedgerError,
    ObjectStore, ObjectStoreError, ProjectionError, ProjectionStore, SubmissionReceipt,
    SubmissionRequest,
};
pub use service::{
    AuthorizationGuard, DocumentQueryService, DocumentVerificationService, IngestionPipeline,
    LifecycleManager, PreparedSubmission,
};

/// Upload size cap in bytes, enforced before any external call.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Images are bounded to fit inside this square, never enlarged.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 2000;

/// JPEG re-encode quality for canonicalized images.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// How long the pipeline waits for the analysis engine before proceeding
/// without enrichment.
pub const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 5_000;
