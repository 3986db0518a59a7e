//! Ports layer: the trait boundaries of the pipeline.
//!
//! Inbound ports are consumed by an upstream transport layer; outbound
//! ports are the contracts the pipeline requires from its collaborators.

pub mod inbound;
pub mod outbound;

pub use inbound::{DocumentApi, DocumentView, SubmissionReceipt, SubmissionRequest};
pub use outbound::{
    AnalysisEngine, AnalysisError, DocumentLedger, LedgerError, ObjectStore, ObjectStoreError,
    ProjectionError, ProjectionStore,
};
