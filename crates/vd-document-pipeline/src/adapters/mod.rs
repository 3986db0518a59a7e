//! Adapters layer: in-memory implementations of the outbound ports.
//!
//! These are the defaults for single-node operation and the substrate the
//! test suites run against. A multi-node deployment would swap them for
//! networked implementations of the same ports.

pub mod analysis;
pub mod ledger;
pub mod object_store;
pub mod projection;

pub use analysis::RuleBasedAnalysisEngine;
pub use ledger::InMemoryLedger;
pub use object_store::InMemoryObjectStore;
pub use projection::InMemoryProjectionStore;
