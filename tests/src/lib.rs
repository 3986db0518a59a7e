//! # VeriDoc Test Suite
//!
//! Unified test crate for cross-crate flows:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── document_flows.rs        # Submission and lifecycle end-to-end
//!     └── degraded_collaborators.rs# Outages, races, and lazy repair
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vd-tests
//!
//! # By category
//! cargo test -p vd-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

/// Install a test subscriber honoring `RUST_LOG`; repeated calls no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
