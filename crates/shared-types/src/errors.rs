//! # Error Types
//!
//! Parse errors for the identifier types defined in this crate.

use thiserror::Error;

/// Errors from parsing addresses, hashes, and document type names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Decoded byte length did not match the identifier width.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Document type name outside the closed set.
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),
}
