//! # Document Metadata
//!
//! The metadata object stored as JSON in the object store alongside each
//! document, and the analysis report it embeds.

use crate::entities::DocumentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured result from the analysis engine.
///
/// Denormalized into the projection for fast reads; the ledger only holds
/// it indirectly, through the metadata hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Human-readable one-line summary.
    pub summary: String,
    /// Engine confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// Extracted key/value fields, in deterministic order.
    pub fields: BTreeMap<String, String>,
}

/// Metadata packaged with each submission and stored as JSON.
///
/// `analysis` is absent when the analysis engine was unavailable at
/// ingestion time; registration proceeds regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original filename as declared by the uploader, when known.
    pub original_name: Option<String>,
    /// Declared mime type of the raw upload.
    pub mime_type: String,
    /// Size of the raw upload in bytes, before preparation.
    pub original_size: u64,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Declared document category.
    pub document_type: DocumentType,
    /// Analysis result, when the engine produced one.
    pub analysis: Option<AnalysisReport>,
}
