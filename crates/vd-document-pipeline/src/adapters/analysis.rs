//! Rule-based analysis engine.
//!
//! Deterministic stand-in for a model-backed analysis service: it grades
//! legibility from content size, extracts coarse fields, and emits a
//! one-line summary. Deterministic output keeps content-addressed
//! metadata stable across reruns of the same submission.

use crate::ports::{AnalysisEngine, AnalysisError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_types::{AnalysisReport, DocumentType};
use std::collections::BTreeMap;
use std::time::Duration;

/// Content below this size is graded as a low-confidence capture.
const LEGIBLE_SIZE_BYTES: usize = 8 * 1024;

/// Deterministic, rule-based implementation of [`AnalysisEngine`].
pub struct RuleBasedAnalysisEngine {
    /// Simulated inference latency, for exercising caller timeouts.
    latency: Option<Duration>,
}

impl RuleBasedAnalysisEngine {
    #[must_use]
    pub fn new() -> Self {
        Self { latency: None }
    }

    /// Engine that takes `latency` to answer each request.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

impl Default for RuleBasedAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisEngine for RuleBasedAnalysisEngine {
    async fn analyze(
        &self,
        bytes: &[u8],
        document_type: DocumentType,
    ) -> Result<AnalysisReport, AnalysisError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if bytes.is_empty() {
            return Err(AnalysisError::Unavailable(
                "empty content".to_string(),
            ));
        }

        let legible = bytes.len() >= LEGIBLE_SIZE_BYTES;
        let confidence = if legible { 0.9 } else { 0.5 };

        let digest = Sha256::digest(bytes);
        let mut fields = BTreeMap::new();
        fields.insert("document_kind".to_string(), document_type.as_str().to_string());
        fields.insert("content_bytes".to_string(), bytes.len().to_string());
        fields.insert(
            "content_digest".to_string(),
            hex::encode(&digest[..8]),
        );

        let summary = format!(
            "{} document, {} bytes, {}",
            document_type,
            bytes.len(),
            if legible { "appears legible" } else { "low-resolution capture" },
        );

        Ok(AnalysisReport {
            summary,
            confidence,
            fields,
        })
    }
}
