//! Configuration types for the document pipeline

use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the document pipeline
#[derive(Clone, Debug, Deserialize)]
pub struct PipelineConfig {
    /// Upload size cap in bytes, checked before any external call
    pub max_upload_bytes: u64,

    /// Images are bounded to fit inside this square, never enlarged
    pub max_image_dimension: u32,

    /// JPEG re-encode quality for canonicalized images
    pub jpeg_quality: u8,

    /// Analysis engine budget in milliseconds; on expiry the pipeline
    /// proceeds without enrichment
    pub analysis_timeout_ms: u64,

    /// Retry policy for commit-critical collaborator calls
    pub retry: RetryConfig,
}

impl PipelineConfig {
    /// Analysis budget as a `Duration`.
    #[must_use]
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: crate::DEFAULT_MAX_UPLOAD_BYTES,
            max_image_dimension: crate::DEFAULT_MAX_IMAGE_DIMENSION,
            jpeg_quality: crate::DEFAULT_JPEG_QUALITY,
            analysis_timeout_ms: crate::DEFAULT_ANALYSIS_TIMEOUT_MS,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded-backoff retry policy.
///
/// Applies only to transient failures of commit-critical calls (object
/// store puts, ledger registration, ledger transition). Best-effort steps
/// are never retried synchronously.
#[derive(Clone, Debug, Deserialize)]
pub struct RetryConfig {
    /// Retries after the initial attempt; zero disables retry
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per attempt
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    pub max_backoff_ms: u64,
}

impl RetryConfig {
    /// First backoff delay as a `Duration`.
    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Backoff ceiling as a `Duration`.
    #[must_use]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 5_000,
        }
    }
}
