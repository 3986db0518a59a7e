//! # Content Preparation
//!
//! Canonicalizes raw uploads before hashing and storage so that a given
//! input always produces the same byte sequence, keeping content
//! identifiers stable across resubmissions.
//!
//! All checks here run before any external call: an unsupported or
//! oversized upload is rejected with zero side effects.

use crate::error::{DocumentPipelineError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};

/// Mime types accepted for submission.
pub const ACCEPTED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Canonicalized upload, ready for content-addressed storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent {
    /// The canonical bytes.
    pub bytes: Vec<u8>,
    /// Mime type of the canonical bytes (images re-encode to JPEG).
    pub mime: String,
}

/// Deterministic upload canonicalizer.
///
/// Images are decoded, bounded to fit inside a square without enlarging,
/// and re-encoded as JPEG at a fixed quality. Fixed-layout documents
/// (PDF) pass through unchanged.
#[derive(Debug, Clone)]
pub struct ContentPreparer {
    max_upload_bytes: u64,
    max_image_dimension: u32,
    jpeg_quality: u8,
}

impl ContentPreparer {
    /// Create a preparer with explicit bounds.
    #[must_use]
    pub fn new(max_upload_bytes: u64, max_image_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            max_upload_bytes,
            max_image_dimension,
            jpeg_quality,
        }
    }

    /// Create a preparer from pipeline configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::PipelineConfig) -> Self {
        Self::new(
            config.max_upload_bytes,
            config.max_image_dimension,
            config.jpeg_quality,
        )
    }

    /// Canonicalize `raw` declared as `declared_mime`.
    ///
    /// # Errors
    ///
    /// - [`DocumentPipelineError::UnsupportedContent`] for mime types
    ///   outside [`ACCEPTED_MIME_TYPES`]
    /// - [`DocumentPipelineError::ContentTooLarge`] above the size cap
    /// - [`DocumentPipelineError::InvalidContent`] when image bytes do not
    ///   decode
    pub fn prepare(&self, raw: &[u8], declared_mime: &str) -> Result<PreparedContent> {
        if !ACCEPTED_MIME_TYPES.contains(&declared_mime) {
            return Err(DocumentPipelineError::UnsupportedContent {
                mime: declared_mime.to_string(),
            });
        }

        let size = raw.len() as u64;
        if size > self.max_upload_bytes {
            return Err(DocumentPipelineError::ContentTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        if declared_mime.starts_with("image/") {
            self.prepare_image(raw)
        } else {
            // Fixed-layout formats are already canonical.
            Ok(PreparedContent {
                bytes: raw.to_vec(),
                mime: declared_mime.to_string(),
            })
        }
    }

    fn prepare_image(&self, raw: &[u8]) -> Result<PreparedContent> {
        let decoded = image::load_from_memory(raw)
            .map_err(|e| DocumentPipelineError::InvalidContent(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let max = self.max_image_dimension;
        // thumbnail() preserves aspect ratio; only downsize, never enlarge.
        let bounded = if width > max || height > max {
            decoded.thumbnail(max, max)
        } else {
            decoded
        };

        // JPEG has no alpha channel; normalize to RGB before encoding.
        let canonical = DynamicImage::ImageRgb8(bounded.to_rgb8());

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality);
        canonical
            .write_with_encoder(encoder)
            .map_err(|e| DocumentPipelineError::Internal(e.to_string()))?;

        Ok(PreparedContent {
            bytes,
            mime: "image/jpeg".to_string(),
        })
    }
}
