//! Cross-crate integration flows.

pub mod degraded_collaborators;
pub mod document_flows;

use shared_bus::InMemoryNotificationBus;
use shared_types::{Address, DocumentType};
use std::sync::Arc;
use vd_document_pipeline::adapters::{
    InMemoryLedger, InMemoryObjectStore, InMemoryProjectionStore, RuleBasedAnalysisEngine,
};
use vd_document_pipeline::{
    AnalysisEngine, DocumentLedger, DocumentVerificationService, ObjectStore, PipelineConfig,
    ProjectionStore, RetryConfig, SubmissionRequest,
};

/// Citizen used across the flows.
pub fn citizen_a() -> Address {
    Address([0xA1; 20])
}

/// First authorized issuer.
pub fn issuer_b() -> Address {
    Address([0xB2; 20])
}

/// Second authorized issuer.
pub fn issuer_c() -> Address {
    Address([0xC3; 20])
}

/// Config with fast retry backoff so outage tests stay quick.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        analysis_timeout_ms: 200,
        retry: RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
        },
        ..PipelineConfig::default()
    }
}

/// All collaborators of a wired service, kept accessible so tests can
/// inspect or perturb each store independently.
pub struct TestStack {
    pub object_store: Arc<InMemoryObjectStore>,
    pub ledger: Arc<InMemoryLedger>,
    pub projection: Arc<InMemoryProjectionStore>,
    pub bus: Arc<InMemoryNotificationBus>,
    pub service: DocumentVerificationService,
}

impl TestStack {
    /// Stack with issuers B and C authorized.
    pub fn new() -> Self {
        crate::init_tracing();
        let object_store = Arc::new(InMemoryObjectStore::new());
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b(), issuer_c()]));
        let projection = Arc::new(InMemoryProjectionStore::new());
        let bus = Arc::new(InMemoryNotificationBus::new());

        let service = DocumentVerificationService::new(
            Arc::clone(&object_store) as Arc<dyn ObjectStore>,
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()) as Arc<dyn AnalysisEngine>,
            Arc::clone(&projection) as Arc<dyn ProjectionStore>,
            Arc::clone(&bus) as Arc<dyn shared_bus::NotificationBus>,
            fast_config(),
        );

        Self {
            object_store,
            ledger,
            projection,
            bus,
            service,
        }
    }
}

/// A small but genuine PNG upload.
pub fn png_upload(owner: Address) -> SubmissionRequest {
    use image::{DynamicImage, ImageBuffer, Rgb};

    let img = ImageBuffer::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 128u8]));
    let mut raw_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(image::codecs::png::PngEncoder::new(&mut raw_bytes))
        .expect("encode fixture");

    SubmissionRequest {
        owner,
        document_type: DocumentType::Passport,
        raw_bytes,
        declared_mime: "image/png".to_string(),
        original_name: Some("passport-photo.png".to_string()),
        expiry: None,
    }
}

/// A PDF upload fixture.
pub fn pdf_upload(owner: Address, document_type: DocumentType) -> SubmissionRequest {
    SubmissionRequest {
        owner,
        document_type,
        raw_bytes: b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF".to_vec(),
        declared_mime: "application/pdf".to_string(),
        original_name: Some("document.pdf".to_string()),
        expiry: None,
    }
}
