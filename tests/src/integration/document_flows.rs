//! # Document Flow Integration Tests
//!
//! End-to-end submission and lifecycle flows across the pipeline, the
//! in-memory collaborators, and the notification bus.

#[cfg(test)]
mod tests {
    use crate::integration::{citizen_a, issuer_b, issuer_c, pdf_upload, png_upload, TestStack};
    use shared_bus::{DocumentEvent, EventFilter};
    use shared_types::{DocumentStatus, DocumentType};
    use vd_document_pipeline::{DocumentApi, DocumentLedger, DocumentPipelineError};

    #[tokio::test]
    async fn test_submit_registers_owned_pending_document() {
        let stack = TestStack::new();

        let receipt = stack.service.submit(png_upload(citizen_a())).await.unwrap();

        // The ledger is the source of truth for ownership and status.
        let record = stack.ledger.get_document(receipt.document_id).await.unwrap();
        assert_eq!(record.owner, citizen_a());
        assert_eq!(record.status, DocumentStatus::Pending);
        assert_eq!(record.content_hash, receipt.content_hash);
        assert_eq!(record.expires_at(), None);
    }

    #[tokio::test]
    async fn test_submitted_image_is_canonicalized() {
        let stack = TestStack::new();

        let receipt = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        let bytes = stack
            .service
            .get_document_content(receipt.document_id, citizen_a())
            .await
            .unwrap();

        // The stored blob is the canonical JPEG, not the raw PNG.
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
        assert!(img.width() <= 2000 && img.height() <= 2000);
    }

    #[tokio::test]
    async fn test_resubmission_yields_same_content_hash() {
        let stack = TestStack::new();

        let first = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        let second = stack.service.submit(png_upload(citizen_a())).await.unwrap();

        // Content addressing: same upload, same canonical hash, two
        // distinct ledger identities.
        assert_eq!(first.content_hash, second.content_hash);
        assert_ne!(first.document_id, second.document_id);
    }

    #[tokio::test]
    async fn test_verify_then_conflicting_verify_then_empty_reject() {
        let stack = TestStack::new();

        // Citizen A submits a passport with no expiry.
        let receipt = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        let id = receipt.document_id;
        let view = stack.service.get_document(id, citizen_a()).await.unwrap();
        assert_eq!(view.record.status, DocumentStatus::Pending);

        // Authorized issuer B verifies.
        stack.service.verify(id, issuer_b()).await.unwrap();
        let view = stack.service.get_document(id, citizen_a()).await.unwrap();
        assert_eq!(view.record.status, DocumentStatus::Verified);
        assert_eq!(view.record.verified_by, Some(issuer_b()));

        // Issuer C arrives late: conflict, not failure.
        let late = stack.service.verify(id, issuer_c()).await;
        assert!(matches!(
            late,
            Err(DocumentPipelineError::AlreadyFinalized {
                current: DocumentStatus::Verified,
                ..
            })
        ));

        // An empty rejection reason dies in validation before any ledger
        // call and the verified outcome is untouched.
        let empty = stack.service.reject(id, issuer_b(), "").await;
        assert!(matches!(empty, Err(DocumentPipelineError::Validation(_))));
        let record = stack.ledger.get_document(id).await.unwrap();
        assert_eq!(record.status, DocumentStatus::Verified);
        assert_eq!(record.verified_by, Some(issuer_b()));
    }

    #[tokio::test]
    async fn test_reject_flow_records_reason() {
        let stack = TestStack::new();

        let receipt = stack
            .service
            .submit(pdf_upload(citizen_a(), DocumentType::BirthCertificate))
            .await
            .unwrap();
        stack
            .service
            .reject(receipt.document_id, issuer_b(), "name mismatch with registry")
            .await
            .unwrap();

        let view = stack
            .service
            .get_document(receipt.document_id, citizen_a())
            .await
            .unwrap();
        assert_eq!(view.record.status, DocumentStatus::Rejected);
        assert_eq!(view.record.rejected_by, Some(issuer_b()));
        assert_eq!(
            view.record.rejection_reason.as_deref(),
            Some("name mismatch with registry"),
        );
        assert!(view.record.verified_by.is_none());
    }

    #[tokio::test]
    async fn test_owner_gets_full_lifecycle_notifications() {
        let stack = TestStack::new();
        let mut sub = stack.bus.subscribe(EventFilter::owner(citizen_a()));

        let receipt = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        stack
            .service
            .verify(receipt.document_id, issuer_b())
            .await
            .unwrap();

        let uploaded = sub.try_recv().unwrap().expect("uploaded event");
        assert!(matches!(uploaded, DocumentEvent::DocumentUploaded { .. }));
        assert_eq!(uploaded.document_id(), receipt.document_id);

        let verified = sub.try_recv().unwrap().expect("verified event");
        match verified {
            DocumentEvent::DocumentVerified { verified_by, .. } => {
                assert_eq!(verified_by, issuer_b());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_citizens_topics_stay_quiet() {
        let stack = TestStack::new();
        let bystander = shared_types::Address([0xD4; 20]);
        let mut sub = stack.bus.subscribe(EventFilter::owner(bystander));

        stack.service.submit(png_upload(citizen_a())).await.unwrap();

        assert!(sub.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_merges_ledger_and_projection() {
        let stack = TestStack::new();

        let passport = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        let license = stack
            .service
            .submit(pdf_upload(citizen_a(), DocumentType::DrivingLicense))
            .await
            .unwrap();
        stack
            .service
            .verify(passport.document_id, issuer_b())
            .await
            .unwrap();

        let views = stack.service.list_documents(citizen_a()).await.unwrap();
        assert_eq!(views.len(), 2);

        let passport_view = views
            .iter()
            .find(|v| v.document_id == passport.document_id)
            .unwrap();
        assert_eq!(passport_view.record.status, DocumentStatus::Verified);
        assert!(passport_view.analysis.is_some());

        let license_view = views
            .iter()
            .find(|v| v.document_id == license.document_id)
            .unwrap();
        assert_eq!(license_view.record.status, DocumentStatus::Pending);
        assert_eq!(
            license_view
                .metadata
                .as_ref()
                .and_then(|m| m.original_name.as_deref()),
            Some("document.pdf"),
        );
    }

    #[tokio::test]
    async fn test_submission_receipt_carries_analysis_summary() {
        let stack = TestStack::new();
        let receipt = stack.service.submit(png_upload(citizen_a())).await.unwrap();
        let summary = receipt.analysis_summary.expect("analysis ran");
        assert!(summary.contains("passport"));
    }

    #[tokio::test]
    async fn test_expiry_round_trips_through_ledger() {
        let stack = TestStack::new();
        let expiry = chrono::DateTime::parse_from_rfc3339("2031-06-15T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);

        let mut request = pdf_upload(citizen_a(), DocumentType::Pan);
        request.expiry = Some(expiry);
        let receipt = stack.service.submit(request).await.unwrap();

        let record = stack.ledger.get_document(receipt.document_id).await.unwrap();
        assert_eq!(record.expires_at(), Some(expiry.timestamp() as u64));
        assert!(!record.is_expired(expiry.timestamp() as u64 - 1));
        assert!(record.is_expired(expiry.timestamp() as u64));
    }
}
