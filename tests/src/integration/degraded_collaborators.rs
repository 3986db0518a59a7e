//! # Degraded Collaborator Integration Tests
//!
//! The pipeline's failure contract, exercised end to end: commit-critical
//! outages abort with no partial state, best-effort outages degrade
//! gracefully, racing issuers get at-most-one-success arbitration, and a
//! lost projection is repaired lazily from the ledger.

#[cfg(test)]
mod tests {
    use crate::integration::{citizen_a, fast_config, issuer_b, issuer_c, pdf_upload, png_upload};
    use shared_bus::InMemoryNotificationBus;
    use shared_types::{Address, DocumentStatus, DocumentType};
    use std::sync::Arc;
    use vd_document_pipeline::adapters::{
        InMemoryLedger, InMemoryObjectStore, InMemoryProjectionStore, RuleBasedAnalysisEngine,
    };
    use vd_document_pipeline::test_utils::{
        FailingProjectionStore, FlakyLedger, FlakyObjectStore, UnavailableAnalysisEngine,
        UnavailableObjectStore,
    };
    use vd_document_pipeline::{
        AnalysisEngine, DocumentApi, DocumentLedger, DocumentPipelineError,
        DocumentVerificationService, ObjectStore, ProjectionStore,
    };

    fn wire(
        object_store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn DocumentLedger>,
        analysis: Arc<dyn AnalysisEngine>,
        projection: Arc<dyn ProjectionStore>,
    ) -> DocumentVerificationService {
        DocumentVerificationService::new(
            object_store,
            ledger,
            analysis,
            projection,
            Arc::new(InMemoryNotificationBus::new()),
            fast_config(),
        )
    }

    #[tokio::test]
    async fn test_storage_outage_leaves_no_trace() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(UnavailableObjectStore),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let result = service.submit(png_upload(citizen_a())).await;
        assert!(matches!(
            result,
            Err(DocumentPipelineError::StorageUnavailable(_))
        ));

        // No id is observable for the failed submission.
        assert_eq!(ledger.document_count(), 0);
        assert!(service.list_documents(citizen_a()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transient_storage_outage_survived_by_retry() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(FlakyObjectStore::failing_times(2)),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        assert_eq!(ledger.document_count(), 1);
        assert_eq!(
            ledger.get_document(receipt.document_id).await.unwrap().status,
            DocumentStatus::Pending,
        );
    }

    #[tokio::test]
    async fn test_transient_ledger_outage_survived_by_retry() {
        let ledger = Arc::new(FlakyLedger::failing_times(2, [issuer_b()]));
        let service = wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        let record = ledger.get_document(receipt.document_id).await.unwrap();
        assert_eq!(record.owner, citizen_a());
    }

    #[tokio::test]
    async fn test_exhausted_ledger_retries_abort_cleanly() {
        let object_store = Arc::new(InMemoryObjectStore::new());
        // Far more failures than the retry budget allows.
        let ledger = Arc::new(FlakyLedger::failing_times(100, [issuer_b()]));
        let service = wire(
            Arc::clone(&object_store) as Arc<dyn ObjectStore>,
            ledger as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let result = service.submit(png_upload(citizen_a())).await;
        assert!(matches!(
            result,
            Err(DocumentPipelineError::LedgerUnavailable(_))
        ));

        // The pre-commit blobs stay behind as orphans; no compensating delete.
        assert_eq!(object_store.len(), 2);
    }

    #[tokio::test]
    async fn test_analysis_outage_never_blocks_submission() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(UnavailableAnalysisEngine),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        assert!(receipt.analysis_summary.is_none());

        let view = service
            .get_document(receipt.document_id, citizen_a())
            .await
            .unwrap();
        assert_eq!(view.record.status, DocumentStatus::Pending);
        assert!(view.analysis.is_none());
        // Metadata itself still landed, just without the analysis section.
        assert!(view.metadata.is_some());
    }

    #[tokio::test]
    async fn test_slow_analysis_is_cut_off_not_fatal() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(InMemoryObjectStore::new()),
            ledger as Arc<dyn DocumentLedger>,
            // Slower than fast_config()'s 200ms analysis budget.
            Arc::new(RuleBasedAnalysisEngine::with_latency(
                std::time::Duration::from_secs(30),
            )),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let started = std::time::Instant::now();
        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        assert!(receipt.analysis_summary.is_none());
        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "submission must not wait out the slow engine"
        );
    }

    #[tokio::test]
    async fn test_projection_outage_then_lazy_repair() {
        let object_store = Arc::new(InMemoryObjectStore::new());
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));

        // Phase 1: submission with the projection store down.
        let degraded = wire(
            Arc::clone(&object_store) as Arc<dyn ObjectStore>,
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(FailingProjectionStore),
        );
        let receipt = degraded.submit(png_upload(citizen_a())).await.unwrap();

        // The ledger committed regardless.
        let record = ledger.get_document(receipt.document_id).await.unwrap();
        assert_eq!(record.status, DocumentStatus::Pending);

        // Phase 2: same stores, healthy (empty) projection. The detail
        // read repairs the missing row from ledger + object store.
        let projection = Arc::new(InMemoryProjectionStore::new());
        let healthy = wire(
            Arc::clone(&object_store) as Arc<dyn ObjectStore>,
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::clone(&projection) as Arc<dyn ProjectionStore>,
        );

        assert!(projection.is_empty());
        let view = healthy
            .get_document(receipt.document_id, citizen_a())
            .await
            .unwrap();
        assert_eq!(view.record.status, DocumentStatus::Pending);
        assert!(view.metadata.is_some());

        let row = projection.find(receipt.document_id).await.unwrap().unwrap();
        assert_eq!(row.status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn test_unauthorized_issuer_refused_in_any_state() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );
        let outsider = Address([0xEE; 20]);

        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        let id = receipt.document_id;

        // Pending document: refused.
        for attempt in [
            service.verify(id, outsider).await,
            service.reject(id, outsider, "not my call").await,
        ] {
            assert!(matches!(
                attempt,
                Err(DocumentPipelineError::AuthorizationDenied { .. })
            ));
        }

        // Finalized document: still refused as unauthorized, not as a
        // conflict.
        service.verify(id, issuer_b()).await.unwrap();
        let attempt = service.verify(id, outsider).await;
        assert!(matches!(
            attempt,
            Err(DocumentPipelineError::AuthorizationDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_revoked_issuer_refused_immediately() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        );

        let receipt = service.submit(png_upload(citizen_a())).await.unwrap();
        ledger.revoke_issuer(issuer_b());

        let result = service.verify(receipt.document_id, issuer_b()).await;
        assert!(matches!(
            result,
            Err(DocumentPipelineError::AuthorizationDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_verify_reject_race_has_exactly_one_winner() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b(), issuer_c()]));
        let service = Arc::new(wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        ));

        // Run the race repeatedly; every round must have exactly one
        // winner and a conflicted loser.
        for round in 0..16 {
            let receipt = service
                .submit(pdf_upload(citizen_a(), DocumentType::Aadhar))
                .await
                .unwrap();
            let id = receipt.document_id;

            let verify = {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.verify(id, issuer_b()).await })
            };
            let reject = {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.reject(id, issuer_c(), "checksum mismatch").await
                })
            };

            let (verify, reject) = (verify.await.unwrap(), reject.await.unwrap());
            assert!(
                verify.is_ok() ^ reject.is_ok(),
                "round {round}: exactly one transition must win"
            );
            let verify_ok = verify.is_ok();
            let loser = if verify_ok { reject } else { verify };
            assert!(matches!(
                loser,
                Err(DocumentPipelineError::AlreadyFinalized { .. })
            ));

            let record = ledger.get_document(id).await.unwrap();
            if verify_ok {
                assert_eq!(record.status, DocumentStatus::Verified);
                assert_eq!(record.verified_by, Some(issuer_b()));
                assert!(record.rejected_by.is_none());
            } else {
                assert_eq!(record.status, DocumentStatus::Rejected);
                assert_eq!(record.rejected_by, Some(issuer_c()));
                assert!(record.verified_by.is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_parallel_submissions_stay_independent() {
        let ledger = Arc::new(InMemoryLedger::with_issuers([issuer_b()]));
        let service = Arc::new(wire(
            Arc::new(InMemoryObjectStore::new()),
            Arc::clone(&ledger) as Arc<dyn DocumentLedger>,
            Arc::new(RuleBasedAnalysisEngine::new()),
            Arc::new(InMemoryProjectionStore::new()),
        ));

        let mut handles = Vec::new();
        for i in 0..8u8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let owner = Address([i + 1; 20]);
                let receipt = service
                    .submit(pdf_upload(owner, DocumentType::Other))
                    .await
                    .unwrap();
                (owner, receipt.document_id)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let (owner, id) = handle.await.unwrap();
            let record = ledger.get_document(id).await.unwrap();
            assert_eq!(record.owner, owner);
            ids.push(id);
        }

        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8, "every submission got a distinct id");
    }
}
