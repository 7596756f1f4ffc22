//! The validation engine: extraction fan-out, cross-reference stage,
//! verdict rollup, and the best-effort persistence hand-off.

use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::future::join_all;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::collaborators::{FieldExtractor, GoodsComparator, VerdictStore};
use crate::config;
use crate::crossref::{run_cross_checks, RuleContext};
use crate::extraction::assemble_document_result;
use crate::models::{DocumentResult, PackageVerdict, ValidationRequest};
use crate::verdict::aggregate;

/// Validates one document package end to end.
///
/// Collaborators are injected as typed handles; the engine owns no
/// configuration beyond the constants in [`config`].
pub struct ValidationEngine {
    extractor: Arc<dyn FieldExtractor>,
    comparator: Arc<dyn GoodsComparator>,
    store: Option<Arc<dyn VerdictStore>>,
}

impl ValidationEngine {
    pub fn new(
        extractor: Arc<dyn FieldExtractor>,
        comparator: Arc<dyn GoodsComparator>,
        store: Option<Arc<dyn VerdictStore>>,
    ) -> Self {
        Self {
            extractor,
            comparator,
            store,
        }
    }

    /// Validate a package against today's calendar date.
    pub async fn validate_package(&self, request: ValidationRequest) -> PackageVerdict {
        self.validate_package_as_of(request, chrono::Local::now().date_naive())
            .await
    }

    /// Validate a package as of an explicit date. Expiry checks compare
    /// against this date, so callers (and tests) control "today".
    pub async fn validate_package_as_of(
        &self,
        request: ValidationRequest,
        today: NaiveDate,
    ) -> PackageVerdict {
        let package_id = Uuid::new_v4();
        tracing::info!(
            %package_id,
            client = %request.client_identifier,
            channel = request.channel.as_str(),
            documents = request.documents.len(),
            "Validating document package"
        );

        // The cross-reference stage needs the complete set; gather every
        // extraction before moving on.
        let document_results = self.extract_all(&request).await;

        let ctx = RuleContext::for_package(&document_results, today);
        let cross_reference_issues =
            run_cross_checks(&document_results, &ctx, self.comparator.as_ref()).await;

        let (overall_verdict, recommendation) =
            aggregate(&document_results, &cross_reference_issues);

        tracing::info!(
            %package_id,
            verdict = overall_verdict.as_str(),
            payment_mode = ctx.payment_mode.as_str(),
            cross_reference_issues = cross_reference_issues.len(),
            "Package validation complete"
        );

        let package = PackageVerdict {
            package_id,
            overall_verdict,
            document_results,
            cross_reference_issues,
            recommendation,
            payment_mode: ctx.payment_mode,
        };

        self.persist(&package).await;
        package
    }

    /// Extract every document with bounded concurrency, preserving input
    /// order in the results.
    async fn extract_all(&self, request: &ValidationRequest) -> Vec<DocumentResult> {
        let semaphore = Arc::new(Semaphore::new(config::MAX_CONCURRENT_EXTRACTIONS));

        let extractions = request.documents.iter().map(|input| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("extraction semaphore is never closed");
                let response = self.extractor.extract(input.doc_type, &input.text).await;
                assemble_document_result(input.doc_type, &input.text, response)
            }
        });

        join_all(extractions).await
    }

    /// Hand the finished verdict to the store. Best-effort: a persistence
    /// failure is an operator problem, never a validation failure.
    async fn persist(&self, package: &PackageVerdict) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        if let Err(error) = store.store(package, None).await {
            tracing::warn!(
                package_id = %package.package_id,
                %error,
                "Failed to persist package verdict"
            );
        }
    }
}
