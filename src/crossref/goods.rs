//! Semantic goods-description rule.
//!
//! The only rule that leaves the process: the credit's goods wording is
//! compared against each shipping document by the external comparator, one
//! bounded call per pair. Calls complete in any order, so the issue list
//! this rule appends has no ordering guarantee. Any comparator failure is
//! fail-closed: a forced mismatch surfaced for manual review.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::collaborators::{GoodsComparator, GoodsMatch, MatchStrictness};
use crate::config;
use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};
use crate::normalize::values::specified;

use super::{cross_issue, first_of};

/// Documents compared against the credit wording, with the strictness the
/// UCP applies to each: the invoice must correspond, transport and packing
/// documents may use general terms.
const COMPARED_DOCUMENTS: &[(DocumentType, MatchStrictness, Severity)] = &[
    (
        DocumentType::CommercialInvoice,
        MatchStrictness::Strict,
        Severity::Critical,
    ),
    (
        DocumentType::BillOfLading,
        MatchStrictness::Lenient,
        Severity::Major,
    ),
    (
        DocumentType::PackingList,
        MatchStrictness::Lenient,
        Severity::Major,
    ),
];

pub async fn check_goods_descriptions(
    docs: &[DocumentResult],
    comparator: &dyn GoodsComparator,
) -> Vec<CrossRefIssue> {
    let Some(reference) = first_of(docs, DocumentType::LetterOfCredit)
        .and_then(|lc| specified(lc.extracted.goods_description.as_deref()))
    else {
        return vec![];
    };

    let targets: Vec<(DocumentType, MatchStrictness, Severity, &str)> = COMPARED_DOCUMENTS
        .iter()
        .filter_map(|(ty, strictness, severity)| {
            first_of(docs, *ty)
                .and_then(|d| specified(d.extracted.goods_description.as_deref()))
                .map(|description| (*ty, *strictness, *severity, description))
        })
        .collect();

    let semaphore = Arc::new(Semaphore::new(config::MAX_CONCURRENT_COMPARISONS));
    let comparisons = targets
        .into_iter()
        .map(|(ty, strictness, severity, description)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("comparison semaphore is never closed");

                let outcome = tokio::time::timeout(
                    Duration::from_secs(config::COMPARATOR_TIMEOUT_SECS),
                    comparator.compare(reference, description, strictness),
                )
                .await;

                let verdict = match outcome {
                    Ok(Ok(verdict)) => verdict,
                    Ok(Err(error)) => {
                        tracing::warn!(
                            doc_type = ty.as_str(),
                            %error,
                            "Goods comparator failed, treating as mismatch"
                        );
                        GoodsMatch::manual_review(&error.to_string())
                    }
                    Err(_) => {
                        tracing::warn!(
                            doc_type = ty.as_str(),
                            timeout_secs = config::COMPARATOR_TIMEOUT_SECS,
                            "Goods comparator timed out, treating as mismatch"
                        );
                        GoodsMatch::manual_review("timed out")
                    }
                };

                (ty, severity, description, verdict)
            }
        });

    join_all(comparisons)
        .await
        .into_iter()
        .filter(|(_, _, _, verdict)| !verdict.matches)
        .map(|(ty, severity, description, verdict)| {
            cross_issue(
                "goodsDescription",
                severity,
                format!(
                    "Goods description on the {} does not correspond with the \
                     credit: {}",
                    ty.as_str(),
                    verdict.reason,
                ),
                vec![
                    (DocumentType::LetterOfCredit, reference.to_string()),
                    (ty, description.to_string()),
                ],
            )
        })
        .collect()
}
