//! Customs-readiness checks for packages with no letter of credit.
//!
//! Without a credit there is no presentation to examine; what matters is
//! whether customs will release the cargo. Invoice and B/L are mandatory,
//! certificate of origin and packing list are expected.

use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};

use super::{cross_issue, first_of};

/// (document, severity when absent, why it matters)
const REQUIRED_FOR_CUSTOMS: &[(DocumentType, Severity, &str)] = &[
    (
        DocumentType::CommercialInvoice,
        Severity::Critical,
        "customs valuation is impossible without it",
    ),
    (
        DocumentType::BillOfLading,
        Severity::Critical,
        "cargo cannot be released without it",
    ),
    (
        DocumentType::CertificateOfOrigin,
        Severity::Major,
        "duty assessment usually requires it",
    ),
    (
        DocumentType::PackingList,
        Severity::Major,
        "physical inspection usually requires it",
    ),
];

pub fn check_customs_readiness(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    REQUIRED_FOR_CUSTOMS
        .iter()
        .filter(|(ty, _, _)| first_of(docs, *ty).is_none())
        .map(|(ty, severity, why)| {
            cross_issue(
                "customsReadiness",
                *severity,
                format!("No {} in the package; {why}", ty.as_str()),
                vec![(*ty, "missing".to_string())],
            )
        })
        .collect()
}
