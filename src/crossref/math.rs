//! Deterministic sum verification.
//!
//! Line items are summed here, in this process; a collaborator's printed
//! arithmetic is never trusted. A printed total that disagrees with its own
//! line items beyond tolerance is a critical discrepancy regardless of what
//! any other document says.

use crate::config;
use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};

use super::{all_of, cross_issue};

/// Sum the values if every row supplies one; a row with no figure makes the
/// sum meaningless, which suppresses the check rather than mis-firing it.
fn complete_sum(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for value in values {
        total += value?;
        any = true;
    }
    any.then_some(total)
}

/// Packing-list net weights must reconcile with the printed total within
/// 1 kg.
pub fn check_packing_list_math(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    for doc in all_of(docs, DocumentType::PackingList) {
        let Some(packing) = doc.extracted.packing.as_ref() else {
            continue;
        };
        let Some(printed) = packing.printed_total_net_kg else {
            continue;
        };
        let Some(computed) = complete_sum(packing.rows.iter().map(|r| r.net_weight_kg)) else {
            continue;
        };

        let difference = (computed - printed).abs();
        if difference <= config::PACKING_WEIGHT_TOLERANCE_KG {
            continue;
        }

        issues.push(cross_issue(
            "packingListMath",
            Severity::Critical,
            format!(
                "Packing list rows sum to {computed:.2} kg but the printed total \
                 is {printed:.2} kg ({difference:.2} kg apart)"
            ),
            vec![
                (DocumentType::PackingList, format!("{computed:.2}")),
                (DocumentType::PackingList, format!("{printed:.2}")),
            ],
        ));
    }

    issues
}

/// Ullage tank volumes must reconcile with the printed total within 0.1%.
pub fn check_ullage_math(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    for doc in all_of(docs, DocumentType::UllageReport) {
        let Some(ullage) = doc.extracted.ullage.as_ref() else {
            continue;
        };
        let Some(printed) = ullage.printed_total_volume else {
            continue;
        };
        if printed <= 0.0 {
            continue;
        }
        let Some(computed) = complete_sum(ullage.tanks.iter().map(|t| t.volume)) else {
            continue;
        };

        let difference_pct = (computed - printed).abs() / printed * 100.0;
        if difference_pct <= config::ULLAGE_VOLUME_TOLERANCE_PCT {
            continue;
        }

        issues.push(cross_issue(
            "ullageMath",
            Severity::Critical,
            format!(
                "Tank volumes sum to {computed:.3} but the printed total is \
                 {printed:.3} ({difference_pct:.2}% apart)"
            ),
            vec![
                (DocumentType::UllageReport, format!("{computed:.3}")),
                (DocumentType::UllageReport, format!("{printed:.3}")),
            ],
        ));
    }

    issues
}

/// Invoice line totals must reconcile with the printed total within the
/// larger of $1 and 0.01%.
pub fn check_invoice_math(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    for doc in all_of(docs, DocumentType::CommercialInvoice) {
        let Some(lines) = doc.extracted.invoice_lines.as_ref() else {
            continue;
        };
        let Some(printed) = lines.printed_total else {
            continue;
        };
        let Some(computed) = complete_sum(lines.items.iter().map(line_total)) else {
            continue;
        };

        let tolerance = config::INVOICE_TOTAL_TOLERANCE_ABS
            .max(printed.abs() * config::INVOICE_TOTAL_TOLERANCE_PCT / 100.0);
        let difference = (computed - printed).abs();
        if difference <= tolerance {
            continue;
        }

        issues.push(cross_issue(
            "invoiceMath",
            Severity::Critical,
            format!(
                "Invoice line items sum to {computed:.2} but the printed total \
                 is {printed:.2} ({difference:.2} apart)"
            ),
            vec![
                (DocumentType::CommercialInvoice, format!("{computed:.2}")),
                (DocumentType::CommercialInvoice, format!("{printed:.2}")),
            ],
        ));
    }

    issues
}

/// A line's value: its printed total, or quantity × unit price when the
/// line total itself was not extracted.
fn line_total(item: &crate::models::InvoiceLineItem) -> Option<f64> {
    item.line_total
        .or_else(|| match (item.quantity, item.unit_price) {
            (Some(q), Some(p)) => Some(q * p),
            _ => None,
        })
}
