//! Amount, insurance-coverage, and quantity-tolerance rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::models::{CrossRefIssue, DocumentResult, DocumentType, PaymentMode, Severity};
use crate::normalize::values::extract_specified_number;

use super::{cross_issue, first_of, RuleContext};

static RE_PLUS_MINUS_PCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+\s*/?\s*-\s*(\d+(?:\.\d+)?)\s*%").expect("static tolerance pattern")
});
static RE_MORE_OR_LESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:pct|percent|%)\s+more\s+or\s+less")
        .expect("static tolerance pattern")
});

/// Parse an explicit tolerance clause from credit terms:
/// `+/- 5%` or `5 PCT MORE OR LESS`.
pub fn parse_credit_tolerance(text: &str) -> Option<f64> {
    RE_PLUS_MINUS_PCT
        .captures(text)
        .or_else(|| RE_MORE_OR_LESS.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Invoice amount exceeding the credit amount is a critical discrepancy;
/// banks refuse drawings over the credit.
pub fn check_amount_vs_credit(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let lc = first_of(docs, DocumentType::LetterOfCredit)?;
    let invoice = first_of(docs, DocumentType::CommercialInvoice)?;

    let credit_amount = extract_specified_number(lc.extracted.amount.as_deref())?;
    let invoice_amount = extract_specified_number(invoice.extracted.amount.as_deref())?;

    if invoice_amount <= credit_amount {
        return None;
    }

    let overage_pct = (invoice_amount - credit_amount) / credit_amount * 100.0;
    Some(cross_issue(
        "amount",
        Severity::Critical,
        format!(
            "Invoice amount {invoice_amount:.2} exceeds the credit amount \
             {credit_amount:.2} by {overage_pct:.1}%"
        ),
        vec![
            (
                DocumentType::LetterOfCredit,
                lc.extracted.amount.clone().unwrap_or_default(),
            ),
            (
                DocumentType::CommercialInvoice,
                invoice.extracted.amount.clone().unwrap_or_default(),
            ),
        ],
    ))
}

/// Insurance cover must be at least 110% of the invoice (fallback: credit)
/// amount.
pub fn check_insurance_coverage(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let cert = first_of(docs, DocumentType::InsuranceCertificate)?;

    let insured = cert
        .extracted
        .insurance
        .as_ref()
        .and_then(|i| extract_specified_number(i.insured_amount.as_deref()))
        .or_else(|| extract_specified_number(cert.extracted.amount.as_deref()))?;

    let (reference_type, reference_amount) = reference_amount(docs)?;
    if reference_amount <= 0.0 {
        return None;
    }

    let coverage_pct = insured / reference_amount * 100.0;
    if coverage_pct >= config::MIN_INSURANCE_COVERAGE_PCT {
        return None;
    }

    Some(cross_issue(
        "insuranceCoverage",
        Severity::Major,
        format!(
            "Insured value {insured:.2} covers only {coverage_pct:.1}% of the \
             {reference} amount {reference_amount:.2}; at least {min:.0}% is required",
            reference = reference_type.as_str(),
            min = config::MIN_INSURANCE_COVERAGE_PCT,
        ),
        vec![
            (DocumentType::InsuranceCertificate, format!("{insured:.2}")),
            (reference_type, format!("{reference_amount:.2}")),
        ],
    ))
}

/// The commercial invoice is the coverage reference; the credit amount is
/// the fallback.
fn reference_amount(docs: &[DocumentResult]) -> Option<(DocumentType, f64)> {
    for ty in [DocumentType::CommercialInvoice, DocumentType::LetterOfCredit] {
        if let Some(amount) = first_of(docs, ty)
            .and_then(|d| extract_specified_number(d.extracted.amount.as_deref()))
        {
            return Some((ty, amount));
        }
    }
    None
}

/// Every quantity-bearing document must agree with the declared reference
/// (the credit, or the invoice in a customs-only package) within the
/// effective tolerance. The tolerance source is reported in each issue.
pub fn check_quantity_tolerance(docs: &[DocumentResult], ctx: &RuleContext) -> Vec<CrossRefIssue> {
    let reference_type = match ctx.payment_mode {
        PaymentMode::Lc => DocumentType::LetterOfCredit,
        PaymentMode::NoLc => DocumentType::CommercialInvoice,
    };

    let Some(reference) = first_of(docs, reference_type) else {
        return vec![];
    };
    let Some(reference_qty) =
        extract_specified_number(reference.extracted.quantity.as_deref())
    else {
        return vec![];
    };
    if reference_qty <= 0.0 {
        return vec![];
    }

    let tolerance = ctx.quantity_tolerance;
    let mut issues = Vec::new();

    for doc in docs.iter().filter(|d| d.doc_type != reference_type) {
        let Some(qty) = extract_specified_number(doc.extracted.quantity.as_deref()) else {
            continue;
        };

        let deviation_pct = (qty - reference_qty).abs() / reference_qty * 100.0;
        if deviation_pct <= tolerance.pct {
            continue;
        }

        issues.push(cross_issue(
            "quantity",
            Severity::Major,
            format!(
                "Quantity {qty} on the {doc} deviates {deviation_pct:.1}% from the \
                 {reference} quantity {reference_qty}, outside the {tolerance}",
                doc = doc.doc_type.as_str(),
                reference = reference_type.as_str(),
                tolerance = tolerance.describe(),
            ),
            vec![
                (reference_type, format!("{reference_qty}")),
                (doc.doc_type, format!("{qty}")),
            ],
        ));
    }

    issues
}
