//! Cross-reference rule set.
//!
//! Each rule is a pure function over the immutable, complete list of
//! `DocumentResult`s, appending zero or more `CrossRefIssue`s. Rules are
//! independent, tolerate any subset of documents being absent, and never
//! fire on an absent value. Reference documents are declared per field (the
//! credit for quantity and goods, the B/L for vessels) rather than
//! "whichever document came first".

pub mod amounts;
pub mod customs;
pub mod documents;
pub mod goods;
pub mod math;
pub mod parties;
pub mod shipping;

use chrono::NaiveDate;

use crate::collaborators::GoodsComparator;
use crate::config;
use crate::models::{CrossRefIssue, DocumentResult, DocumentType, PaymentMode, Severity};

/// Where the effective quantity tolerance came from; reported verbatim in
/// issue descriptions so the verdict is self-explaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceSource {
    CreditTerms,
    Default,
}

#[derive(Debug, Clone, Copy)]
pub struct QuantityTolerance {
    pub pct: f64,
    pub source: ToleranceSource,
}

impl QuantityTolerance {
    pub fn describe(&self) -> String {
        match self.source {
            ToleranceSource::CreditTerms => {
                format!("{}% tolerance stated in the credit", self.pct)
            }
            ToleranceSource::Default => format!("default {}% tolerance", self.pct),
        }
    }
}

/// Shared, read-only inputs to every rule invocation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub today: NaiveDate,
    pub payment_mode: PaymentMode,
    pub quantity_tolerance: QuantityTolerance,
}

impl RuleContext {
    /// Derive the context for a package: payment mode from the presence of
    /// a letter of credit, tolerance from its terms (default 5% otherwise).
    pub fn for_package(docs: &[DocumentResult], today: NaiveDate) -> Self {
        let payment_mode = payment_mode(docs);

        let quantity_tolerance = first_of(docs, DocumentType::LetterOfCredit)
            .and_then(|lc| lc.extracted.lc.as_ref())
            .and_then(|terms| terms.tolerance.as_deref())
            .and_then(amounts::parse_credit_tolerance)
            .map(|pct| QuantityTolerance {
                pct,
                source: ToleranceSource::CreditTerms,
            })
            .unwrap_or(QuantityTolerance {
                pct: config::DEFAULT_QUANTITY_TOLERANCE_PCT,
                source: ToleranceSource::Default,
            });

        Self {
            today,
            payment_mode,
            quantity_tolerance,
        }
    }
}

/// The package is an LC-backed presentation iff a letter of credit is
/// present; otherwise it is a customs-only shipment.
pub fn payment_mode(docs: &[DocumentResult]) -> PaymentMode {
    if docs
        .iter()
        .any(|d| d.doc_type == DocumentType::LetterOfCredit)
    {
        PaymentMode::Lc
    } else {
        PaymentMode::NoLc
    }
}

/// Run every active rule over the completed document set.
///
/// The sync rules are pure computation; the goods-description rule fans out
/// to the external comparator and its calls complete in arbitrary order, so
/// the returned list has no ordering guarantee. Sort before asserting.
pub async fn run_cross_checks(
    docs: &[DocumentResult],
    ctx: &RuleContext,
    comparator: &dyn GoodsComparator,
) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    // Mode-independent document-consistency rules.
    issues.extend(shipping::check_ports(docs));
    issues.extend(shipping::check_shipped_on_board(docs));
    issues.extend(shipping::check_carrier(docs));
    issues.extend(shipping::check_document_dating(docs));
    issues.extend(shipping::check_vessel_certificates(docs));
    issues.extend(amounts::check_quantity_tolerance(docs, ctx));
    issues.extend(math::check_packing_list_math(docs));
    issues.extend(math::check_ullage_math(docs));
    issues.extend(math::check_invoice_math(docs));
    issues.extend(documents::check_loi_cross_references(docs));
    issues.extend(documents::check_weight_outturn(docs, ctx));
    issues.extend(documents::check_export_license(docs));
    issues.extend(documents::check_tank_cleanliness_dating(docs));

    match ctx.payment_mode {
        PaymentMode::Lc => {
            issues.extend(amounts::check_amount_vs_credit(docs));
            issues.extend(amounts::check_insurance_coverage(docs));
            issues.extend(parties::check_beneficiary_consistency(docs));
            issues.extend(parties::check_consignee_order_party(docs));
            issues.extend(parties::check_inspection_company(docs));
            issues.extend(shipping::check_shipment_window(docs, ctx));
            issues.extend(shipping::check_vessel_vs_credit(docs));
            issues.extend(shipping::check_freight_notation(docs));
            issues.extend(documents::check_lc_number_consistency(docs));
            issues.extend(documents::check_ownership_buyer(docs));
            issues.extend(goods::check_goods_descriptions(docs, comparator).await);
        }
        PaymentMode::NoLc => {
            issues.extend(customs::check_customs_readiness(docs));
        }
    }

    issues
}

// ---------------------------------------------------------------------------
// Shared rule plumbing
// ---------------------------------------------------------------------------

/// First document of a given type, if present.
pub(crate) fn first_of(docs: &[DocumentResult], ty: DocumentType) -> Option<&DocumentResult> {
    docs.iter().find(|d| d.doc_type == ty)
}

/// All documents of a given type.
pub(crate) fn all_of(
    docs: &[DocumentResult],
    ty: DocumentType,
) -> impl Iterator<Item = &DocumentResult> {
    docs.iter().filter(move |d| d.doc_type == ty)
}

/// Build one issue from parallel (document, value) pairs.
pub(crate) fn cross_issue(
    field: &str,
    severity: Severity,
    description: String,
    involved: Vec<(DocumentType, String)>,
) -> CrossRefIssue {
    let (documents, values) = involved
        .into_iter()
        .map(|(d, v)| (d.as_str().to_string(), v))
        .unzip();
    CrossRefIssue {
        field: field.to_string(),
        documents,
        values,
        severity,
        description,
    }
}

/// Parse a canonical or near-canonical date field for comparison.
pub(crate) fn rule_date(value: Option<&str>) -> Option<NaiveDate> {
    crate::normalize::values::specified(value).and_then(crate::normalize::dates::parse_date)
}
