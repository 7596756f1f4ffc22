//! Document-number and certificate cross-checks: credit number, LOI
//! references, weight out-turn, export license, ownership, tank
//! cleanliness.

use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};
use crate::normalize::names::names_match;
use crate::normalize::values::{extract_specified_number, specified};

use super::{cross_issue, first_of, rule_date, RuleContext};

/// Reference-number normalization: case, spaces, and dashes are noise.
fn canonical_reference(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Every document quoting the credit number must quote the same one.
pub fn check_lc_number_consistency(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let quoted: Vec<(DocumentType, &str)> = docs
        .iter()
        .filter_map(|d| specified(d.extracted.lc_number.as_deref()).map(|n| (d.doc_type, n)))
        .collect();

    if quoted.len() < 2 {
        return None;
    }

    let reference = canonical_reference(quoted[0].1);
    let divergent = quoted
        .iter()
        .find(|(_, n)| canonical_reference(n) != reference)?;

    Some(cross_issue(
        "lcNumber",
        Severity::Critical,
        format!(
            "Credit number \"{}\" on the {} does not match \"{}\" on the {}",
            divergent.1,
            divergent.0.as_str(),
            quoted[0].1,
            quoted[0].0.as_str(),
        ),
        quoted
            .iter()
            .map(|(ty, value)| (*ty, value.to_string()))
            .collect(),
    ))
}

/// The letter of indemnity must reference the B/L and invoice it indemnifies.
pub fn check_loi_cross_references(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(loi_doc) = first_of(docs, DocumentType::LetterOfIndemnity) else {
        return issues;
    };
    let Some(loi) = loi_doc.extracted.loi.as_ref() else {
        return issues;
    };

    let references = [
        (
            "B/L number",
            loi.bl_number.as_deref(),
            first_of(docs, DocumentType::BillOfLading),
        ),
        (
            "invoice number",
            loi.invoice_number.as_deref(),
            first_of(docs, DocumentType::CommercialInvoice),
        ),
    ];

    for (label, quoted, target) in references {
        let (Some(quoted), Some(target)) = (specified(quoted), target) else {
            continue;
        };
        let Some(actual) = specified(target.extracted.document_number.as_deref()) else {
            continue;
        };

        if canonical_reference(quoted) == canonical_reference(actual) {
            continue;
        }

        issues.push(cross_issue(
            "loiReference",
            Severity::Major,
            format!(
                "LOI quotes {label} \"{quoted}\" but the {} shows \"{actual}\"",
                target.doc_type.as_str(),
            ),
            vec![
                (DocumentType::LetterOfIndemnity, quoted.to_string()),
                (target.doc_type, actual.to_string()),
            ],
        ));
    }

    issues
}

/// Discharged quantity must agree with the B/L quantity within the
/// effective tolerance; shortage and overage are both reviewable.
pub fn check_weight_outturn(docs: &[DocumentResult], ctx: &RuleContext) -> Option<CrossRefIssue> {
    let report = first_of(docs, DocumentType::WeightOutturnReport)?;
    let outturn = report.extracted.outturn.as_ref()?;

    let delivered = extract_specified_number(outturn.outturn_quantity.as_deref())?;
    let shipped = extract_specified_number(outturn.bl_quantity.as_deref()).or_else(|| {
        first_of(docs, DocumentType::BillOfLading)
            .and_then(|bl| extract_specified_number(bl.extracted.quantity.as_deref()))
    })?;
    if shipped <= 0.0 {
        return None;
    }

    let deviation_pct = (delivered - shipped).abs() / shipped * 100.0;
    if deviation_pct <= ctx.quantity_tolerance.pct {
        return None;
    }

    let direction = if delivered < shipped { "shortage" } else { "overage" };
    Some(cross_issue(
        "outturnQuantity",
        Severity::Major,
        format!(
            "Out-turn {direction}: {delivered} delivered against {shipped} shipped \
             ({deviation_pct:.1}% apart, outside the {tolerance})",
            tolerance = ctx.quantity_tolerance.describe(),
        ),
        vec![
            (DocumentType::BillOfLading, format!("{shipped}")),
            (DocumentType::WeightOutturnReport, format!("{delivered}")),
        ],
    ))
}

/// The export license must cover the actual exporter and still be valid
/// when the goods ship.
pub fn check_export_license(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(license_doc) = first_of(docs, DocumentType::ExportLicense) else {
        return issues;
    };
    let Some(license) = license_doc.extracted.export_license.as_ref() else {
        return issues;
    };

    let exporter = specified(license.exporter.as_deref());
    let beneficiary = docs
        .iter()
        .filter(|d| {
            matches!(
                d.doc_type,
                DocumentType::LetterOfCredit | DocumentType::CommercialInvoice
            )
        })
        .find_map(|d| specified(d.extracted.beneficiary.as_deref()));

    if let (Some(exporter), Some(beneficiary)) = (exporter, beneficiary) {
        if !names_match(exporter, beneficiary) {
            issues.push(cross_issue(
                "exportLicense",
                Severity::Major,
                format!(
                    "Export license names exporter \"{exporter}\" but the shipment \
                     beneficiary is \"{beneficiary}\""
                ),
                vec![
                    (DocumentType::ExportLicense, exporter.to_string()),
                    (DocumentType::LetterOfCredit, beneficiary.to_string()),
                ],
            ));
        }
    }

    let expiry = rule_date(license.expiry_date.as_deref());
    let shipment = first_of(docs, DocumentType::BillOfLading)
        .and_then(|bl| rule_date(bl.extracted.shipment_date.as_deref()));

    if let (Some(expiry), Some(shipped)) = (expiry, shipment) {
        if expiry < shipped {
            issues.push(cross_issue(
                "exportLicense",
                Severity::Critical,
                format!("Export license expired {expiry}, before shipment on {shipped}"),
                vec![
                    (DocumentType::ExportLicense, expiry.to_string()),
                    (DocumentType::BillOfLading, shipped.to_string()),
                ],
            ));
        }
    }

    issues
}

/// The certificate of ownership must name the credit's applicant as buyer.
pub fn check_ownership_buyer(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let ownership = first_of(docs, DocumentType::CertificateOfOwnership)?
        .extracted
        .ownership
        .as_ref()?;
    let buyer = specified(ownership.buyer.as_deref())?;

    let applicant = specified(
        first_of(docs, DocumentType::LetterOfCredit)?
            .extracted
            .applicant
            .as_deref(),
    )?;

    if names_match(buyer, applicant) {
        return None;
    }

    Some(cross_issue(
        "buyer",
        Severity::Major,
        format!(
            "Certificate of ownership names buyer \"{buyer}\" but the credit \
             applicant is \"{applicant}\""
        ),
        vec![
            (DocumentType::CertificateOfOwnership, buyer.to_string()),
            (DocumentType::LetterOfCredit, applicant.to_string()),
        ],
    ))
}

/// Tanks must be certified clean before loading, not after.
pub fn check_tank_cleanliness_dating(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let tank_doc = first_of(docs, DocumentType::TankCleanlinessCertificate)?;
    let inspected = rule_date(
        tank_doc
            .extracted
            .tank_inspection
            .as_ref()
            .and_then(|t| t.inspection_date.as_deref()),
    )?;

    let bl_date = first_of(docs, DocumentType::BillOfLading).and_then(|bl| {
        rule_date(bl.extracted.shipment_date.as_deref())
            .or_else(|| rule_date(bl.extracted.document_date.as_deref()))
    })?;

    if inspected <= bl_date {
        return None;
    }

    Some(cross_issue(
        "tankCleanliness",
        Severity::Major,
        format!(
            "Tank cleanliness inspection dated {inspected}, after the goods were \
             loaded on {bl_date}"
        ),
        vec![
            (DocumentType::BillOfLading, bl_date.to_string()),
            (
                DocumentType::TankCleanlinessCertificate,
                inspected.to_string(),
            ),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossref::testutil::doc;
    use crate::crossref::{QuantityTolerance, ToleranceSource};
    use crate::models::{
        ExportLicenseDetails, ExtractedData, LoiDetails, OutturnDetails, OwnershipDetails,
        PaymentMode, TankInspectionDetails,
    };
    use chrono::NaiveDate;

    fn ctx() -> RuleContext {
        RuleContext {
            today: NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
            payment_mode: PaymentMode::Lc,
            quantity_tolerance: QuantityTolerance {
                pct: 5.0,
                source: ToleranceSource::Default,
            },
        }
    }

    fn with_lc_number(ty: DocumentType, number: &str) -> DocumentResult {
        doc(
            ty,
            ExtractedData {
                lc_number: Some(number.into()),
                ..Default::default()
            },
        )
    }

    // ── Credit number ───────────────────────────────────────────────

    #[test]
    fn formatting_differences_in_credit_number_are_ignored() {
        let docs = vec![
            with_lc_number(DocumentType::LetterOfCredit, "LC-2026-00451"),
            with_lc_number(DocumentType::CommercialInvoice, "LC 2026 00451"),
            with_lc_number(DocumentType::BillOfExchange, "lc202600451"),
        ];
        assert!(check_lc_number_consistency(&docs).is_none());
    }

    #[test]
    fn divergent_credit_number_is_critical() {
        let docs = vec![
            with_lc_number(DocumentType::LetterOfCredit, "LC-2026-00451"),
            with_lc_number(DocumentType::PackingList, "LC-2026-00452"),
        ];
        let issue = check_lc_number_consistency(&docs).unwrap();
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.field, "lcNumber");
        assert_eq!(issue.documents.len(), 2);
    }

    // ── LOI references ──────────────────────────────────────────────

    #[test]
    fn loi_quoting_wrong_bl_number_is_major() {
        let loi = doc(
            DocumentType::LetterOfIndemnity,
            ExtractedData {
                loi: Some(LoiDetails {
                    bl_number: Some("GSL-8841".into()),
                    invoice_number: Some("INV-1002".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                document_number: Some("GSL-8842".into()),
                ..Default::default()
            },
        );
        let invoice = doc(
            DocumentType::CommercialInvoice,
            ExtractedData {
                document_number: Some("INV-1002".into()),
                ..Default::default()
            },
        );
        let issues = check_loi_cross_references(&[loi, bl, invoice]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "loiReference");
        assert!(issues[0].description.contains("GSL-8841"));
    }

    // ── Weight out-turn ─────────────────────────────────────────────

    #[test]
    fn outturn_shortage_beyond_tolerance_is_major() {
        let report = doc(
            DocumentType::WeightOutturnReport,
            ExtractedData {
                outturn: Some(OutturnDetails {
                    bl_quantity: Some("10,000 MT".into()),
                    outturn_quantity: Some("9,200 MT".into()),
                    unit: Some("MT".into()),
                }),
                ..Default::default()
            },
        );
        let issue = check_weight_outturn(&[report], &ctx()).unwrap();
        assert_eq!(issue.severity, Severity::Major);
        assert!(issue.description.contains("shortage"));
        assert!(issue.description.contains("8.0%"));
    }

    #[test]
    fn outturn_within_tolerance_is_clean() {
        let report = doc(
            DocumentType::WeightOutturnReport,
            ExtractedData {
                outturn: Some(OutturnDetails {
                    bl_quantity: Some("10,000".into()),
                    outturn_quantity: Some("9,700".into()),
                    unit: None,
                }),
                ..Default::default()
            },
        );
        assert!(check_weight_outturn(&[report], &ctx()).is_none());
    }

    #[test]
    fn outturn_falls_back_to_bl_quantity() {
        let report = doc(
            DocumentType::WeightOutturnReport,
            ExtractedData {
                outturn: Some(OutturnDetails {
                    bl_quantity: None,
                    outturn_quantity: Some("10,800".into()),
                    unit: None,
                }),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                quantity: Some("10,000".into()),
                ..Default::default()
            },
        );
        let issue = check_weight_outturn(&[report, bl], &ctx()).unwrap();
        assert!(issue.description.contains("overage"));
    }

    // ── Export license ──────────────────────────────────────────────

    #[test]
    fn expired_license_at_shipment_is_critical() {
        let license = doc(
            DocumentType::ExportLicense,
            ExtractedData {
                export_license: Some(ExportLicenseDetails {
                    exporter: Some("Acme Trading LLC".into()),
                    license_number: Some("EXP-19".into()),
                    expiry_date: Some("2026-02-01".into()),
                }),
                ..Default::default()
            },
        );
        let lc = doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                beneficiary: Some("Acme Trading LLC".into()),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                shipment_date: Some("2026-02-10".into()),
                ..Default::default()
            },
        );
        let issues = check_export_license(&[license, lc, bl]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].description.contains("expired"));
    }

    #[test]
    fn wrong_exporter_is_major() {
        let license = doc(
            DocumentType::ExportLicense,
            ExtractedData {
                export_license: Some(ExportLicenseDetails {
                    exporter: Some("Zenith Exports Ltd".into()),
                    license_number: None,
                    expiry_date: None,
                }),
                ..Default::default()
            },
        );
        let lc = doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                beneficiary: Some("Acme Trading LLC".into()),
                ..Default::default()
            },
        );
        let issues = check_export_license(&[license, lc]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Major);
    }

    // ── Ownership and tank cleanliness ──────────────────────────────

    #[test]
    fn ownership_buyer_mismatch_is_major() {
        let ownership = doc(
            DocumentType::CertificateOfOwnership,
            ExtractedData {
                ownership: Some(OwnershipDetails {
                    buyer: Some("Gulf Petro Industries".into()),
                    vessel_name: None,
                }),
                ..Default::default()
            },
        );
        let lc = doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                applicant: Some("Emirates Polymer Works LLC".into()),
                ..Default::default()
            },
        );
        let issue = check_ownership_buyer(&[ownership, lc]).unwrap();
        assert_eq!(issue.severity, Severity::Major);
        assert_eq!(issue.field, "buyer");
    }

    #[test]
    fn tank_inspection_after_loading_is_major() {
        let tank = doc(
            DocumentType::TankCleanlinessCertificate,
            ExtractedData {
                tank_inspection: Some(TankInspectionDetails {
                    vessel_name: None,
                    inspection_date: Some("2026-02-12".into()),
                    result: Some("clean".into()),
                }),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                shipment_date: Some("2026-02-10".into()),
                ..Default::default()
            },
        );
        let issue = check_tank_cleanliness_dating(&[tank, bl]).unwrap();
        assert_eq!(issue.severity, Severity::Major);
    }

    #[test]
    fn tank_inspected_before_loading_is_clean() {
        let tank = doc(
            DocumentType::TankCleanlinessCertificate,
            ExtractedData {
                tank_inspection: Some(TankInspectionDetails {
                    vessel_name: None,
                    inspection_date: Some("2026-02-08".into()),
                    result: Some("clean".into()),
                }),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                shipment_date: Some("2026-02-10".into()),
                ..Default::default()
            },
        );
        assert!(check_tank_cleanliness_dating(&[tank, bl]).is_none());
    }
}
