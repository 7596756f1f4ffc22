//! Transport rules: ports, shipment window, vessel identity, on-board
//! status, freight notation, carrier particulars, document dating.

use chrono::Duration;

use crate::config;
use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};
use crate::normalize::names::vessels_match;
use crate::normalize::ports::ports_match;
use crate::normalize::values::specified;

use super::{cross_issue, first_of, rule_date, RuleContext};

/// Ports of loading and discharge must agree across every document that
/// names them. Mismatch severity is `major`: the port rule itself is the
/// single source of truth here.
pub fn check_ports(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    fn loading(d: &DocumentResult) -> Option<&str> {
        specified(d.extracted.port_of_loading.as_deref())
    }
    fn discharge(d: &DocumentResult) -> Option<&str> {
        specified(d.extracted.port_of_discharge.as_deref())
    }
    let fields: [(&str, fn(&DocumentResult) -> Option<&str>); 2] =
        [("portOfLoading", loading), ("portOfDischarge", discharge)];

    for (field, get) in fields {
        let named: Vec<(DocumentType, &str)> = docs
            .iter()
            .filter_map(|d| get(d).map(|p| (d.doc_type, p)))
            .collect();
        if named.len() < 2 {
            continue;
        }

        let mismatch = named.iter().enumerate().find_map(|(i, (ty_a, a))| {
            named[i + 1..]
                .iter()
                .find(|(_, b)| !ports_match(a, b))
                .map(|(ty_b, b)| (*ty_a, *a, *ty_b, *b))
        });

        if let Some((ty_a, a, ty_b, b)) = mismatch {
            issues.push(cross_issue(
                field,
                Severity::Major,
                format!(
                    "Port \"{a}\" on the {} does not match \"{b}\" on the {}",
                    ty_a.as_str(),
                    ty_b.as_str(),
                ),
                named
                    .iter()
                    .map(|(ty, value)| (*ty, value.to_string()))
                    .collect(),
            ));
        }
    }

    issues
}

/// Shipment must happen inside the credit's window, and the credit must
/// still be alive today. All three breaches kill the presentation.
pub fn check_shipment_window(docs: &[DocumentResult], ctx: &RuleContext) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(lc) = first_of(docs, DocumentType::LetterOfCredit) else {
        return issues;
    };
    let terms = lc.extracted.lc.as_ref();
    let expiry = terms.and_then(|t| rule_date(t.expiry_date.as_deref()));
    let latest_shipment = terms.and_then(|t| rule_date(t.latest_shipment_date.as_deref()));

    let shipment = first_of(docs, DocumentType::BillOfLading)
        .and_then(|bl| rule_date(bl.extracted.shipment_date.as_deref()));

    if let (Some(shipped), Some(expiry)) = (shipment, expiry) {
        if shipped > expiry {
            issues.push(cross_issue(
                "lcExpiry",
                Severity::Critical,
                format!("Goods shipped {shipped} after the credit expired {expiry}"),
                vec![
                    (DocumentType::LetterOfCredit, expiry.to_string()),
                    (DocumentType::BillOfLading, shipped.to_string()),
                ],
            ));
        }
    }

    if let (Some(shipped), Some(latest)) = (shipment, latest_shipment) {
        if shipped > latest {
            issues.push(cross_issue(
                "latestShipmentDate",
                Severity::Critical,
                format!(
                    "Goods shipped {shipped} after the latest shipment date {latest} \
                     allowed by the credit"
                ),
                vec![
                    (DocumentType::LetterOfCredit, latest.to_string()),
                    (DocumentType::BillOfLading, shipped.to_string()),
                ],
            ));
        }
    }

    if let Some(expiry) = expiry {
        if expiry < ctx.today {
            issues.push(cross_issue(
                "lcExpiry",
                Severity::Critical,
                format!("The credit expired {expiry}; presentation is no longer possible"),
                vec![(DocumentType::LetterOfCredit, expiry.to_string())],
            ));
        }
    }

    issues
}

/// A vessel named in the credit must be the vessel on the B/L.
pub fn check_vessel_vs_credit(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let lc = first_of(docs, DocumentType::LetterOfCredit)?;
    let credit_vessel = specified(lc.extracted.vessel_name.as_deref())?;

    let bl = first_of(docs, DocumentType::BillOfLading)?;
    let bl_vessel = specified(bl.extracted.vessel_name.as_deref())?;

    if vessels_match(credit_vessel, bl_vessel) {
        return None;
    }

    Some(cross_issue(
        "vesselName",
        Severity::Major,
        format!(
            "Credit names vessel \"{credit_vessel}\" but the B/L shows \"{bl_vessel}\""
        ),
        vec![
            (DocumentType::LetterOfCredit, credit_vessel.to_string()),
            (DocumentType::BillOfLading, bl_vessel.to_string()),
        ],
    ))
}

/// Every vessel-bearing certificate must name the B/L's vessel.
pub fn check_vessel_certificates(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(reference) = first_of(docs, DocumentType::BillOfLading)
        .and_then(|bl| specified(bl.extracted.vessel_name.as_deref()))
    else {
        return issues;
    };

    for doc in docs {
        if matches!(
            doc.doc_type,
            DocumentType::BillOfLading | DocumentType::LetterOfCredit
        ) {
            continue;
        }

        let candidates = [
            doc.extracted.vessel_name.as_deref(),
            doc.extracted.loi.as_ref().and_then(|l| l.vessel_name.as_deref()),
            doc.extracted
                .ownership
                .as_ref()
                .and_then(|o| o.vessel_name.as_deref()),
            doc.extracted
                .tank_inspection
                .as_ref()
                .and_then(|t| t.vessel_name.as_deref()),
        ];

        let Some(vessel) = candidates.into_iter().find_map(specified) else {
            continue;
        };

        if vessels_match(reference, vessel) {
            continue;
        }

        issues.push(cross_issue(
            "vesselName",
            Severity::Major,
            format!(
                "Vessel \"{vessel}\" on the {} does not match \"{reference}\" on the B/L",
                doc.doc_type.as_str(),
            ),
            vec![
                (DocumentType::BillOfLading, reference.to_string()),
                (doc.doc_type, vessel.to_string()),
            ],
        ));
    }

    issues
}

/// An explicit "not shipped on board" notation is critical: received-for-
/// shipment bills are not acceptable under an on-board requirement.
pub fn check_shipped_on_board(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let bl = first_of(docs, DocumentType::BillOfLading)?;
    let on_board = bl.extracted.transport.as_ref()?.shipped_on_board?;

    if on_board {
        return None;
    }

    Some(cross_issue(
        "shippedOnBoard",
        Severity::Critical,
        "B/L does not evidence goods shipped on board".to_string(),
        vec![(DocumentType::BillOfLading, "false".to_string())],
    ))
}

fn freight_class(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("prepaid") {
        Some("prepaid")
    } else if lower.contains("collect") {
        Some("collect")
    } else {
        None
    }
}

/// Prepaid-vs-collect conflict between the credit and the B/L.
pub fn check_freight_notation(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let credit_terms = specified(
        first_of(docs, DocumentType::LetterOfCredit)?
            .extracted
            .lc
            .as_ref()
            .and_then(|lc| lc.freight_terms.as_deref()),
    )?;
    let notation = specified(
        first_of(docs, DocumentType::BillOfLading)?
            .extracted
            .transport
            .as_ref()
            .and_then(|t| t.freight_notation.as_deref()),
    )?;

    let credit_class = freight_class(credit_terms)?;
    let bl_class = freight_class(notation)?;
    if credit_class == bl_class {
        return None;
    }

    Some(cross_issue(
        "freightNotation",
        Severity::Critical,
        format!(
            "Credit requires freight {credit_class} but the B/L is marked \
             freight {bl_class}"
        ),
        vec![
            (DocumentType::LetterOfCredit, credit_terms.to_string()),
            (DocumentType::BillOfLading, notation.to_string()),
        ],
    ))
}

/// An unsigned B/L is worthless as a title document; a B/L that does not
/// identify its carrier is reviewable.
pub fn check_carrier(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(bl) = first_of(docs, DocumentType::BillOfLading) else {
        return issues;
    };
    let Some(transport) = bl.extracted.transport.as_ref() else {
        return issues;
    };

    if transport.carrier_signed != Some(true) {
        issues.push(cross_issue(
            "carrierSignature",
            Severity::Critical,
            "B/L carries no carrier or master signature".to_string(),
            vec![(DocumentType::BillOfLading, "unsigned".to_string())],
        ));
    }

    if specified(transport.carrier_name.as_deref()).is_none() {
        issues.push(cross_issue(
            "carrierName",
            Severity::Major,
            "B/L does not identify the carrier by name".to_string(),
            vec![(DocumentType::BillOfLading, "missing".to_string())],
        ));
    }

    issues
}

/// Certificate kinds that must be dated no later than one day after the B/L.
const DATED_WITH_BL: &[DocumentType] = &[
    DocumentType::InspectionCertificate,
    DocumentType::CertificateOfOrigin,
    DocumentType::CertificateOfQuality,
];

/// Supporting certificates issued well after the B/L suggest paperwork
/// created after the fact.
pub fn check_document_dating(docs: &[DocumentResult]) -> Vec<CrossRefIssue> {
    let mut issues = Vec::new();

    let Some(bl_date) = first_of(docs, DocumentType::BillOfLading).and_then(|bl| {
        rule_date(bl.extracted.shipment_date.as_deref())
            .or_else(|| rule_date(bl.extracted.document_date.as_deref()))
    }) else {
        return issues;
    };

    let limit = bl_date + Duration::days(config::MAX_CERT_DAYS_AFTER_BL);

    for doc in docs.iter().filter(|d| DATED_WITH_BL.contains(&d.doc_type)) {
        let cert_date = doc
            .extracted
            .certificate
            .as_ref()
            .and_then(|c| rule_date(c.issue_date.as_deref()))
            .or_else(|| rule_date(doc.extracted.document_date.as_deref()));
        let Some(cert_date) = cert_date else {
            continue;
        };

        if cert_date <= limit {
            continue;
        }

        issues.push(cross_issue(
            "documentDate",
            Severity::Major,
            format!(
                "{} dated {cert_date}, more than {} day(s) after the B/L date {bl_date}",
                doc.doc_type.as_str(),
                config::MAX_CERT_DAYS_AFTER_BL,
            ),
            vec![
                (DocumentType::BillOfLading, bl_date.to_string()),
                (doc.doc_type, cert_date.to_string()),
            ],
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossref::testutil::doc;
    use crate::crossref::{QuantityTolerance, ToleranceSource};
    use crate::models::{
        CertificateDetails, ExtractedData, LcTerms, PaymentMode, TransportDetails,
    };
    use chrono::NaiveDate;

    fn ctx_today(y: i32, m: u32, d: u32) -> RuleContext {
        RuleContext {
            today: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            payment_mode: PaymentMode::Lc,
            quantity_tolerance: QuantityTolerance {
                pct: 5.0,
                source: ToleranceSource::Default,
            },
        }
    }

    fn with_ports(ty: DocumentType, loading: Option<&str>, discharge: Option<&str>) -> DocumentResult {
        doc(
            ty,
            ExtractedData {
                port_of_loading: loading.map(Into::into),
                port_of_discharge: discharge.map(Into::into),
                ..Default::default()
            },
        )
    }

    // ── Ports ───────────────────────────────────────────────────────

    /// LC requires discharge at "Jebel Ali, UAE", B/L shows "Dubai, UAE" →
    /// one major portOfDischarge issue.
    #[test]
    fn discharge_port_mismatch_is_one_major_issue() {
        let docs = vec![
            with_ports(
                DocumentType::LetterOfCredit,
                Some("Houston, USA"),
                Some("Jebel Ali, UAE"),
            ),
            with_ports(
                DocumentType::BillOfLading,
                Some("Houston Terminal"),
                Some("Dubai, UAE"),
            ),
        ];
        let issues = check_ports(&docs);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "portOfDischarge");
        assert_eq!(issues[0].severity, Severity::Major);
        assert_eq!(issues[0].values, vec!["Jebel Ali, UAE", "Dubai, UAE"]);
    }

    #[test]
    fn matching_ports_are_clean() {
        let docs = vec![
            with_ports(
                DocumentType::LetterOfCredit,
                Some("Houston"),
                Some("Jebel Ali, UAE"),
            ),
            with_ports(
                DocumentType::BillOfLading,
                Some("Houston Terminal, USA"),
                Some("JEBEL ALI PORT"),
            ),
        ];
        assert!(check_ports(&docs).is_empty());
    }

    #[test]
    fn single_port_opinion_is_clean() {
        let docs = vec![
            with_ports(DocumentType::LetterOfCredit, None, Some("Jebel Ali")),
            with_ports(DocumentType::BillOfLading, Some("Houston"), None),
        ];
        assert!(check_ports(&docs).is_empty());
    }

    // ── Shipment window ─────────────────────────────────────────────

    fn lc_with_window(expiry: &str, latest: &str) -> DocumentResult {
        doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                lc: Some(LcTerms {
                    expiry_date: Some(expiry.into()),
                    latest_shipment_date: Some(latest.into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
    }

    fn bl_shipped(date: &str) -> DocumentResult {
        doc(
            DocumentType::BillOfLading,
            ExtractedData {
                shipment_date: Some(date.into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn shipment_inside_window_is_clean() {
        let docs = vec![
            lc_with_window("2026-03-15", "2026-02-28"),
            bl_shipped("2026-02-10"),
        ];
        assert!(check_shipment_window(&docs, &ctx_today(2026, 2, 15)).is_empty());
    }

    #[test]
    fn shipment_after_latest_date_is_critical() {
        let docs = vec![
            lc_with_window("2026-03-15", "2026-02-28"),
            bl_shipped("2026-03-05"),
        ];
        let issues = check_shipment_window(&docs, &ctx_today(2026, 3, 6));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "latestShipmentDate");
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn expired_credit_is_critical_even_unshipped() {
        let docs = vec![lc_with_window("2026-01-31", "2026-01-15")];
        let issues = check_shipment_window(&docs, &ctx_today(2026, 2, 15));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "lcExpiry");
        assert!(issues[0].description.contains("expired"));
    }

    #[test]
    fn shipment_after_expiry_flags_both_breaches() {
        let docs = vec![
            lc_with_window("2026-02-01", "2026-01-15"),
            bl_shipped("2026-02-10"),
        ];
        let issues = check_shipment_window(&docs, &ctx_today(2026, 2, 20));
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"lcExpiry"));
        assert!(fields.contains(&"latestShipmentDate"));
    }

    // ── Vessels ─────────────────────────────────────────────────────

    #[test]
    fn vessel_prefix_variants_match() {
        let lc = doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                vessel_name: Some("MV Ocean Pearl".into()),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                vessel_name: Some("M/V OCEAN PEARL".into()),
                ..Default::default()
            },
        );
        assert!(check_vessel_vs_credit(&[lc, bl]).is_none());
    }

    #[test]
    fn certificate_vessel_mismatch_is_major() {
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                vessel_name: Some("MV Ocean Pearl".into()),
                ..Default::default()
            },
        );
        let cert = doc(
            DocumentType::CertificateOfQuality,
            ExtractedData {
                vessel_name: Some("MT Gulf Star".into()),
                ..Default::default()
            },
        );
        let issues = check_vessel_certificates(&[bl, cert]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Major);
        assert_eq!(issues[0].documents[1], "certificate_of_quality");
    }

    // ── On-board, freight, carrier ──────────────────────────────────

    #[test]
    fn explicit_not_on_board_is_critical() {
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                transport: Some(TransportDetails {
                    shipped_on_board: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let issue = check_shipped_on_board(&[bl]).unwrap();
        assert_eq!(issue.severity, Severity::Critical);
    }

    #[test]
    fn unknown_on_board_status_is_no_opinion() {
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                transport: Some(TransportDetails::default()),
                ..Default::default()
            },
        );
        assert!(check_shipped_on_board(&[bl]).is_none());
    }

    #[test]
    fn freight_conflict_is_critical() {
        let lc = doc(
            DocumentType::LetterOfCredit,
            ExtractedData {
                lc: Some(LcTerms {
                    freight_terms: Some("FREIGHT PREPAID".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                transport: Some(TransportDetails {
                    freight_notation: Some("freight collect".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let issue = check_freight_notation(&[lc, bl]).unwrap();
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.field, "freightNotation");
    }

    #[test]
    fn unsigned_bl_and_missing_carrier_name() {
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                transport: Some(TransportDetails {
                    carrier_signed: Some(false),
                    carrier_name: None,
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let issues = check_carrier(&[bl]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "carrierSignature");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[1].field, "carrierName");
        assert_eq!(issues[1].severity, Severity::Major);
    }

    #[test]
    fn signed_and_named_carrier_is_clean() {
        let bl = doc(
            DocumentType::BillOfLading,
            ExtractedData {
                transport: Some(TransportDetails {
                    carrier_signed: Some(true),
                    carrier_name: Some("Gulf Shipping Lines".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        assert!(check_carrier(&[bl]).is_empty());
    }

    // ── Document dating ─────────────────────────────────────────────

    #[test]
    fn certificate_two_days_after_bl_is_major() {
        let bl = bl_shipped("2026-02-10");
        let cert = doc(
            DocumentType::CertificateOfOrigin,
            ExtractedData {
                certificate: Some(CertificateDetails {
                    issue_date: Some("2026-02-12".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let issues = check_document_dating(&[bl, cert]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "documentDate");
        assert_eq!(issues[0].severity, Severity::Major);
    }

    #[test]
    fn certificate_one_day_after_bl_is_clean() {
        let bl = bl_shipped("2026-02-10");
        let cert = doc(
            DocumentType::InspectionCertificate,
            ExtractedData {
                certificate: Some(CertificateDetails {
                    issue_date: Some("2026-02-11".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        assert!(check_document_dating(&[bl, cert]).is_empty());
    }
}
