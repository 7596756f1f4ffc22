//! Assembles one document's extraction output into a `DocumentResult`.
//!
//! Dates recovered by the label-driven regex scan are authoritative: when
//! the scan succeeds, its result overwrites whatever the collaborator
//! returned for that field. Once written here, no later stage touches them.

use crate::collaborators::ExtractionError;
use crate::models::{DocumentResult, DocumentType, ExtractedData};
use crate::normalize::dates::{self, RecoveredDates};

use super::parser::parse_extraction_response;

/// Build the immutable `DocumentResult` for one input document.
///
/// A transport failure or unusable response degrades to a WAIT fallback
/// carrying only what the date scan recovered deterministically.
pub fn assemble_document_result(
    doc_type: DocumentType,
    raw_text: &str,
    response: Result<String, ExtractionError>,
) -> DocumentResult {
    let recovered = dates::extract_labeled_dates(raw_text);

    let parsed = match response {
        Ok(raw) => match parse_extraction_response(&raw) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                tracing::warn!(
                    doc_type = doc_type.as_str(),
                    %error,
                    "Extraction response unusable, falling back to deterministic fields"
                );
                None
            }
        },
        Err(error) => {
            tracing::warn!(
                doc_type = doc_type.as_str(),
                %error,
                "Extraction call failed, falling back to deterministic fields"
            );
            None
        }
    };

    match parsed {
        Some(parsed) => {
            let mut extracted = parsed.extracted;
            canonicalize_dates(&mut extracted);
            apply_date_overrides(&mut extracted, doc_type, &recovered);
            DocumentResult {
                doc_type,
                verdict: parsed.verdict,
                issues: parsed.issues,
                extracted,
                analysis: parsed.analysis,
                raw_text: raw_text.to_string(),
            }
        }
        None => {
            let mut extracted = ExtractedData::default();
            apply_date_overrides(&mut extracted, doc_type, &recovered);
            DocumentResult::fallback(doc_type, extracted, raw_text.to_string())
        }
    }
}

/// Rewrite collaborator-supplied date strings into canonical `YYYY-MM-DD`.
/// Unparseable values are left as-is; the rules treat them as "no opinion".
fn canonicalize_dates(extracted: &mut ExtractedData) {
    for slot in [
        &mut extracted.shipment_date,
        &mut extracted.document_date,
    ] {
        recanonicalize(slot);
    }
    if let Some(lc) = extracted.lc.as_mut() {
        recanonicalize(&mut lc.expiry_date);
        recanonicalize(&mut lc.latest_shipment_date);
    }
    if let Some(cert) = extracted.certificate.as_mut() {
        recanonicalize(&mut cert.issue_date);
        recanonicalize(&mut cert.inspection_date);
    }
    if let Some(license) = extracted.export_license.as_mut() {
        recanonicalize(&mut license.expiry_date);
    }
    if let Some(tank) = extracted.tank_inspection.as_mut() {
        recanonicalize(&mut tank.inspection_date);
    }
}

fn recanonicalize(slot: &mut Option<String>) {
    if let Some(text) = slot.as_deref() {
        if let Some(canonical) = dates::canonicalize(text) {
            *slot = Some(canonical);
        }
    }
}

/// Apply the authoritative regex-derived dates over the collaborator's
/// guesses. Shipment date applies to any document; expiry and latest
/// shipment are credit terms and land on the letter of credit.
fn apply_date_overrides(
    extracted: &mut ExtractedData,
    doc_type: DocumentType,
    recovered: &RecoveredDates,
) {
    if let Some(shipment) = recovered.shipment {
        extracted.shipment_date = Some(dates::format_date(shipment));
    }

    if doc_type == DocumentType::LetterOfCredit {
        if recovered.expiry.is_some() || recovered.latest_shipment.is_some() {
            let lc = extracted.lc.get_or_insert_with(Default::default);
            if let Some(expiry) = recovered.expiry {
                lc.expiry_date = Some(dates::format_date(expiry));
            }
            if let Some(latest) = recovered.latest_shipment {
                lc.latest_shipment_date = Some(dates::format_date(latest));
            }
        }
    }
}
