//! Party-identity rules: beneficiary, consignee/order party, inspection
//! company.

use crate::models::{CrossRefIssue, DocumentResult, DocumentType, Severity};
use crate::normalize::names::{canonical_name, names_match};
use crate::normalize::values::specified;

use super::{cross_issue, first_of};

/// Document kinds that name the beneficiary.
const BENEFICIARY_BEARING: &[DocumentType] = &[
    DocumentType::LetterOfCredit,
    DocumentType::CommercialInvoice,
    DocumentType::BillOfLading,
    DocumentType::PackingList,
    DocumentType::CertificateOfOrigin,
    DocumentType::InsuranceCertificate,
    DocumentType::BeneficiaryCertificate,
];

/// The beneficiary must be the same party on every document that names one.
/// Any non-matching pair is critical: a bank will refuse documents made
/// out to a different party.
pub fn check_beneficiary_consistency(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let named: Vec<(DocumentType, &str)> = docs
        .iter()
        .filter(|d| BENEFICIARY_BEARING.contains(&d.doc_type))
        .filter_map(|d| {
            specified(d.extracted.beneficiary.as_deref()).map(|b| (d.doc_type, b))
        })
        .collect();

    if named.len() < 2 {
        return None;
    }

    let mismatch = named.iter().enumerate().find_map(|(i, (ty_a, a))| {
        named[i + 1..]
            .iter()
            .find(|(_, b)| !names_match(a, b))
            .map(|(ty_b, b)| (*ty_a, *a, *ty_b, *b))
    })?;

    let (ty_a, a, ty_b, b) = mismatch;
    Some(cross_issue(
        "beneficiary",
        Severity::Critical,
        format!(
            "Beneficiary \"{a}\" on the {} does not match \"{b}\" on the {}",
            ty_a.as_str(),
            ty_b.as_str(),
        ),
        named
            .iter()
            .map(|(ty, value)| (*ty, value.to_string()))
            .collect(),
    ))
}

/// Words too generic to identify a bank on their own.
const GENERIC_BANK_WORDS: &[&str] = &[
    "bank", "banking", "the", "of", "and", "for", "co", "company", "limited", "ltd", "plc",
    "inc", "corp", "corporation", "international", "national", "group", "trust", "branch",
];

/// The B/L consignee must be made out "to order"; when made out
/// "to order of X", X must reference the issuing bank by a distinctive
/// word. Title routed to the wrong party is critical; a missing order
/// clause is reviewable.
pub fn check_consignee_order_party(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let bl = first_of(docs, DocumentType::BillOfLading)?;
    let consignee = specified(
        bl.extracted
            .transport
            .as_ref()
            .and_then(|t| t.consignee.as_deref()),
    )?;

    let lower = consignee.to_lowercase();
    if !lower.contains("to order") {
        return Some(cross_issue(
            "consignee",
            Severity::Major,
            format!("B/L consignee \"{consignee}\" is not made out to order"),
            vec![(DocumentType::BillOfLading, consignee.to_string())],
        ));
    }

    let Some(order_party) = lower.split("to order of").nth(1).map(str::trim) else {
        // Blank "to order" endorsement is acceptable.
        return None;
    };
    if order_party.is_empty() {
        return None;
    }

    let issuing_bank = specified(
        first_of(docs, DocumentType::LetterOfCredit)?
            .extracted
            .lc
            .as_ref()
            .and_then(|lc| lc.issuing_bank.as_deref()),
    )?;

    if references_bank(order_party, issuing_bank) {
        return None;
    }

    Some(cross_issue(
        "consignee",
        Severity::Critical,
        format!(
            "B/L is consigned to order of \"{order_party}\" which does not \
             reference the issuing bank \"{issuing_bank}\""
        ),
        vec![
            (DocumentType::BillOfLading, consignee.to_string()),
            (DocumentType::LetterOfCredit, issuing_bank.to_string()),
        ],
    ))
}

/// The order party references the bank if they share any distinctive
/// (non-generic) word.
fn references_bank(order_party: &str, issuing_bank: &str) -> bool {
    let distinctive_words = |name: &str| -> Vec<String> {
        canonical_name(name)
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_string()
            })
            .filter(|w| w.len() >= 3 && !GENERIC_BANK_WORDS.contains(&w.as_str()))
            .collect()
    };

    let bank_words = distinctive_words(issuing_bank);
    distinctive_words(order_party)
        .iter()
        .any(|w| bank_words.contains(w))
}

/// The inspection certificate must be issued by the company the credit
/// requires. Substring-based after name normalization; a different issuer
/// is critical, being the whole point of requiring a named inspector.
pub fn check_inspection_company(docs: &[DocumentResult]) -> Option<CrossRefIssue> {
    let required = specified(
        first_of(docs, DocumentType::LetterOfCredit)?
            .extracted
            .lc
            .as_ref()
            .and_then(|lc| lc.required_inspection_company.as_deref()),
    )?;

    let cert = first_of(docs, DocumentType::InspectionCertificate)?;
    let issuer = specified(
        cert.extracted
            .certificate
            .as_ref()
            .and_then(|c| c.issuer.as_deref()),
    )?;

    let required_canonical = canonical_name(required);
    let issuer_canonical = canonical_name(issuer);
    if required_canonical.contains(&issuer_canonical)
        || issuer_canonical.contains(&required_canonical)
    {
        return None;
    }

    Some(cross_issue(
        "inspectionCompany",
        Severity::Critical,
        format!(
            "Inspection certificate issued by \"{issuer}\" but the credit \
             requires inspection by \"{required}\""
        ),
        vec![
            (DocumentType::LetterOfCredit, required.to_string()),
            (DocumentType::InspectionCertificate, issuer.to_string()),
        ],
    ))
}
