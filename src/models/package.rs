use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Channel, DocumentType, PaymentMode, Severity, Verdict};
use super::extracted::{ExtractedData, Issue};

/// One raw document as submitted for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub text: String,
}

/// A full validation request: the document package plus caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub documents: Vec<DocumentInput>,
    pub client_identifier: String,
    pub channel: Channel,
}

/// Outcome of extracting and internally checking one document.
/// Immutable once assembled; the cross-reference stage only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub verdict: Verdict,
    pub issues: Vec<Issue>,
    pub extracted: ExtractedData,
    pub analysis: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub raw_text: String,
}

impl DocumentResult {
    /// Fallback result when the extraction collaborator's output could not
    /// be used: WAIT verdict, no issues, whatever data was recovered
    /// deterministically.
    pub fn fallback(doc_type: DocumentType, extracted: ExtractedData, raw_text: String) -> Self {
        Self {
            doc_type,
            verdict: Verdict::Wait,
            issues: Vec::new(),
            extracted,
            analysis: "Extraction output was unusable; deterministic fields only.".to_string(),
            raw_text,
        }
    }
}

/// A discrepancy found comparing the same logical field across documents.
///
/// `documents` and `values` are parallel: `values[i]` is what
/// `documents[i]` said for `field`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossRefIssue {
    pub field: String,
    pub documents: Vec<String>,
    pub values: Vec<String>,
    pub severity: Severity,
    pub description: String,
}

/// The terminal artifact of a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVerdict {
    pub package_id: Uuid,
    pub overall_verdict: Verdict,
    pub document_results: Vec<DocumentResult>,
    pub cross_reference_issues: Vec<CrossRefIssue>,
    pub recommendation: String,
    pub payment_mode: PaymentMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_result_is_wait_with_no_issues() {
        let result = DocumentResult::fallback(
            DocumentType::CommercialInvoice,
            ExtractedData::default(),
            "raw".into(),
        );
        assert_eq!(result.verdict, Verdict::Wait);
        assert!(result.issues.is_empty());
        assert_eq!(result.doc_type, DocumentType::CommercialInvoice);
    }

    #[test]
    fn request_round_trips_through_json() {
        let request = ValidationRequest {
            documents: vec![DocumentInput {
                doc_type: DocumentType::BillOfLading,
                text: "SHIPPED ON BOARD".into(),
            }],
            client_identifier: "client-7".into(),
            channel: Channel::Api,
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: ValidationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.documents[0].doc_type, DocumentType::BillOfLading);
        assert_eq!(back.channel, Channel::Api);
    }
}
