use std::str::FromStr;

use serde::Deserialize;

use crate::models::{ExtractedData, Issue, Verdict};

use super::ParseError;

/// The structured portion of one extraction response.
#[derive(Debug, Clone)]
pub struct ParsedExtraction {
    pub verdict: Verdict,
    pub issues: Vec<Issue>,
    pub extracted: ExtractedData,
    pub analysis: String,
}

/// Parse the extraction collaborator's raw response.
///
/// Accepts a fenced ```json block (anything around it is ignored) or a bare
/// JSON object. Unknown verdict strings degrade to WAIT; issue entries that
/// fail to deserialize are skipped rather than fatal.
pub fn parse_extraction_response(response: &str) -> Result<ParsedExtraction, ParseError> {
    let json_str = extract_json_payload(response)?;
    parse_payload(&json_str)
}

/// Locate the JSON payload inside the raw response.
fn extract_json_payload(response: &str) -> Result<String, ParseError> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        let fence_end = response[content_start..]
            .find("```")
            .ok_or(ParseError::UnclosedBlock)?;
        return Ok(response[content_start..content_start + fence_end]
            .trim()
            .to_string());
    }

    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    Err(ParseError::MissingPayload)
}

fn parse_payload(json_str: &str) -> Result<ParsedExtraction, ParseError> {
    #[derive(Deserialize)]
    struct RawPayload {
        verdict: Option<String>,
        issues: Option<Vec<serde_json::Value>>,
        #[serde(rename = "extractedData", alias = "extracted_data")]
        extracted_data: Option<serde_json::Value>,
        analysis: Option<String>,
    }

    let raw: RawPayload =
        serde_json::from_str(json_str).map_err(|e| ParseError::Json(e.to_string()))?;

    let verdict = raw
        .verdict
        .as_deref()
        .and_then(|v| Verdict::from_str(&v.to_lowercase()).ok())
        .unwrap_or(Verdict::Wait);

    let issues = parse_array_lenient(raw.issues.as_deref());

    // The field record itself is parsed leniently too: a malformed
    // extractedData object degrades to "no opinion on anything".
    let extracted = raw
        .extracted_data
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Ok(ParsedExtraction {
        verdict,
        issues,
        extracted,
        analysis: raw.analysis.unwrap_or_default(),
    })
}

/// Parse an array leniently, skipping items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: Option<&[serde_json::Value]>) -> Vec<T> {
    match items {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn sample_response() -> &'static str {
        r#"Field extraction complete.

```json
{
  "verdict": "WAIT",
  "issues": [
    {"type": "missingSignature", "severity": "major", "description": "No carrier signature found"}
  ],
  "extractedData": {
    "amount": "USD 150,000.00",
    "currency": "USD",
    "beneficiary": "Acme Trading LLC",
    "port_of_loading": "Houston, USA",
    "port_of_discharge": "Jebel Ali, UAE",
    "lc": {"expiry_date": "2026-03-15", "issuing_bank": "Emirates National Bank"}
  },
  "analysis": "Letter of credit for polyethylene resin shipment."
}
```

Reviewed against checklist."#
    }

    #[test]
    fn parses_fenced_response() {
        let parsed = parse_extraction_response(sample_response()).unwrap();
        assert_eq!(parsed.verdict, Verdict::Wait);
        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].severity, Severity::Major);
        assert_eq!(parsed.extracted.amount.as_deref(), Some("USD 150,000.00"));
        assert_eq!(
            parsed.extracted.lc.as_ref().unwrap().issuing_bank.as_deref(),
            Some("Emirates National Bank")
        );
        assert!(parsed.analysis.contains("polyethylene"));
    }

    #[test]
    fn parses_bare_json() {
        let parsed =
            parse_extraction_response(r#"{"verdict": "go", "extractedData": {}}"#).unwrap();
        assert_eq!(parsed.verdict, Verdict::Go);
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn missing_payload_is_an_error() {
        assert!(matches!(
            parse_extraction_response("no json anywhere"),
            Err(ParseError::MissingPayload)
        ));
    }

    #[test]
    fn unclosed_fence_is_an_error() {
        assert!(matches!(
            parse_extraction_response("```json\n{\"verdict\": \"go\"}"),
            Err(ParseError::UnclosedBlock)
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_extraction_response("```json\n{not json}\n```"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn unknown_verdict_degrades_to_wait() {
        let parsed =
            parse_extraction_response(r#"{"verdict": "MAYBE", "extractedData": {}}"#).unwrap();
        assert_eq!(parsed.verdict, Verdict::Wait);
    }

    #[test]
    fn uppercase_verdict_accepted() {
        let parsed =
            parse_extraction_response(r#"{"verdict": "NO_GO", "extractedData": {}}"#).unwrap();
        assert_eq!(parsed.verdict, Verdict::NoGo);
    }

    #[test]
    fn bad_issue_entries_are_skipped() {
        let parsed = parse_extraction_response(
            r#"{
                "verdict": "wait",
                "issues": [
                    {"type": "a", "severity": "minor", "description": "ok"},
                    {"bogus": true},
                    {"type": "b", "severity": "critical", "description": "also ok"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.issues.len(), 2);
    }

    #[test]
    fn malformed_extracted_data_degrades_to_empty() {
        let parsed = parse_extraction_response(
            r#"{"verdict": "go", "extractedData": ["not", "an", "object"]}"#,
        )
        .unwrap();
        assert!(parsed.extracted.amount.is_none());
    }
}
