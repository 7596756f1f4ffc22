//! "Is this value actually populated" filtering and numeric extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder strings the extraction collaborator emits for absent fields.
const UNSPECIFIED: &[&str] = &["n/a", "na", "not specified", "not applicable", "none", "-"];

/// Whether a field value is actually populated. Placeholders and empty
/// strings are absent, and absence never triggers a mismatch.
pub fn is_specified(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !UNSPECIFIED.contains(&lower.as_str())
}

/// Option adapter for `is_specified`: the populated value, or `None`.
pub fn specified(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| is_specified(v))
}

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("static number pattern"));

/// Extract the first floating-point-looking token from a labeled amount or
/// quantity string ("USD 150,000.00", "500 MT"). Thousands separators are
/// stripped first. Returns `None` on failure, never zero.
pub fn extract_number(value: &str) -> Option<f64> {
    let cleaned = value.replace(',', "");
    RE_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extract a number from an optional field, treating placeholders as absent.
pub fn extract_specified_number(value: Option<&str>) -> Option<f64> {
    specified(value).and_then(extract_number)
}
