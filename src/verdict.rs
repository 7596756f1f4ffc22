//! Package-level verdict rollup.
//!
//! Deterministic, no hidden state: the package verdict is the maximum
//! severity across document-level issues, document verdicts, and
//! cross-reference issues. The recommendation repeats the triggering
//! descriptions so the verdict explains itself without re-derivation.

use crate::models::{CrossRefIssue, DocumentResult, Severity, Verdict};

/// Roll document results and cross-reference issues up into one verdict
/// plus its recommendation text.
pub fn aggregate(
    document_results: &[DocumentResult],
    cross_issues: &[CrossRefIssue],
) -> (Verdict, String) {
    let document_issue = |severity: Severity| {
        document_results
            .iter()
            .flat_map(|d| d.issues.iter())
            .filter(move |i| i.severity == severity)
            .map(|i| i.description.clone())
    };
    let cross_issue = |severity: Severity| {
        cross_issues
            .iter()
            .filter(move |i| i.severity == severity)
            .map(|i| i.description.clone())
    };

    let criticals: Vec<String> = document_issue(Severity::Critical)
        .chain(cross_issue(Severity::Critical))
        .collect();
    let any_no_go = document_results.iter().any(|d| d.verdict == Verdict::NoGo);

    if !criticals.is_empty() || any_no_go {
        let mut reasons = criticals;
        if reasons.is_empty() {
            reasons.push("one or more documents failed their own review".to_string());
        }
        return (
            Verdict::NoGo,
            format!("Do not proceed. Critical discrepancies: {}", reasons.join("; ")),
        );
    }

    let majors: Vec<String> = document_issue(Severity::Major)
        .chain(cross_issue(Severity::Major))
        .collect();
    let any_wait = document_results.iter().any(|d| d.verdict == Verdict::Wait);

    if !majors.is_empty() || any_wait || !cross_issues.is_empty() {
        let reasons = if majors.is_empty() {
            "documents need review before presentation".to_string()
        } else {
            majors.join("; ")
        };
        return (
            Verdict::Wait,
            format!("Hold the presentation pending review: {reasons}"),
        );
    }

    (
        Verdict::Go,
        "All checks passed; documents are consistent. Proceed with presentation.".to_string(),
    )
}
