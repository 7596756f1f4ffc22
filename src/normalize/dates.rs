//! Date normalization and label-driven date recovery.
//!
//! Free-running language models mis-transcribe and hallucinate relative-date
//! language, so date arithmetic is never delegated to the extraction
//! collaborator: anything recovered here by regex is authoritative over the
//! collaborator's guess, and comparisons elsewhere run on absolute
//! `NaiveDate` values.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Formats tried in fixed priority order; the first success wins.
/// Numeric slash/dash dates follow the `DD/MM/YYYY` convention: `03/04/2026`
/// is 3 April, never March 4 (documented ambiguity, not disambiguated).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Parse free text purporting to be a date into a calendar date.
/// Commas are insignificant ("February 15, 2026" == "February 15 2026").
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned: String = text
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }
    None
}

/// Canonical `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Normalize a date string to canonical form, or `None` if it is not a date.
pub fn canonicalize(text: &str) -> Option<String> {
    parse_date(text).map(format_date)
}

/// The three fields recovered by label scan from raw document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    LatestShipment,
    Expiry,
    ShippedOnBoard,
}

/// Sub-pattern matching one date token in any supported format.
const DATE_TOKEN: &str = r"([0-9]{1,4}[/\-][0-9]{1,2}[/\-][0-9]{2,4}|[0-9]{1,2}\s+[A-Za-z]+,?\s+[0-9]{4}|[A-Za-z]+\s+[0-9]{1,2},?\s+[0-9]{4})";

/// Ordered label alternatives per field. Adding a new label phrasing is a
/// data change here, not new control flow.
const DATE_LABELS: &[(DateField, &[&str])] = &[
    (
        DateField::LatestShipment,
        &[
            r"latest\s+shipment\s+date\s*:?\s*",
            r"latest\s+date\s+of\s+shipment\s*:?\s*",
            r"shipment\s+(?:must\s+be\s+effected\s+)?not?\s+later\s+than\s*:?\s*",
        ],
    ),
    (
        DateField::Expiry,
        &[
            r"(?:date\s+of\s+)?expiry\s*(?:date)?\s*:?\s*",
            r"expires\s+on\s*:?\s*",
            r"valid\s+until\s*:?\s*",
        ],
    ),
    (
        DateField::ShippedOnBoard,
        &[
            r"shipped\s+on\s+board\s*(?:date)?\s*:?\s*",
            r"on\s+board\s+date\s*:?\s*",
            r"date\s+of\s+shipment\s*:?\s*",
            r"(?:b/l|bill\s+of\s+lading)\s+date\s*:?\s*",
        ],
    ),
];

static COMPILED_LABELS: LazyLock<Vec<(DateField, Vec<Regex>)>> = LazyLock::new(|| {
    DATE_LABELS
        .iter()
        .map(|(field, labels)| {
            let patterns = labels
                .iter()
                .map(|label| {
                    Regex::new(&format!("(?i){label}{DATE_TOKEN}"))
                        .expect("static date label pattern")
                })
                .collect();
            (*field, patterns)
        })
        .collect()
});

/// Dates recovered deterministically from raw document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveredDates {
    pub latest_shipment: Option<NaiveDate>,
    pub expiry: Option<NaiveDate>,
    pub shipment: Option<NaiveDate>,
}

impl RecoveredDates {
    pub fn is_empty(&self) -> bool {
        self.latest_shipment.is_none() && self.expiry.is_none() && self.shipment.is_none()
    }
}

/// Scan raw text for the three labeled date fields. Per field, alternatives
/// run in order and the first match that parses as a date wins.
pub fn extract_labeled_dates(text: &str) -> RecoveredDates {
    let mut recovered = RecoveredDates::default();

    for (field, patterns) in COMPILED_LABELS.iter() {
        let found = patterns.iter().find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_date(m.as_str()))
        });

        match field {
            DateField::LatestShipment => recovered.latest_shipment = found,
            DateField::Expiry => recovered.expiry = found,
            DateField::ShippedOnBoard => recovered.shipment = found,
        }
    }

    recovered
}
