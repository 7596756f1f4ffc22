//! Presenta: cross-reference validation and verdict engine for
//! trade-finance document packages.
//!
//! A *package* (letter of credit, bill of lading, commercial invoice, and a
//! long tail of certificates) is validated document-against-document under
//! deterministic UCP 600-style compliance rules: dates, amounts, ports,
//! party names, quantities, insurance coverage, and document math. The
//! output is a machine-checkable GO / WAIT / NO_GO verdict plus an
//! itemized list of cross-document discrepancies.
//!
//! Field extraction and the semantic goods comparator are external,
//! LLM-backed collaborators reached through the traits in
//! [`collaborators`]; everything else in this crate is deterministic.
//! Anything a collaborator gets wrong degrades (a WAIT fallback, a forced
//! mismatch, a logged store failure) but the engine always returns a
//! verdict.

pub mod collaborators;
pub mod config;
pub mod crossref;
pub mod engine;
pub mod extraction;
pub mod models;
pub mod normalize;
pub mod verdict;

pub use collaborators::{
    FieldExtractor, GoodsComparator, GoodsMatch, MatchStrictness, VerdictStore,
};
pub use engine::ValidationEngine;
pub use models::{
    Channel, CrossRefIssue, DocumentInput, DocumentResult, DocumentType, ExtractedData, Issue,
    PackageVerdict, PaymentMode, Severity, ValidationRequest, Verdict,
};
