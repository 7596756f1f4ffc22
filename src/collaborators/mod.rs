//! Typed collaborator seams.
//!
//! The engine never looks collaborators up at call time; it receives these
//! trait handles at construction. Each trait has a production HTTP adapter
//! in [`http`] and is small enough to mock in tests.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DocumentType, PackageVerdict};

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction service unreachable: {0}")]
    Connection(String),

    #[error("extraction service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("extraction call timed out after {0}s")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum ComparatorError {
    #[error("comparator service unreachable: {0}")]
    Connection(String),

    #[error("comparator service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("comparator call timed out after {0}s")]
    Timeout(u64),

    #[error("malformed comparator response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Connection(String),

    #[error("store returned status {status}: {body}")]
    Service { status: u16, body: String },
}

/// Per-document field extraction (LLM-backed, external).
///
/// Returns the collaborator's raw response; the engine parses it
/// defensively because the output may be malformed.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, doc_type: DocumentType, text: &str)
        -> Result<String, ExtractionError>;
}

/// How strictly a goods description must match the credit's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrictness {
    /// Invoice description must correspond with all credit descriptors
    /// (UCP 600 Art. 18(c) analogue).
    Strict,
    /// Transport/packing documents may describe goods in general terms not
    /// in conflict with the credit (Art. 19 analogue).
    Lenient,
}

impl MatchStrictness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Comparator verdict on one description pair.
#[derive(Debug, Clone)]
pub struct GoodsMatch {
    pub matches: bool,
    pub reason: String,
}

impl GoodsMatch {
    /// Fail-closed outcome used when the comparator is unreachable, times
    /// out, or answers nonsense: silently passing a real mismatch is the
    /// costlier error.
    pub fn manual_review(detail: &str) -> Self {
        Self {
            matches: false,
            reason: format!("comparator unavailable ({detail}); manual review recommended"),
        }
    }
}

/// Semantic goods-description comparison (LLM-backed, external).
#[async_trait]
pub trait GoodsComparator: Send + Sync {
    async fn compare(
        &self,
        reference: &str,
        candidate: &str,
        strictness: MatchStrictness,
    ) -> Result<GoodsMatch, ComparatorError>;
}

/// One-way hand-off of the finished verdict. Best-effort: failure is
/// surfaced to the operator log, never to the caller.
#[async_trait]
pub trait VerdictStore: Send + Sync {
    async fn store(
        &self,
        verdict: &PackageVerdict,
        summary_embedding: Option<&[f32]>,
    ) -> Result<(), StoreError>;
}
