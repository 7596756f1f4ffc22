pub mod assembler;
pub mod parser;

pub use assembler::*;
pub use parser::*;

use thiserror::Error;

/// Failure to make sense of the extraction collaborator's response.
/// Always recovered locally; one bad document never aborts the package.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no JSON payload found in extraction response")]
    MissingPayload,

    #[error("unclosed JSON block in extraction response")]
    UnclosedBlock,

    #[error("JSON parsing error: {0}")]
    Json(String),
}
