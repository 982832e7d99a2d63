use thiserror::Error;

/// Error taxonomy surfaced by the booking and settlement core.
///
/// `NotFound`, `Forbidden`, `Conflict` and `Validation` are the business
/// outcomes callers branch on; the remaining variants wrap adapter failures
/// (CSV scenario parsing, IO).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("not authorized: {0}")]
    Forbidden(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("validation: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
