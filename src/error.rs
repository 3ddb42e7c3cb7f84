use crate::types::GroupKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row that cannot be attributed to exactly one grouping key.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("total for {0:?} does not fit in a 64-bit integer")]
    Overflow(GroupKey),
}

pub type Result<T> = std::result::Result<T, ReportError>;
