//! Pipeline error types.
//!
//! Only load-path failures abort a run. Row-level defects are recovered by
//! exclusion during cleaning and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("csv processing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("input is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
