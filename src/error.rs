//! Converter error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unreadable source: {0}")]
    SourceUnreadable(String),

    #[error("No games found in source")]
    EmptySource,

    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
