//! View-state error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid iteration count {0:?}")]
    InvalidIterations(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidNumber {
        field: &'static str,
        message: String,
    },

    #[error("Invalid view state JSON: {0}")]
    Json(#[from] serde_json::Error),
}
