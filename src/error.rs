//! Error types for dayplan
//!
//! Exit codes:
//! - 0: Success
//! - 2: Input error (bad date text, invalid task fields, bad config)
//! - 3: Not found (task id absent from the day's record)
//! - 4: Operation failed (filesystem or serialization failure)

use thiserror::Error;

/// Exit codes for the dayplan CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const INPUT_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for dayplan operations
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (exit code 2)
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid task {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Not found (exit code 3)
    #[error("Task not found: {id} on {date}")]
    TaskNotFound { date: String, id: String },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidDate(_)
            | Error::InvalidArgument(_)
            | Error::Validation { .. }
            | Error::InvalidConfig(_) => exit_codes::INPUT_ERROR,

            Error::TaskNotFound { .. } => exit_codes::NOT_FOUND,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidDate(text) => Some(serde_json::json!({ "date": text })),
            Error::Validation { field, message } => Some(serde_json::json!({
                "field": field,
                "message": message,
            })),
            Error::TaskNotFound { date, id } => Some(serde_json::json!({
                "date": date,
                "id": id,
            })),
            _ => None,
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for dayplan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
