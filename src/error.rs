//! Error types for tau
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad due date, unknown task id, bad arguments or config)
//! - 4: Operation failed (I/O, unreadable record, lock timeout, editor)
//! - 5: Internal error (month index invariant broken)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tau CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
    pub const INTERNAL_ERROR: i32 = 5;
}

/// Main error type for tau operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("due date {0} is not valid")]
    InvalidDueDate(String),

    #[error("malformed due date {0}: expected DDMM")]
    MalformedDate(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("corrupt record {}: {message}", path.display())]
    CorruptRecord { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Editor failed: {0}")]
    Editor(String),

    // Internal errors (exit code 5)
    #[error("index invariant violated: {0}")]
    IndexInvariantViolation(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidDueDate(_)
            | Error::MalformedDate(_)
            | Error::NotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::CorruptRecord { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::Editor(_) => exit_codes::OPERATION_FAILED,

            Error::IndexInvariantViolation(_) => exit_codes::INTERNAL_ERROR,
        }
    }

    /// Coarse error class reported in JSON output
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::INTERNAL_ERROR => "internal_error",
            _ => "operation_failed",
        }
    }

    /// Structured fields for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidDueDate(value) | Error::MalformedDate(value) => {
                Some(serde_json::json!({ "due": value }))
            }
            Error::CorruptRecord { path, message } => Some(serde_json::json!({
                "path": path.to_string_lossy(),
                "message": message,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }
}

/// Result type alias for tau operations
pub type Result<T> = std::result::Result<T, Error>;

/// Body of the `error` field in a JSON error envelope
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
