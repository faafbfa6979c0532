//! Error types module
//!
//! This module provides the core error type used throughout the Meetspace client.
//! Transport failures, backend rejections, decoding problems, broken wizard
//! preconditions and local storage failures are all unified under `AppError`.
//! Every fallible operation returns it explicitly so the caller decides once,
//! at the step boundary, whether to block, retry or proceed degraded.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a flaky network
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "API_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Response is not an image: {0}")]
    NotAnImage(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status of a backend rejection, if this error is one
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the bearer credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::Transport(_) => (
            "TRANSPORT_ERROR",
            true,
            Some("Check your network connection and retry"),
            LogLevel::Warn,
        ),
        AppError::Api { status, .. } if *status >= 500 => (
            "API_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Api { status: 401, .. } | AppError::Api { status: 403, .. } => (
            "UNAUTHORIZED",
            false,
            Some("Log in again"),
            LogLevel::Warn,
        ),
        AppError::Api { .. } => (
            "API_REJECTED",
            false,
            Some("Check the submitted data and try again"),
            LogLevel::Warn,
        ),
        AppError::Decode(_) => ("DECODE_ERROR", false, None, LogLevel::Error),
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Check the form fields and try again"),
            LogLevel::Debug,
        ),
        AppError::MissingCredentials(_) => (
            "MISSING_CREDENTIALS",
            false,
            Some("Restart registration from the first step"),
            LogLevel::Warn,
        ),
        AppError::NotAnImage(_) => ("NOT_AN_IMAGE", false, None, LogLevel::Debug),
        AppError::Storage(_) => (
            "STORAGE_ERROR",
            true,
            Some("Check permissions of the identity file"),
            LogLevel::Error,
        ),
        AppError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Fix the environment configuration"),
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Transport(_) => "Could not reach the server".to_string(),
            AppError::Api { status, .. } if *status >= 500 => {
                "The server failed to process the request".to_string()
            }
            AppError::Api { status: 401, .. } | AppError::Api { status: 403, .. } => {
                "Your session is not authorized".to_string()
            }
            AppError::Api { body, .. } => format!("Request rejected: {}", body),
            AppError::Decode(_) => "Unexpected response from the server".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::MissingCredentials(_) => {
                "Registration session expired, please start over".to_string()
            }
            AppError::NotAnImage(_) => "The file is not an image".to_string(),
            AppError::Storage(_) => "Failed to access local storage".to_string(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}
