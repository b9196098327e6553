//! # Application Error Types
//!
//! This module defines the error types used throughout the lookup bot.
//! `AppError` covers application-level failures, `LookupError` describes
//! what went wrong while talking to an upstream lookup service.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (malformed phone or id numbers)
    Validation(String),
    /// Network/communication errors
    Network(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Network(msg) => write!(f, "[NETWORK] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single upstream lookup call.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The service answered with an unexpected HTTP status
    HttpStatus { code: u16 },
    /// Transport failure or timeout
    Network { message: String },
    /// The service answered successfully but the body is not valid JSON
    Parse { message: String },
}

impl LookupError {
    /// Text shown to the user when the lookup path exposes error details
    pub fn user_detail(&self) -> String {
        match self {
            LookupError::HttpStatus { code } => format!("status {}", code),
            LookupError::Network { message } => message.clone(),
            LookupError::Parse { message } => format!("invalid JSON response: {}", message),
        }
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::HttpStatus { .. } => "http_status",
            LookupError::Network { .. } => "network",
            LookupError::Parse { .. } => "parse",
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::HttpStatus { code } => write!(f, "[UPSTREAM] HTTP status {}", code),
            LookupError::Network { message } => write!(f, "[UPSTREAM] network error: {}", message),
            LookupError::Parse { message } => write!(f, "[UPSTREAM] malformed JSON body: {}", message),
        }
    }
}

impl std::error::Error for LookupError {}

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log network/communication errors with connection context
    pub fn log_network_error(
        error: &impl std::fmt::Display,
        operation: &str,
        endpoint: Option<&str>,
        chat_id: Option<i64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            endpoint = ?endpoint,
            chat_id = ?chat_id,
            "Network operation failed"
        );
    }

    /// Log validation errors with input context
    ///
    /// Input values are masked before logging, identifiers are personal data.
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: Option<i64>,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            input_type = %input_type,
            input_value = ?input_value.map(crate::observability::mask_identifier),
            "Validation failed"
        );
    }

    /// Log internal application errors with component context
    pub fn log_internal_error(
        error: &impl std::fmt::Display,
        component: &str,
        operation: &str,
        chat_id: Option<i64>,
    ) {
        error!(
            error = %error,
            component = %component,
            operation = %operation,
            chat_id = ?chat_id,
            "Internal application error"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
