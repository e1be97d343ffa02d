//! Error types for the catalog client

use serde_json::Value;
use thiserror::Error;

/// Coarse classification used by views to pick a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
    Internal,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Local pre-flight check failure, or a remote 4xx carrying a message
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure or remote 5xx
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a non-success HTTP status and its body onto the error taxonomy.
    ///
    /// The message is taken from the body's `message` field when the body is
    /// a JSON object, otherwise the raw body text is used.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        match status {
            404 => AppError::NotFound(message),
            400..=499 => AppError::Validation(message),
            _ => AppError::Transport(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Transport(_) | AppError::Decode(_) => ErrorKind::Transport,
            AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message without the variant prefix, suitable for inline display
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Transport(msg)
            | AppError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => Some(trimmed.to_string()),
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
