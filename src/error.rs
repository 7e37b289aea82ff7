//! Error taxonomy for evaluation backend calls.
//!
//! Every failed request is classified into one of five categories before it
//! reaches the view layer. `Conflict` is the transient "task not finished"
//! condition and renders as a soft warning; everything else renders as a
//! dismissible error. No category triggers an automatic retry, the user
//! re-issues the request explicitly.

use thiserror::Error;

use crate::types::ApiErrorBody;

/// Stable machine-readable codes carried in backend error bodies.
pub mod codes {
    pub const TASK_NOT_FOUND: &str = "TASK_NOT_FOUND";
    pub const TASK_NOT_FINISHED: &str = "TASK_NOT_FINISHED";
    pub const INVALID_STATUS_FILTER: &str = "INVALID_STATUS_FILTER";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// Classified failure of an evaluation API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The task id is unknown to the backend.
    #[error("not found: {message}")]
    NotFound { code: String, message: String },

    /// The task exists but is not in a state the operation supports, i.e.
    /// results or export were requested before the task finished.
    #[error("conflict: {message}")]
    Conflict { code: String, message: String },

    /// The request was malformed or carried an invalid parameter.
    #[error("validation failed: {message}")]
    Validation { code: String, message: String },

    /// No response was received at all.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with an unexpected status, typically 5xx.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Classify a non-success HTTP response into the taxonomy.
    ///
    /// The backend sends `{"code", "message"}` bodies on failure; when the
    /// body is missing or unreadable a fixed fallback per category is used.
    pub fn classify(status: u16, body: Option<ApiErrorBody>) -> Self {
        let (code, message) = match body {
            Some(body) => (Some(body.code), Some(body.message)),
            None => (None, None),
        };
        match status {
            404 => ApiError::NotFound {
                code: code.unwrap_or_else(|| codes::TASK_NOT_FOUND.to_string()),
                message: message.unwrap_or_else(|| "task not found".to_string()),
            },
            409 => ApiError::Conflict {
                code: code.unwrap_or_else(|| codes::TASK_NOT_FINISHED.to_string()),
                message: message.unwrap_or_else(|| "task not finished".to_string()),
            },
            400 | 422 => ApiError::Validation {
                code: code.unwrap_or_else(|| codes::VALIDATION_ERROR.to_string()),
                message: message.unwrap_or_else(|| "invalid request".to_string()),
            },
            other => ApiError::Server {
                status: other,
                message: message.unwrap_or_else(|| "unexpected server response".to_string()),
            },
        }
    }

    /// Whether this is the transient "task not finished" condition that the
    /// results view surfaces as a soft warning instead of an error banner.
    pub fn is_not_finished(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
