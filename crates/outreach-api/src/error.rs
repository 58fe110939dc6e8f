//! Backend API error types.

use thiserror::Error;

/// Error type for backend requests.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Non-success HTTP status from the backend
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    /// Generic message suitable for inline display next to the form that
    /// triggered the request. The backend exposes no error taxonomy the UI
    /// could act on, so failures all read the same and the user retries.
    pub fn user_message(&self) -> &'static str {
        "Could not generate message. Please try again."
    }
}

/// Result type alias using BackendError.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = BackendError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("overloaded"));
    }

    #[test]
    fn test_user_message_is_generic() {
        let err = BackendError::Status {
            status: 500,
            body: "internal".to_string(),
        };
        assert_eq!(err.user_message(), "Could not generate message. Please try again.");
    }
}
