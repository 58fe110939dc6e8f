//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
///
/// Display strings are surfaced verbatim to form UIs, so the wording here is
/// user-facing.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Account exists but the email address was never confirmed
    #[error("Please verify your email before logging in")]
    EmailNotConfirmed,

    /// Signup attempted for an email that already has an account
    #[error("An account with this email already exists. Please log in instead.")]
    DuplicateAccount,

    /// Operation requires a session but none is attached
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Provider returned a malformed or unexpected payload
    #[error("Auth provider error: {0}")]
    Provider(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_not_confirmed_message() {
        assert_eq!(
            AuthError::EmailNotConfirmed.to_string(),
            "Please verify your email before logging in"
        );
    }

    #[test]
    fn test_duplicate_account_message_mentions_login() {
        let msg = AuthError::DuplicateAccount.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("log in"));
    }

    #[test]
    fn test_invalid_credentials_carries_server_message() {
        let err = AuthError::InvalidCredentials("Invalid login credentials".to_string());
        assert!(err.to_string().contains("Invalid login credentials"));
    }
}
