//! Shell error types.

use crate::ValidationError;
use auth_engine::AuthError;
use outreach_api::BackendError;
use thiserror::Error;

/// Error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Authentication error
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Backend request error
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// Form validation error
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Invalid view transition
    #[error("Invalid view transition: {0}")]
    InvalidTransition(String),

    /// Dashboard operation attempted outside the dashboard
    #[error("Not on the dashboard")]
    NotOnDashboard,

    /// Operation resolved after the shell was unmounted; the result was
    /// discarded
    #[error("Shell is unmounted")]
    Unmounted,

    /// Contact status toggle targeted an unknown contact
    #[error("Unknown contact: {0}")]
    UnknownContact(String),
}

/// Result type alias using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;
