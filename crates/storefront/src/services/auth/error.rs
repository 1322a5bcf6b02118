//! Authentication error types.

use thiserror::Error;
use wenshop_core::validation::ValidationError;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed local validation; no request was sent.
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationError),

    /// The backend answered and refused the request.
    #[error("rejected by backend: {0}")]
    Rejected(String),

    /// The backend could not be reached or answered unexpectedly.
    #[error("backend unavailable: {0}")]
    Unavailable(ApiError),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Backend { message, .. } => Self::Rejected(message),
            other => Self::Unavailable(other),
        }
    }
}
