//! Error types for request handlers.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since this is a user-facing HTML service. The page carries the error
//! message so the client sees why the request failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::pages;
use crate::routes::html_response_with_status;
use crate::store::{StoreError, ValidationError};

/// Handler error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted form is incomplete.
    #[error("{0}")]
    Validation(String),

    /// The store failed or has no matching snippet.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            Self::Validation(_) => tracing::debug!(error = %message, "rejected submission"),
            Self::Store(StoreError::NotFound { category }) => {
                tracing::warn!(category = %category, "no snippet for category")
            }
            Self::Store(err) => tracing::error!(error = %err, "store error"),
        }

        html_response_with_status(status, pages::error_page(status, &message))
    }
}
