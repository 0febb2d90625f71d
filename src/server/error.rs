//! HTTP-facing errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::content::RepositoryError;
use crate::store::StoreError;

/// Failures a handler can end a request with
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Malformed client input, rejected before the store is touched
    #[error("{0}")]
    Validation(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("mail error: {0}")]
    Mail(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Storage(err) => AppError::Storage(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Storage(_) | AppError::Template(_) | AppError::Mail(_) => {
                tracing::error!("Request failed: {:#}", anyhow::Error::new(self));
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
