use crate::common::response::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Every way an ingestion request can fail, as seen by the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid ID: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Couldn't buffer upload: {0}")]
    StorageIo(#[from] std::io::Error),

    #[error("Couldn't derive storage key: {0}")]
    KeyDerivation(String),

    #[error("Couldn't upload to object storage: {0}")]
    ObjectStore(String),

    #[error("Couldn't update video: {0}")]
    MetadataCommit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ObjectStore(_) => StatusCode::BAD_GATEWAY,
            AppError::StorageIo(_)
            | AppError::KeyDerivation(_)
            | AppError::MetadataCommit(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::modules::video::key::KeyError> for AppError {
    fn from(e: crate::modules::video::key::KeyError) -> Self {
        AppError::KeyDerivation(e.to_string())
    }
}

impl From<crate::infrastructure::storage::StorageError> for AppError {
    fn from(e: crate::infrastructure::storage::StorageError) -> Self {
        AppError::ObjectStore(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        ApiError(self.to_string(), status).into_response()
    }
}
