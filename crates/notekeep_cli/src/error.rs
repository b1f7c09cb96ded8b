//! Maps store failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use notekeep_core::NoteStoreError;

#[derive(Debug)]
pub enum ApiError {
    Store(NoteStoreError),
    /// The request body could not be read into the expected fields.
    BadRequest(StatusCode, String),
    /// The blocking store task panicked or was cancelled.
    Task(String),
}

impl From<NoteStoreError> for ApiError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Store(NoteStoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Note not found".to_string())
            }
            ApiError::Store(NoteStoreError::AlreadyExists(_)) => {
                (StatusCode::CONFLICT, "Note already exists".to_string())
            }
            ApiError::Store(NoteStoreError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Store(err @ NoteStoreError::CorruptStore(_)) => {
                error!(
                    "event=http_error module=cli status=error error_code={} error={}",
                    err.code(),
                    err
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Note store is not in the correct format".to_string(),
                )
            }
            ApiError::Store(err @ NoteStoreError::StorageIo(_)) => {
                error!(
                    "event=http_error module=cli status=error error_code={} error={}",
                    err.code(),
                    err
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Note store could not be written".to_string(),
                )
            }
            ApiError::BadRequest(status, message) => (*status, message.clone()),
            ApiError::Task(details) => {
                error!(
                    "event=http_error module=cli status=error error_code=task_failed error={}",
                    details
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
