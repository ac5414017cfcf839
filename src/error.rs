use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// Errors the post API reports to clients. Not-found and validation
// failures are explicit outcomes here, never panics downstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("post {0} not found")]
    PostNotFound(u64),

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be at most {max} characters, got {actual}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::PostNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmptyField { .. } | ApiError::FieldTooLong { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, self.to_string()).into_response()
    }
}
