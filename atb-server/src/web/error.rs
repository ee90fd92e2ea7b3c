//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use super::dto::{ErrorResponse, JsonBody};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Application error type.
///
/// The message is sent to the client; an internal error's source is only
/// logged.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String, source: BoxError },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Internal {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal { message, source } => {
                error!(status = status.as_u16(), error = %source, "{message}");
            }
            _ => debug!(status = status.as_u16(), "{}", self.message()),
        }

        let body = JsonBody {
            value: ErrorResponse {
                status: status.as_u16(),
                message: self.message().to_string(),
            },
            pretty: true,
        };
        (status, body).into_response()
    }
}
