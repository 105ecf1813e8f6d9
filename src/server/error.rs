//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::types::ErrorResponse;
use crate::error::{Error, ErrorKind};

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// A rebuild is already running.
    Conflict(String),
    /// Storage, filesystem or task failure.
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Conflict(msg) | Self::Internal(msg) => msg,
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Conflict => Self::Conflict(err.to_string()),
            _ => {
                error!(error = %err, kind = ?err.kind(), "Request failed");
                Self::Internal(err.to_string())
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
