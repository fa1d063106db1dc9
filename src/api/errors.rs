use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body of every failed API response: `{ message, error }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: ErrorDetail,
}

/// Diagnostic detail attached to a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub detail: String,
}

/// An `AppError` paired with the operation that failed.
///
/// Validation and store failures both map to 500; `error.kind` tells them
/// apart.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: AppError,
}

impl ApiError {
    pub const SAVE_FAILED: &'static str = "Error saving booking";
    pub const FETCH_FAILED: &'static str = "Error fetching bookings";

    pub fn saving(source: AppError) -> Self {
        Self {
            message: Self::SAVE_FAILED,
            source,
        }
    }

    pub fn fetching(source: AppError) -> Self {
        Self {
            message: Self::FETCH_FAILED,
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.source.kind(), "{}: {}", self.message, self.source);

        let body = ErrorBody {
            message: self.message.to_string(),
            error: ErrorDetail {
                kind: self.source.kind().to_string(),
                detail: self.source.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
