use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failure body for every route.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A route failure: a fixed status and a fixed public message.
///
/// The underlying cause is logged where the error is raised and never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub const FILE_REQUIRED: ApiError = ApiError::new(StatusCode::BAD_REQUEST, "file is required");
    pub const UNREADABLE_FILE: ApiError =
        ApiError::new(StatusCode::BAD_REQUEST, "failed to read file");
    pub const STORE_FAILED: ApiError =
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to store file");
    pub const FILE_NOT_FOUND: ApiError = ApiError::new(StatusCode::NOT_FOUND, "file not found");
    pub const ANALYZE_FAILED: ApiError =
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to analyze file");
    pub const WORD_CLOUD_FAILED: ApiError =
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to generate word cloud");

    const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
