//! HTTP error responses.
//!
//! Every failure becomes `{"detail": "..."}` with a 4xx status for
//! request problems and 502 for anything that went wrong upstream.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ocular_core::GenerateError;
use serde_json::json;

/// An error response carrying an HTTP status and a detail message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            detail: detail.into(),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        if err.is_client_error() {
            tracing::warn!("request rejected: {err}");
            Self::bad_request(err.to_string())
        } else {
            tracing::error!("backend call failed: {err}");
            Self::bad_gateway(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
