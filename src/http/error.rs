//! API error type and its HTTP mapping.
//!
//! Three kinds of failure reach clients: validation (400), authorization
//! (401/404 for lookups), and upstream failures (500 with the upstream
//! message attached). Everything is converted to a JSON error body at the
//! handler boundary; nothing is retried or escalated to process failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::{SessionError, SmsError};
use crate::sheets::SheetsError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, OTP, or session.
    #[error("{0}")]
    Unauthorized(String),

    /// Entity not found in its sheet.
    #[error("{0}")]
    NotFound(String),

    /// Spreadsheet or SMS gateway failure.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Too many OTP sends for one phone.
    #[error("too many OTP requests, try again shortly")]
    Throttled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Throttled => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<SheetsError> for ApiError {
    fn from(e: SheetsError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<SmsError> for ApiError {
    fn from(e: SmsError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Encoding(msg) => ApiError::Upstream(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Reject empty required string fields with a 400.
pub fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("`{}` is required", field)))
    } else {
        Ok(())
    }
}
