use crate::utils::error::{CatalystError, ErrorCategory};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// A handler failure rendered as `{"success": false, "error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub CatalystError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if matches!(self.0, CatalystError::NotFoundError { .. }) {
            StatusCode::NOT_FOUND
        } else if self.0.category() == ErrorCategory::Input {
            StatusCode::BAD_REQUEST
        } else if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<CatalystError> for ApiError {
    fn from(err: CatalystError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {} ({})", self.0, self.0.recovery_suggestion());
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }

        let body = json!({ "success": false, "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
