use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::error::BlueBlissError;

impl BlueBlissError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlueBlissError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            BlueBlissError::NotFoundError { .. } => StatusCode::NOT_FOUND,
            BlueBlissError::UpstreamError { .. } | BlueBlissError::ApiError(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BlueBlissError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("❌ Request failed: {} (Category: {:?})", self, self.category());
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
