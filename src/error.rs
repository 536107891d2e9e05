use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Upstream service rejected request with status {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure. `error` is either a plain message or the
/// payload relayed from an upstream service.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Value,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::ExternalService(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to the error response body
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            Self::BadRequest(msg) | Self::ExternalService(msg) | Self::Internal(msg) => {
                Value::String(msg.clone())
            }
            Self::Upstream { body, .. } => body.clone(),
        };

        ErrorResponse { error }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
