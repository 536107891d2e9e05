use axum::http::StatusCode;
use serde_json::Value;

use crate::error::AppError;

pub const EXCHANGE_FAILED_MESSAGE: &str = "Failed to exchange code for token";

/// Failure of a single call to the Spotify Web API
#[derive(Debug, thiserror::Error)]
pub enum SpotifyApiError {
    #[error("spotify responded with status {status}")]
    Rejected { status: u16, body: Value },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0:#}")]
    Decode(anyhow::Error),
}

impl From<reqwest::Error> for SpotifyApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SpotifyApiError::Decode(err.into())
        } else {
            SpotifyApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpotifyServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("spotify rejected the request with status {status}")]
    Rejected { status: u16, body: Value },
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<SpotifyApiError> for SpotifyServiceError {
    fn from(err: SpotifyApiError) -> Self {
        match err {
            SpotifyApiError::Rejected { status, body } => {
                SpotifyServiceError::Rejected { status, body }
            }
            other => SpotifyServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<SpotifyServiceError> for AppError {
    fn from(err: SpotifyServiceError) -> Self {
        match err {
            SpotifyServiceError::Invalid(msg) | SpotifyServiceError::Denied(msg) => {
                AppError::BadRequest(msg)
            }
            SpotifyServiceError::NotConfigured(msg) => AppError::Internal(msg),
            SpotifyServiceError::Rejected { status, body } => match StatusCode::from_u16(status) {
                Ok(status) => AppError::Upstream { status, body },
                Err(_) => AppError::ExternalService(EXCHANGE_FAILED_MESSAGE.to_string()),
            },
            SpotifyServiceError::Dependency(_) => {
                AppError::ExternalService(EXCHANGE_FAILED_MESSAGE.to_string())
            }
        }
    }
}
