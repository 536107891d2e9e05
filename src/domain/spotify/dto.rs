use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SpotifyTokenResponse;

pub const REFRESH_TOKEN_INSTRUCTIONS: &str =
    "Copy the refresh_token below and add it as SPOTIFY_REFRESH_TOKEN in your environment variables.";
pub const FAILED_TO_FETCH: &str = "Failed to fetch";
pub const ERROR_FETCHING_DATA: &str = "Error fetching data";

/// Query params of the consent redirect
#[derive(Debug, Default, Deserialize)]
pub struct AuthCallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Query params of the top-items proxy
#[derive(Debug, Default, Deserialize)]
pub struct TopItemsParams {
    pub time_range: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

/// Result of a successful code exchange, shown to the operator once
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExchangeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<Value>,
}

impl From<SpotifyTokenResponse> for ExchangeResponse {
    fn from(tokens: SpotifyTokenResponse) -> Self {
        Self {
            message: REFRESH_TOKEN_INSTRUCTIONS.to_string(),
            refresh_token: tokens.refresh_token,
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}

/// Body returned by the top-items proxy. Failures are carried in
/// `configured` and `error`, never in the HTTP status. `items` is whatever
/// Spotify sent, unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopItemsResponse {
    pub items: Value,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TopItemsResponse {
    pub fn not_configured() -> Self {
        Self {
            items: Value::Array(Vec::new()),
            configured: false,
            error: None,
        }
    }

    pub fn items(items: Value) -> Self {
        Self {
            items,
            configured: true,
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            items: Value::Array(Vec::new()),
            configured: true,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.configured && self.error.is_none()
    }
}
