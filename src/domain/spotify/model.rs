use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Aggregation window for "top items". Unknown values are kept verbatim and
/// forwarded upstream unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    #[default]
    LongTerm,
    Unrecognized(String),
}

impl TimeRange {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::default(),
            Some("short_term") => Self::ShortTerm,
            Some("medium_term") => Self::MediumTerm,
            Some("long_term") => Self::LongTerm,
            Some(other) => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ShortTerm => "short_term",
            Self::MediumTerm => "medium_term",
            Self::LongTerm => "long_term",
            Self::Unrecognized(value) => value,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemType {
    #[default]
    Artists,
    Tracks,
}

impl ItemType {
    /// Only `tracks` selects tracks; everything else falls back to artists.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("tracks") => Self::Tracks,
            _ => Self::Artists,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artists => "artists",
            Self::Tracks => "tracks",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopItemsQuery {
    pub time_range: TimeRange,
    pub item_type: ItemType,
}

impl TopItemsQuery {
    pub fn from_params(time_range: Option<&str>, item_type: Option<&str>) -> Self {
        Self {
            time_range: TimeRange::from_param(time_range),
            item_type: ItemType::from_param(item_type),
        }
    }
}

/// Short-lived bearer credential minted from the refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_in_seconds: i64,
}

/// Body of the Spotify token endpoint. Fields are kept as raw JSON so the
/// exchange can echo them verbatim and an odd-shaped `access_token` still
/// reaches the Bearer header instead of failing to decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpotifyTokenResponse {
    pub access_token: Option<Value>,
    pub token_type: Option<Value>,
    pub expires_in: Option<Value>,
    pub refresh_token: Option<Value>,
    pub scope: Option<Value>,
}

impl SpotifyTokenResponse {
    /// `None` when the token endpoint did not hand out an access token.
    /// Non-string tokens are rendered as their JSON text.
    pub fn into_access_token(self) -> Option<AccessToken> {
        let token = match self.access_token? {
            Value::Null => return None,
            Value::String(token) => token,
            other => other.to_string(),
        };
        if token.is_empty() {
            return None;
        }

        Some(AccessToken {
            token,
            token_type: self
                .token_type
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or("Bearer")
                .to_string(),
            expires_in_seconds: self.expires_in.as_ref().and_then(Value::as_i64).unwrap_or(0),
        })
    }
}
