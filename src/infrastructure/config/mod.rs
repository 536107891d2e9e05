use serde::Deserialize;
use std::env;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/api/auth/callback";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Spotify app credentials
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_refresh_token: Option<String>,
    pub spotify_redirect_uri: String,
    // Spotify hosts, overridable for tests
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    // Access token cache
    pub token_cache_enabled: bool,
    pub token_cache_ttl_secs: u64,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Client id and secret of the registered Spotify app
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Everything needed to mint access tokens without user interaction
#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyCredentials {
    pub client: ClientCredentials,
    pub refresh_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            spotify_client_id: optional_var("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: optional_var("SPOTIFY_CLIENT_SECRET"),
            spotify_refresh_token: optional_var("SPOTIFY_REFRESH_TOKEN"),
            spotify_redirect_uri: optional_var("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            spotify_accounts_url: optional_var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string()),
            spotify_api_url: optional_var("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token_cache_enabled: env::var("SPOTIFY_TOKEN_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            token_cache_ttl_secs: env::var("SPOTIFY_TOKEN_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            cors_allowed_origin: optional_var("CORS_ALLOWED_ORIGIN"),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Client id and secret, if both are configured
    pub fn client_credentials(&self) -> Option<ClientCredentials> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(client_id), Some(client_secret)) => Some(ClientCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        }
    }

    /// Full credential set. `None` puts the proxy into its "not configured" state.
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        let client = self.client_credentials()?;
        let refresh_token = self.spotify_refresh_token.clone()?;
        Some(SpotifyCredentials {
            client,
            refresh_token,
        })
    }
}

/// Reads an environment variable, treating empty values as unset
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
