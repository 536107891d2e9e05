use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibes_backend::domain::spotify::SpotifyService;
use vibes_backend::infrastructure::config::{Config, LogFormat};
use vibes_backend::infrastructure::http::start_http_server;
use vibes_backend::infrastructure::spotify::SpotifyClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting vibes backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        environment = ?config.environment,
        has_client_id = config.spotify_client_id.is_some(),
        has_client_secret = config.spotify_client_secret.is_some(),
        has_refresh_token = config.spotify_refresh_token.is_some(),
        token_cache_enabled = config.token_cache_enabled,
        "Spotify configuration loaded"
    );

    if config.spotify_credentials().is_none() {
        tracing::warn!("Spotify credentials incomplete. /api/spotify will report configured=false. Visit /api/auth/login to obtain a refresh token.");
    }
    if config.is_development() && config.cors_allowed_origin.is_none() {
        tracing::debug!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
    }

    let config = Arc::new(config);

    // Spotify client and service
    let spotify_client = Arc::new(SpotifyClient::with_base_urls(
        config.spotify_accounts_url.clone(),
        config.spotify_api_url.clone(),
    ));
    let spotify_service = Arc::new(SpotifyService::new(
        spotify_client,
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
        config.spotify_refresh_token.clone(),
        config.spotify_redirect_uri.clone(),
        config.token_cache_enabled,
        Duration::from_secs(config.token_cache_ttl_secs),
    ));

    start_http_server(config, spotify_service).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "vibes_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "vibes_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
