use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{health, spotify::SpotifyController};
use crate::domain::spotify::SpotifyService;
use crate::infrastructure::config::Config;

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with all routes and middleware
pub fn create_app(
    config: &Config,
    spotify_service: Arc<SpotifyService>,
) -> Result<Router, Box<dyn std::error::Error>> {
    let spotify_controller = Arc::new(SpotifyController::new(spotify_service.clone()));

    // One-time operator setup
    let auth_routes = Router::new()
        .route("/api/auth/login", get(SpotifyController::login))
        .route("/api/auth/callback", get(SpotifyController::auth_callback))
        .with_state(spotify_controller.clone());

    // Polled by the display widget
    let spotify_routes = Router::new()
        .route("/api/spotify", get(SpotifyController::top_items))
        .with_state(spotify_controller);

    let cors = match &config.cors_allowed_origin {
        Some(origin) => CorsLayer::new().allow_origin(origin.parse::<HeaderValue>()?),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET]);

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(spotify_service)
        .merge(auth_routes)
        .merge(spotify_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(cors),
        );

    Ok(app)
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    spotify_service: Arc<SpotifyService>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(&config, spotify_service)?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
