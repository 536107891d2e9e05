use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::spotify::{
        AuthCallbackParams, ExchangeResponse, SpotifyService, TopItemsParams, TopItemsQuery,
    },
    error::AppResult,
};

/// Caching hint for successful relays: one hour
const CACHE_CONTROL_SUCCESS: &str = "public, max-age=3600";
const CACHE_CONTROL_NO_STORE: &str = "no-store";

pub struct SpotifyController {
    spotify_service: Arc<SpotifyService>,
}

impl SpotifyController {
    pub fn new(spotify_service: Arc<SpotifyService>) -> Self {
        Self { spotify_service }
    }

    /// GET /api/auth/login - Redirect the operator to Spotify's consent page
    pub async fn login(State(controller): State<Arc<SpotifyController>>) -> AppResult<Redirect> {
        let url = controller.spotify_service.authorize_url()?;
        Ok(Redirect::temporary(&url))
    }

    /// GET /api/auth/callback - Exchange the authorization code for tokens
    ///
    /// Query params:
    /// - code: authorization code from the consent redirect
    /// - error: set by Spotify when consent was refused
    pub async fn auth_callback(
        State(controller): State<Arc<SpotifyController>>,
        Query(params): Query<AuthCallbackParams>,
    ) -> AppResult<Json<ExchangeResponse>> {
        let response = controller.spotify_service.exchange_code(params).await?;
        Ok(Json(response))
    }

    /// GET /api/spotify - Top artists or tracks for the display widget
    ///
    /// Query params:
    /// - time_range: short_term | medium_term | long_term (default long_term)
    /// - type: artists | tracks (default artists)
    ///
    /// Always answers 200; failures are reported in the body.
    pub async fn top_items(
        State(controller): State<Arc<SpotifyController>>,
        Query(params): Query<TopItemsParams>,
    ) -> Response {
        let query =
            TopItemsQuery::from_params(params.time_range.as_deref(), params.item_type.as_deref());
        let body = controller.spotify_service.top_items(&query).await;

        let cache_control = if body.is_success() {
            CACHE_CONTROL_SUCCESS
        } else {
            CACHE_CONTROL_NO_STORE
        };

        let mut response = Json(body).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
        response
    }
}
