use moka::{future::Cache, Expiry};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::dto::{ERROR_FETCHING_DATA, FAILED_TO_FETCH};
use super::{
    AccessToken, AuthCallbackParams, ExchangeResponse, SpotifyApi, SpotifyApiError,
    SpotifyServiceError, TopItemsQuery, TopItemsResponse,
};
use crate::infrastructure::config::{ClientCredentials, SpotifyCredentials};

/// Tokens are dropped this long before Spotify would expire them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessTokenExpiry {
    ttl: Duration,
}

impl Expiry<(), AccessToken> for AccessTokenExpiry {
    fn expire_after_create(
        &self,
        _key: &(),
        value: &AccessToken,
        _created_at: Instant,
    ) -> Option<Duration> {
        // expires_in of 0 means Spotify did not say
        if value.expires_in_seconds <= 0 {
            return Some(self.ttl);
        }
        let lifetime = Duration::from_secs(value.expires_in_seconds as u64)
            .saturating_sub(EXPIRY_MARGIN);
        Some(lifetime.min(self.ttl))
    }
}

pub struct SpotifyService {
    api: Arc<dyn SpotifyApi>,
    client: Option<ClientCredentials>,
    /// Whatever id/secret is set, blanks for the missing parts. The code
    /// exchange always goes upstream so Spotify's own verdict is relayed.
    exchange_client: ClientCredentials,
    credentials: Option<SpotifyCredentials>,
    redirect_uri: String,
    token_cache: Option<Cache<(), AccessToken>>,
}

impl SpotifyService {
    pub fn new(
        api: Arc<dyn SpotifyApi>,
        client_id: Option<String>,
        client_secret: Option<String>,
        refresh_token: Option<String>,
        redirect_uri: String,
        cache_enabled: bool,
        cache_ttl: Duration,
    ) -> Self {
        let exchange_client = ClientCredentials {
            client_id: client_id.unwrap_or_default(),
            client_secret: client_secret.unwrap_or_default(),
        };
        let client = (!exchange_client.client_id.is_empty()
            && !exchange_client.client_secret.is_empty())
        .then(|| exchange_client.clone());

        let credentials = match (&client, refresh_token) {
            (Some(client), Some(refresh_token)) => Some(SpotifyCredentials {
                client: client.clone(),
                refresh_token,
            }),
            _ => None,
        };

        let token_cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(1)
                    .expire_after(AccessTokenExpiry { ttl: cache_ttl })
                    .build(),
            )
        } else {
            None
        };

        Self {
            api,
            client,
            exchange_client,
            credentials,
            redirect_uri,
            token_cache,
        }
    }

    /// True when client id, secret and refresh token are all present
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Consent URL for the one-time setup flow
    pub fn authorize_url(&self) -> Result<String, SpotifyServiceError> {
        let client = self.client.as_ref().ok_or_else(|| {
            SpotifyServiceError::NotConfigured(
                "Spotify client credentials are not configured".to_string(),
            )
        })?;

        Ok(self.api.authorize_url(&client.client_id, &self.redirect_uri))
    }

    /// Exchange the authorization code from the consent redirect for tokens.
    ///
    /// An `error` param wins over `code`.
    pub async fn exchange_code(
        &self,
        params: AuthCallbackParams,
    ) -> Result<ExchangeResponse, SpotifyServiceError> {
        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            tracing::warn!(error = %error, "Spotify consent was not granted");
            return Err(SpotifyServiceError::Denied(error));
        }

        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SpotifyServiceError::Invalid("No code provided".to_string()))?;

        if self.client.is_none() {
            tracing::warn!("Spotify client credentials incomplete, exchanging code anyway");
        }

        let tokens = self
            .api
            .exchange_code(&self.exchange_client, &code, &self.redirect_uri)
            .await
            .map_err(|e| {
                match &e {
                    SpotifyApiError::Rejected { status, .. } => {
                        tracing::warn!(status = status, "Spotify rejected the authorization code")
                    }
                    _ => tracing::error!(error = %e, "Spotify token exchange failed"),
                }
                SpotifyServiceError::from(e)
            })?;

        tracing::info!(
            has_refresh_token = tokens.refresh_token.is_some(),
            "Authorization code exchanged"
        );

        Ok(ExchangeResponse::from(tokens))
    }

    /// Fetch the top artists or tracks. Never fails: missing credentials and
    /// upstream problems are reported inside the response body.
    pub async fn top_items(&self, query: &TopItemsQuery) -> TopItemsResponse {
        let Some(credentials) = &self.credentials else {
            tracing::debug!("Spotify credentials missing, skipping upstream calls");
            return TopItemsResponse::not_configured();
        };

        let result = async {
            let access_token = self.access_token(credentials).await?;
            self.api.fetch_top_items(&access_token, query).await
        }
        .await;

        match result {
            Ok(items) => {
                tracing::info!(
                    item_type = %query.item_type,
                    time_range = %query.time_range,
                    count = items.as_array().map(Vec::len),
                    "Fetched top items"
                );
                TopItemsResponse::items(items)
            }
            Err(SpotifyApiError::Rejected { status, .. }) => {
                tracing::warn!(
                    status = status,
                    item_type = %query.item_type,
                    time_range = %query.time_range,
                    "Spotify rejected top items request"
                );
                TopItemsResponse::failed(FAILED_TO_FETCH)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    item_type = %query.item_type,
                    time_range = %query.time_range,
                    "Error fetching top items"
                );
                TopItemsResponse::failed(ERROR_FETCHING_DATA)
            }
        }
    }

    /// A missing access token is passed on as an empty string; the data call
    /// then fails authentication and is reported as "Failed to fetch".
    async fn access_token(&self, credentials: &SpotifyCredentials) -> Result<String, SpotifyApiError> {
        if let Some(cache) = &self.token_cache {
            if let Some(token) = cache.get(&()).await {
                tracing::debug!("Spotify access token cache hit");
                return Ok(token.token);
            }
        }

        let response = self
            .api
            .refresh_access_token(&credentials.client, &credentials.refresh_token)
            .await?;

        match response.into_access_token() {
            Some(token) => {
                if let Some(cache) = &self.token_cache {
                    cache.insert((), token.clone()).await;
                }
                Ok(token.token)
            }
            None => {
                tracing::warn!("Spotify token endpoint returned no access token");
                Ok(String::new())
            }
        }
    }
}
