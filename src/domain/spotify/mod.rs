use async_trait::async_trait;
use serde_json::Value;

use crate::infrastructure::config::ClientCredentials;

pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{AuthCallbackParams, ExchangeResponse, TopItemsParams, TopItemsResponse};
pub use error::{SpotifyApiError, SpotifyServiceError};
pub use model::{AccessToken, ItemType, SpotifyTokenResponse, TimeRange, TopItemsQuery};
pub use service::SpotifyService;

/// Calls against the Spotify accounts service and Web API.
///
/// Every method is a single attempt: no retries, no backoff.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Consent URL the operator opens once to obtain an authorization code
    fn authorize_url(&self, client_id: &str, redirect_uri: &str) -> String;

    /// Trade an authorization code for an access/refresh token pair.
    ///
    /// # Errors
    /// `Rejected` carries the upstream status and JSON body on a non-2xx reply.
    async fn exchange_code(
        &self,
        client: &ClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SpotifyTokenResponse, SpotifyApiError>;

    /// Mint an access token from the refresh token. The reply status is not
    /// checked; a failed grant yields a response without `access_token`.
    async fn refresh_access_token(
        &self,
        client: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<SpotifyTokenResponse, SpotifyApiError>;

    /// Fetch up to 10 top artists or tracks. Returns the payload's `items`
    /// verbatim, whatever its shape, or `[]` when the field is absent.
    async fn fetch_top_items(
        &self,
        access_token: &str,
        query: &TopItemsQuery,
    ) -> Result<Value, SpotifyApiError>;
}
