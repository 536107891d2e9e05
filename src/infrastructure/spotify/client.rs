use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::spotify::{
    ItemType, SpotifyApi, SpotifyApiError, SpotifyTokenResponse, TopItemsQuery,
};
use crate::infrastructure::config::{ClientCredentials, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL};

const TOKEN_PATH: &str = "/api/token";
const AUTHORIZE_PATH: &str = "/authorize";
const TOP_ARTISTS_PATH: &str = "/v1/me/top/artists";
const TOP_TRACKS_PATH: &str = "/v1/me/top/tracks";
const TOP_ITEMS_LIMIT: u32 = 10;
const SCOPE: &str = "user-top-read";

pub struct SpotifyClient {
    accounts_url: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl SpotifyClient {
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_ACCOUNTS_URL.to_string(), DEFAULT_API_URL.to_string())
    }

    /// Point the client at other hosts (used by tests)
    pub fn with_base_urls(accounts_url: String, api_url: String) -> Self {
        Self {
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn top_items_url(&self, query: &TopItemsQuery) -> String {
        let path = match query.item_type {
            ItemType::Tracks => TOP_TRACKS_PATH,
            ItemType::Artists => TOP_ARTISTS_PATH,
        };
        format!(
            "{}{}?time_range={}&limit={}",
            self.api_url,
            path,
            urlencoding::encode(query.time_range.as_str()),
            TOP_ITEMS_LIMIT
        )
    }

    /// POST a grant to the token endpoint with HTTP Basic client auth.
    /// Returns the status and the decoded JSON body.
    async fn post_token_grant(
        &self,
        client: &ClientCredentials,
        form: &[(&str, &str)],
    ) -> Result<(reqwest::StatusCode, Value), SpotifyApiError> {
        let response = self
            .http_client
            .post(format!("{}{}", self.accounts_url, TOKEN_PATH))
            .basic_auth(&client.client_id, Some(&client.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json = serde_json::from_str::<Value>(&body)
            .context("token endpoint")
            .map_err(SpotifyApiError::Decode)?;

        Ok((status, json))
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    fn authorize_url(&self, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}{}?client_id={}&response_type=code&redirect_uri={}&scope={}",
            self.accounts_url,
            AUTHORIZE_PATH,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            SCOPE
        )
    }

    async fn exchange_code(
        &self,
        client: &ClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SpotifyTokenResponse, SpotifyApiError> {
        let (status, body) = self
            .post_token_grant(
                client,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await?;

        if !status.is_success() {
            return Err(SpotifyApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_value(body)
            .context("authorization code grant")
            .map_err(SpotifyApiError::Decode)
    }

    async fn refresh_access_token(
        &self,
        client: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<SpotifyTokenResponse, SpotifyApiError> {
        let (status, body) = self
            .post_token_grant(
                client,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ],
            )
            .await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Spotify refresh grant was not accepted");
        }

        serde_json::from_value(body)
            .context("refresh token grant")
            .map_err(SpotifyApiError::Decode)
    }

    async fn fetch_top_items(
        &self,
        access_token: &str,
        query: &TopItemsQuery,
    ) -> Result<Value, SpotifyApiError> {
        let response = self
            .http_client
            .get(self.top_items_url(query))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(SpotifyApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<Value>(&body)
            .with_context(|| format!("top {} payload", query.item_type))
            .map_err(SpotifyApiError::Decode)?;

        Ok(payload
            .get("items")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
