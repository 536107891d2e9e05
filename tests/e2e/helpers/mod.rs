use mockito::{Mock, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use vibes_backend::{
    domain::spotify::SpotifyService,
    infrastructure::{
        config::{Config, Environment, LogFormat},
        http::create_app,
        spotify::SpotifyClient,
    },
};

pub mod api_client;

use api_client::TestClient;

pub const TEST_CLIENT_ID: &str = "test_client_id";
pub const TEST_CLIENT_SECRET: &str = "test_client_secret";
pub const TEST_REFRESH_TOKEN: &str = "test_refresh_token";
pub const TEST_REDIRECT_URI: &str = "http://localhost:8080/api/auth/callback";
// base64("test_client_id:test_client_secret")
pub const TEST_BASIC_AUTH: &str = "Basic dGVzdF9jbGllbnRfaWQ6dGVzdF9jbGllbnRfc2VjcmV0";

/// Fully configured app in front of a mock Spotify
pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub config: Config,
    pub spotify: ServerGuard,
}

impl TestContext {
    pub async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let spotify = mockito::Server::new_async().await;

        let mut config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            spotify_client_id: Some(TEST_CLIENT_ID.to_string()),
            spotify_client_secret: Some(TEST_CLIENT_SECRET.to_string()),
            spotify_refresh_token: Some(TEST_REFRESH_TOKEN.to_string()),
            spotify_redirect_uri: TEST_REDIRECT_URI.to_string(),
            spotify_accounts_url: spotify.url(),
            spotify_api_url: spotify.url(),
            token_cache_enabled: false,
            token_cache_ttl_secs: 3000,
            cors_allowed_origin: None,
        };
        configure(&mut config);

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

        let app = create_app(&config, spotify_service).expect("Failed to create app");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&base_url),
            config,
            spotify,
        }
    }

    /// Token endpoint answering the refresh grant with access token `A`,
    /// expected to be hit exactly `hits` times
    pub async fn mock_refresh_grant(&mut self, hits: usize) -> Mock {
        self.spotify
            .mock("POST", "/api/token")
            .match_header("authorization", TEST_BASIC_AUTH)
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                mockito::Matcher::UrlEncoded("refresh_token".into(), TEST_REFRESH_TOKEN.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"A","token_type":"Bearer","expires_in":3600,"scope":"user-top-read"}"#)
            .expect(hits)
            .create_async()
            .await
    }

    /// Any call at all to the mock Spotify, expected never to happen
    pub async fn mock_no_upstream_calls(&mut self) -> Vec<Mock> {
        let mut mocks = Vec::new();
        for method in ["GET", "POST"] {
            mocks.push(
                self.spotify
                    .mock(method, mockito::Matcher::Any)
                    .expect(0)
                    .create_async()
                    .await,
            );
        }
        mocks
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { Self::with_config(|_| {}).await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Mock server shuts down when the guard drops
        }
    }
}

/// App started without a refresh token
pub struct UnconfiguredContext(pub TestContext);

impl AsyncTestContext for UnconfiguredContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            Self(
                TestContext::with_config(|config| {
                    config.spotify_refresh_token = None;
                })
                .await,
            )
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

/// Top-tracks style payload with `count` items
pub fn tracks_payload(count: usize) -> serde_json::Value {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "name": format!("Track {}", i),
                "artists": [{"name": format!("Artist {}", i)}],
                "album": {"name": "Album", "images": [{"url": "https://i.scdn.co/image/abc"}]},
                "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", i)}
            })
        })
        .collect();
    serde_json::json!({ "items": items, "total": count, "limit": 10, "offset": 0 })
}
