//! Configuration for the Weibo OAuth client.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Weibo open API (token, introspection, profile).
    pub const BASE_URL: &str = "https://api.weibo.com";

    /// Base URL for the website-flow authorization pages.
    ///
    /// Distinct from [`BASE_URL`]: consent pages for the website flow live on
    /// the open.weibo.cn host.
    pub const WEBSITE_AUTH_URL: &str = "https://open.weibo.cn";

    /// Default scope requested on the consent page.
    pub const DEFAULT_SCOPE: &str = "users_show";

    /// Default display mode for the consent page.
    pub const DEFAULT_DISPLAY: &str = "default";

    /// Fragment appended to every authorize URL.
    pub const REDIRECT_FRAGMENT: &str = "weibo_redirect";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Client configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application key issued by the open platform.
    pub client_id: String,

    /// Application secret issued by the open platform.
    pub client_secret: String,

    /// Registered callback address, sent with the code exchange.
    pub redirect_uri: Option<String>,

    /// Base URL for API calls (overridable for mock servers).
    pub api_base_url: String,

    /// Base URL for website-flow authorize pages (overridable for mock servers).
    pub website_auth_base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration with provider-default hosts and timeouts.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            api_base_url: api::BASE_URL.to_string(),
            website_auth_base_url: api::WEBSITE_AUTH_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration with both hosts pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: Some("https://example.com/callback".to_string()),
            api_base_url: base_url.to_string(),
            website_auth_base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `WEIBO_CLIENT_ID`, `WEIBO_CLIENT_SECRET` and the optional
    /// `WEIBO_REDIRECT_URI`.
    ///
    /// # Errors
    ///
    /// Returns error if the required variables are missing.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("WEIBO_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("WEIBO_CLIENT_ID is not set"))?;
        let client_secret = std::env::var("WEIBO_CLIENT_SECRET")
            .map_err(|_| anyhow::anyhow!("WEIBO_CLIENT_SECRET is not set"))?;
        let redirect_uri = std::env::var("WEIBO_REDIRECT_URI").ok();
        Ok(Self::new(client_id, client_secret, redirect_uri))
    }
}
