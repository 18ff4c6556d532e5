//! Weibo OAuth2 client.
//!
//! Provides async HTTP access to the provider endpoints:
//! - Authorize-URL construction (API host and website-flow host)
//! - Code-for-token exchange and token refresh
//! - Token introspection
//! - User-profile fetch with transparent refresh of expired tokens

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::config::{Config, api};
use crate::error::{OAuthError, OAuthResult};
use crate::models::{TokenInfo, UserProfile};
use crate::store::{MemoryStore, TokenStore};
use crate::token::{AccessToken, TokenData, now_ms};

/// Optional parameters for the authorize URL.
///
/// Unset fields fall back to the provider defaults (`users_show` scope, empty
/// state, `default` display; `language` is omitted entirely when unset).
#[derive(Debug, Clone, Default)]
pub struct AuthorizeOptions {
    /// Opaque value echoed back on the callback.
    pub state: Option<String>,

    /// Requested scope.
    pub scope: Option<String>,

    /// Consent page rendering (`default`, `mobile`, `wap`, `client`, ...).
    pub display: Option<String>,

    /// Consent page language (`zh_CN`, `zh_TW`, `en`).
    pub language: Option<String>,
}

impl AuthorizeOptions {
    /// Options carrying only a state value, the common case.
    #[must_use]
    pub fn with_state(state: impl Into<String>) -> Self {
        Self { state: Some(state.into()), ..Self::default() }
    }
}

/// A profile request, normalized from either a bare uid or uid plus language.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub uid: String,

    /// Profile language (`zh_CN`, `zh_TW`, `en`).
    pub lang: Option<String>,
}

impl UserQuery {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into(), lang: None }
    }

    #[must_use]
    pub fn with_lang(uid: impl Into<String>, lang: impl Into<String>) -> Self {
        Self { uid: uid.into(), lang: Some(lang.into()) }
    }
}

impl From<&str> for UserQuery {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

impl From<String> for UserQuery {
    fn from(uid: String) -> Self {
        Self::new(uid)
    }
}

/// Weibo OAuth2 client.
///
/// Cheap to clone; the transport pool and token store are shared.
#[derive(Clone)]
pub struct OAuthClient {
    /// HTTP client with retry middleware for transient transport failures.
    client: ClientWithMiddleware,

    config: Config,

    /// Token persistence, keyed by uid.
    store: Arc<dyn TokenStore>,
}

impl OAuthClient {
    /// Create a client backed by the in-memory token store.
    ///
    /// The memory store is process-local; a warning is logged when `APP_ENV`
    /// is `production`, since tokens then vanish on restart and are invisible
    /// to other instances.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        if std::env::var("APP_ENV").is_ok_and(|v| v == "production") {
            tracing::warn!(
                "in-memory token store used in production; supply a durable TokenStore via with_store"
            );
        }
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a client with an injected token store.
    ///
    /// # Errors
    ///
    /// Returns error if a configured base URL is malformed or HTTP client
    /// initialization fails.
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        Url::parse(&config.api_base_url)
            .map_err(|err| anyhow::anyhow!("invalid api_base_url {:?}: {err}", config.api_base_url))?;
        Url::parse(&config.website_auth_base_url).map_err(|err| {
            anyhow::anyhow!("invalid website_auth_base_url {:?}: {err}", config.website_auth_base_url)
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(10))
            .build_with_max_retries(2);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config, store })
    }

    /// Build the consent-page URL for the standard flow.
    ///
    /// Pure string construction, no I/O. The returned URL carries the query
    /// parameters in a fixed order and ends with the `#weibo_redirect`
    /// fragment.
    #[must_use]
    pub fn authorize_url(&self, redirect_uri: &str, opts: &AuthorizeOptions) -> String {
        self.build_authorize_url(&self.config.api_base_url, redirect_uri, opts)
    }

    /// Build the consent-page URL for the website flow.
    ///
    /// Same contract as [`authorize_url`](Self::authorize_url) against the
    /// website-flow host.
    #[must_use]
    pub fn authorize_url_for_website(&self, redirect_uri: &str, opts: &AuthorizeOptions) -> String {
        self.build_authorize_url(&self.config.website_auth_base_url, redirect_uri, opts)
    }

    fn build_authorize_url(&self, base: &str, redirect_uri: &str, opts: &AuthorizeOptions) -> String {
        // Base URLs are validated at construction, but the Config fields are
        // public; a mutated malformed host must not panic here.
        let Ok(mut url) = Url::parse(&format!("{base}/oauth2/authorize")) else {
            tracing::warn!(base, "malformed base URL, returning empty authorize URL");
            return String::new();
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("client_id", &self.config.client_id);
            pairs.append_pair("redirect_uri", redirect_uri);
            pairs.append_pair("response_type", "code");
            pairs.append_pair("scope", opts.scope.as_deref().unwrap_or(api::DEFAULT_SCOPE));
            pairs.append_pair("state", opts.state.as_deref().unwrap_or(""));
            pairs.append_pair("display", opts.display.as_deref().unwrap_or(api::DEFAULT_DISPLAY));
            if let Some(language) = &opts.language {
                pairs.append_pair("language", language);
            }
        }
        url.set_fragment(Some(api::REDIRECT_FRAGMENT));

        url.to_string()
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The received record is stamped with the local receipt time and
    /// persisted through the token store before being returned; a store
    /// failure overrides the successful exchange.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, provider error payload, or store
    /// failure.
    pub async fn get_access_token(&self, code: &str) -> OAuthResult<AccessToken> {
        let url = format!("{}/oauth2/access_token", self.config.api_base_url);

        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];
        if let Some(redirect_uri) = &self.config.redirect_uri {
            form.push(("redirect_uri", redirect_uri));
        }

        tracing::debug!("exchanging authorization code");
        let data: TokenData = self.post_form(&url, &form).await?;
        self.process_token(data).await
    }

    /// Obtain a fresh access token from a refresh token.
    ///
    /// Same post-processing as [`get_access_token`](Self::get_access_token):
    /// local receipt stamp, then persist through the store.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, provider error payload, or store
    /// failure.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> OAuthResult<AccessToken> {
        let url = format!("{}/oauth2/access_token", self.config.api_base_url);

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        tracing::debug!("refreshing access token");
        let data: TokenData = self.post_form(&url, &form).await?;
        self.process_token(data).await
    }

    /// Fetch a user profile by uid, refreshing the stored token when needed.
    ///
    /// Accepts a bare uid (`&str`/`String`) or a [`UserQuery`] with a
    /// language. A still-valid stored token is used directly; an expired one
    /// triggers exactly one refresh (persisted through the store) before the
    /// profile call. A refresh failure is terminal for the call.
    ///
    /// Two concurrent calls for the same expired uid may both refresh; the
    /// store's concurrency discipline is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// [`OAuthError::NoToken`] when nothing is stored for the uid,
    /// [`OAuthError::NoRefreshToken`] when the stored token is expired and
    /// not refreshable, otherwise transport/provider/store errors.
    pub async fn get_user(&self, query: impl Into<UserQuery>) -> OAuthResult<UserProfile> {
        let query = query.into();

        let Some(data) = self.store.get(&query.uid).await? else {
            return Err(OAuthError::no_token(&query.uid));
        };

        let token = AccessToken::new(data);
        if token.is_valid() {
            return self.fetch_user(&query, token.access_token()).await;
        }

        tracing::debug!(uid = %query.uid, "stored token expired, refreshing");
        let refresh_token = token
            .data()
            .refresh_token
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| OAuthError::NoRefreshToken { uid: query.uid.clone() })?
            .to_owned();

        let refreshed = self.refresh_access_token(&refresh_token).await?;
        self.fetch_user(&query, refreshed.access_token()).await
    }

    /// Exchange a code and fetch the resulting user's profile in one step.
    ///
    /// # Errors
    ///
    /// An exchange failure propagates without touching the profile endpoint.
    pub async fn get_user_by_code(&self, code: &str) -> OAuthResult<UserProfile> {
        let token = self.get_access_token(code).await?;
        let uid = token.uid().to_owned();
        self.get_user(uid).await
    }

    /// Introspect an access token.
    ///
    /// Not part of the refresh flow; exposed for callers that want to inspect
    /// token metadata server-side.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or provider error payload.
    pub async fn get_token_info(&self, uid: &str, access_token: &str) -> OAuthResult<TokenInfo> {
        let url = format!("{}/oauth2/get_token_info", self.config.api_base_url);
        let params = [("access_token", access_token), ("uid", uid)];
        self.get(&url, &params).await
    }

    /// Issue the profile-fetch call with an explicit access token.
    async fn fetch_user(&self, query: &UserQuery, access_token: &str) -> OAuthResult<UserProfile> {
        let url = format!("{}/2/users/show.json", self.config.api_base_url);

        let mut params = vec![("access_token", access_token), ("uid", query.uid.as_str())];
        if let Some(lang) = &query.lang {
            params.push(("lang", lang));
        }

        tracing::debug!(uid = %query.uid, "fetching user profile");
        self.get(&url, &params).await
    }

    /// Stamp the local receipt time and persist the token.
    ///
    /// A save failure overrides the successful exchange.
    async fn process_token(&self, mut data: TokenData) -> OAuthResult<AccessToken> {
        data.created_at = now_ms();
        self.store.save(&data.uid, &data).await?;
        Ok(AccessToken::new(data))
    }

    /// Make a GET request.
    async fn get<T>(&self, url: &str, params: &[(&str, &str)]) -> OAuthResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).query(params).send().await?;
        Self::decode(response).await
    }

    /// Make a form-encoded POST request.
    async fn post_form<T>(&self, url: &str, form: &[(&str, &str)]) -> OAuthResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.post(url).form(form).send().await?;
        Self::decode(response).await
    }

    /// Decode a provider response.
    ///
    /// The provider signals failures in-band: a payload carrying `error_code`
    /// is an error even on HTTP 200, and error statuses usually carry the
    /// same shape. Anything else non-2xx surfaces as `UnexpectedStatus`.
    async fn decode<T>(response: reqwest::Response) -> OAuthResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let text = response.text().await?;

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) if status.is_success() => return Err(OAuthError::Parse(err)),
            Err(_) => {
                return Err(OAuthError::UnexpectedStatus { status: status.as_u16(), message: text });
            }
        };

        if let Some(code) = error_code(&value) {
            let message =
                value.get("error").and_then(serde_json::Value::as_str).unwrap_or_default();
            return Err(OAuthError::api(code, message));
        }

        if !status.is_success() {
            return Err(OAuthError::UnexpectedStatus {
                status: status.as_u16(),
                message: value.to_string(),
            });
        }

        serde_json::from_value(value).map_err(OAuthError::from)
    }
}

/// Extract the provider error code, tolerating both numeric and string forms.
fn error_code(value: &serde_json::Value) -> Option<i64> {
    let code = value.get("error_code")?;
    code.as_i64().or_else(|| code.as_str().and_then(|s| s.parse().ok()))
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient").field("client_id", &self.config.client_id).finish()
    }
}
