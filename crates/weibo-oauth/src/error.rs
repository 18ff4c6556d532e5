//! Error types for the Weibo OAuth client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Errors from OAuth and API operations.
#[derive(thiserror::Error, Debug)]
pub enum OAuthError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The provider answered with an error payload (`error_code` / `error`)
    #[error("Weibo API error {code}: {message}")]
    Api {
        /// Provider error code, see <https://open.weibo.com/wiki/Error_code>
        code: i64,
        /// Provider error message
        message: String,
    },

    /// No token is stored for the requested uid; the user must authorize first
    #[error("no token for {uid}, please authorize first")]
    NoToken {
        /// The uid the lookup was performed for
        uid: String,
    },

    /// Stored token is expired and carries no refresh token
    #[error("token for {uid} is expired and has no refresh token, please authorize again")]
    NoRefreshToken {
        /// The uid whose token cannot be refreshed
        uid: String,
    },

    /// The injected token store failed
    #[error("token store error: {0}")]
    Store(#[from] StoreError),

    /// JSON parsing error
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unexpected HTTP status without a provider error payload
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl OAuthError {
    /// Create a provider API error.
    #[must_use]
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api { code, message: message.into() }
    }

    /// Create a no-token error.
    #[must_use]
    pub fn no_token(uid: impl Into<String>) -> Self {
        Self::NoToken { uid: uid.into() }
    }

    /// Returns true if the caller must (re-)run the authorization flow.
    #[must_use]
    pub const fn is_auth_required(&self) -> bool {
        matches!(self, Self::NoToken { .. } | Self::NoRefreshToken { .. })
    }

    /// Get the provider error code if this is an API error.
    #[must_use]
    pub const fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors from a [`TokenStore`](crate::store::TokenStore) implementation.
///
/// Store backends differ (database, cache, filesystem), so the payload is an
/// opaque message rather than a backend-specific type.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Create a store error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type alias for OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_required() {
        assert!(OAuthError::no_token("u1").is_auth_required());
        assert!(OAuthError::NoRefreshToken { uid: "u1".into() }.is_auth_required());

        assert!(!OAuthError::api(21327, "expired_token").is_auth_required());
        assert!(!OAuthError::Store(StoreError::new("down")).is_auth_required());
    }

    #[test]
    fn test_api_code() {
        assert_eq!(OAuthError::api(21327, "expired_token").api_code(), Some(21327));
        assert_eq!(OAuthError::no_token("u1").api_code(), None);
    }

    #[test]
    fn test_no_token_message_contains_uid() {
        let err = OAuthError::no_token("u1");
        assert!(err.to_string().contains("u1"));
    }
}
