//! Access-token record and validity check.

use serde::{Deserialize, Serialize};

/// The token record as exchanged with the provider and the token store.
///
/// `created_at` is stamped locally (epoch milliseconds) when the token is
/// received; it is never taken from the provider. Records persisted by older
/// deployments without the stamp deserialize with `created_at = 0` and are
/// therefore treated as expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenData {
    pub access_token: String,
    /// Token lifetime in seconds, as reported by the provider.
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Local receipt time, epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

/// A received access token with its validity check.
///
/// Thin wrapper over [`TokenData`]; construction happens on every successful
/// exchange or refresh, durable ownership stays with the caller's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    data: TokenData,
}

impl AccessToken {
    /// Wrap a token record.
    #[must_use]
    pub const fn new(data: TokenData) -> Self {
        Self { data }
    }

    /// The underlying token record.
    #[must_use]
    pub const fn data(&self) -> &TokenData {
        &self.data
    }

    /// Consume the wrapper, returning the record.
    #[must_use]
    pub fn into_data(self) -> TokenData {
        self.data
    }

    /// The bearer credential itself.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    /// The uid the token was issued for.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.data.uid
    }

    /// Check whether the token is still usable.
    ///
    /// Valid iff the credential is non-empty and the current time is strictly
    /// before `created_at + expires_in * 1000`. The boundary instant counts as
    /// expired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_ms())
    }

    /// Validity check against an explicit clock, for deterministic tests.
    ///
    /// `expires_in` comes from the provider and is not trusted: the expiry
    /// computation saturates instead of overflowing.
    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        let lifetime_ms =
            i64::try_from(self.data.expires_in).unwrap_or(i64::MAX).saturating_mul(1000);
        !self.data.access_token.is_empty()
            && now_ms < self.data.created_at.saturating_add(lifetime_ms)
    }
}

impl From<TokenData> for AccessToken {
    fn from(data: TokenData) -> Self {
        Self::new(data)
    }
}

/// Current time as epoch milliseconds.
#[must_use]
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(access_token: &str, created_at: i64, expires_in: u64) -> AccessToken {
        AccessToken::new(TokenData {
            access_token: access_token.to_owned(),
            expires_in,
            refresh_token: Some("REFRESH".to_owned()),
            uid: "u1".to_owned(),
            scope: Some("users_show".to_owned()),
            created_at,
        })
    }

    #[test]
    fn test_valid_within_lifetime() {
        let t = token("ACCESS", 1_000_000, 7200);
        assert!(t.is_valid_at(1_000_000 + 1));
        assert!(t.is_valid_at(1_000_000 + 7200 * 1000 - 1));
    }

    #[test]
    fn test_boundary_is_expired() {
        // Strict comparison: exactly created_at + expires_in*1000 is invalid.
        let t = token("ACCESS", 1_000_000, 7200);
        assert!(!t.is_valid_at(1_000_000 + 7200 * 1000));
        assert!(!t.is_valid_at(1_000_000 + 7200 * 1000 + 1));
    }

    #[test]
    fn test_empty_token_never_valid() {
        let t = token("", 1_000_000, 7200);
        assert!(!t.is_valid_at(1_000_000 + 1));
        assert!(!t.is_valid_at(0));
    }

    #[test]
    fn test_missing_created_at_deserializes_expired() {
        let data: TokenData = serde_json::from_value(serde_json::json!({
            "access_token": "ACCESS",
            "expires_in": 7200,
            "uid": "u1"
        }))
        .unwrap();

        assert_eq!(data.created_at, 0);
        assert!(!AccessToken::new(data).is_valid());
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        // An absurd provider lifetime must not overflow the expiry
        // arithmetic; it just means "valid far into the future".
        let t = token("ACCESS", now_ms(), u64::MAX / 2);
        assert!(t.is_valid());
        assert!(t.is_valid_at(i64::MAX - 1));

        // Saturation also holds with a stamp near the upper bound.
        let t = token("ACCESS", i64::MAX - 1, u64::MAX);
        assert!(t.is_valid_at(now_ms()));
    }

    #[test]
    fn test_wall_clock_validity() {
        let t = token("ACCESS", now_ms(), 7200);
        assert!(t.is_valid());

        let expired = token("ACCESS", now_ms() - 8000 * 1000, 7200);
        assert!(!expired.is_valid());
    }

    #[test]
    fn test_roundtrip_preserves_refresh_token() {
        let data = token("ACCESS", 42, 7200).into_data();
        let json = serde_json::to_value(&data).unwrap();
        let back: TokenData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
