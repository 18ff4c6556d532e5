//! Response models for the Weibo open API.
//!
//! Profile payloads are passed through rather than deeply modeled: the known
//! fields are typed, everything else survives in `extra` so callers can reach
//! provider fields this crate does not name.

use serde::{Deserialize, Serialize};

/// A user profile from `GET /2/users/show.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    /// Numeric uid.
    #[serde(default)]
    pub id: i64,

    /// The uid as a string.
    #[serde(default)]
    pub idstr: String,

    /// Display nickname.
    #[serde(default)]
    pub screen_name: String,

    #[serde(default)]
    pub name: String,

    /// `m` male, `f` female, `n` unknown.
    #[serde(default)]
    pub gender: String,

    #[serde(default)]
    pub province: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub description: String,

    /// 50x50 avatar URL.
    #[serde(default)]
    pub profile_image_url: String,

    /// 180x180 avatar URL.
    #[serde(default)]
    pub avatar_large: String,

    #[serde(default)]
    pub followers_count: i64,

    #[serde(default)]
    pub friends_count: i64,

    #[serde(default)]
    pub statuses_count: i64,

    #[serde(default)]
    pub verified: bool,

    /// Privilege markers, when the provider reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub privilege: Vec<String>,

    /// Unmodeled provider fields, passed through as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Token introspection payload from `GET /oauth2/get_token_info`.
///
/// Field names follow the provider: `create_at` and `expire_in` are the
/// provider's spelling, not this crate's local `created_at` stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub uid: String,

    /// The application key the token was issued to.
    #[serde(default)]
    pub appkey: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Issue time reported by the provider, epoch seconds.
    #[serde(default)]
    pub create_at: i64,

    /// Remaining lifetime reported by the provider, seconds.
    #[serde(default)]
    pub expire_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keeps_unmodeled_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1_404_376_560_i64,
            "idstr": "1404376560",
            "screen_name": "zaku",
            "gender": "m",
            "domain": "zaku",
            "allow_all_comment": true
        }))
        .unwrap();

        assert_eq!(profile.screen_name, "zaku");
        assert_eq!(profile.extra.get("domain"), Some(&serde_json::json!("zaku")));
        assert_eq!(profile.extra.get("allow_all_comment"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_profile_tolerates_sparse_payload() {
        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({ "idstr": "42" })).unwrap();
        assert_eq!(profile.idstr, "42");
        assert_eq!(profile.followers_count, 0);
        assert!(profile.privilege.is_empty());
    }

    #[test]
    fn test_token_info_provider_field_names() {
        let info: TokenInfo = serde_json::from_value(serde_json::json!({
            "uid": "u1",
            "appkey": "1352222456",
            "scope": null,
            "create_at": 1_352_267_591,
            "expire_in": 157_679_471
        }))
        .unwrap();

        assert_eq!(info.uid, "u1");
        assert_eq!(info.expire_in, 157_679_471);
        assert!(info.scope.is_none());
    }
}
