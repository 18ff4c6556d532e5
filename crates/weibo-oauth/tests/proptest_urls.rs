//! Property-based tests for authorize-URL construction.

use std::collections::HashMap;

use proptest::prelude::*;
use url::Url;

use weibo_oauth::{AuthorizeOptions, Config, OAuthClient};

fn test_client() -> OAuthClient {
    OAuthClient::new(Config::for_testing("http://mock.localhost")).unwrap()
}

fn query_map(url: &Url) -> HashMap<String, String> {
    url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

proptest! {
    /// Every generated authorize URL parses and round-trips its inputs.
    #[test]
    fn authorize_url_roundtrips_inputs(
        redirect in "https://[a-z]{1,10}\\.example\\.com/[a-z0-9/]{0,20}",
        state in proptest::option::of("[A-Za-z0-9_-]{1,32}"),
        scope in proptest::option::of("[a-z_]{1,20}"),
        display in proptest::option::of("(default|mobile|wap|client)"),
        language in proptest::option::of("(zh_CN|zh_TW|en)"),
    ) {
        let client = test_client();
        let opts = AuthorizeOptions {
            state: state.clone(),
            scope: scope.clone(),
            display: display.clone(),
            language: language.clone(),
        };

        let raw = client.authorize_url(&redirect, &opts);
        let url = Url::parse(&raw).expect("authorize URL parses");
        let params = query_map(&url);

        prop_assert_eq!(url.fragment(), Some("weibo_redirect"));
        prop_assert_eq!(url.path(), "/oauth2/authorize");

        prop_assert_eq!(params.get("client_id").map(String::as_str), Some("test-client-id"));
        prop_assert_eq!(params.get("redirect_uri").map(String::as_str), Some(redirect.as_str()));
        prop_assert_eq!(params.get("response_type").map(String::as_str), Some("code"));

        // Defaults apply exactly when the option is omitted.
        prop_assert_eq!(
            params.get("scope").cloned(),
            Some(scope.unwrap_or_else(|| "users_show".to_owned()))
        );
        prop_assert_eq!(
            params.get("state").cloned(),
            Some(state.unwrap_or_default())
        );
        prop_assert_eq!(
            params.get("display").cloned(),
            Some(display.unwrap_or_else(|| "default".to_owned()))
        );
        prop_assert_eq!(params.get("language").cloned(), language);
    }

    /// The website-flow URL differs from the standard one only in its host.
    #[test]
    fn website_url_matches_api_url_except_host(
        redirect in "https://[a-z]{1,10}\\.example\\.com",
        state in "[A-Za-z0-9]{1,16}",
    ) {
        let client = test_client();
        let opts = AuthorizeOptions::with_state(state);

        let api = Url::parse(&client.authorize_url(&redirect, &opts)).unwrap();
        let site = Url::parse(&client.authorize_url_for_website(&redirect, &opts)).unwrap();

        prop_assert_eq!(api.path(), site.path());
        prop_assert_eq!(api.query(), site.query());
        prop_assert_eq!(api.fragment(), site.fragment());
    }
}
