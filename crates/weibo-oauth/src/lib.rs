//! Weibo OAuth2 Client
//!
//! An async client for the Sina Weibo authorization-code flow: authorize-URL
//! construction, code-for-token exchange, token refresh, token introspection,
//! and user-profile fetch with transparent refresh of expired tokens.
//!
//! Token persistence is pluggable: implement [`TokenStore`] over your database
//! or cache and pass it at construction. The bundled in-memory store is for
//! development and tests only.
//!
//! # Example
//!
//! ```no_run
//! use weibo_oauth::{AuthorizeOptions, Config, OAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = OAuthClient::new(config)?;
//!
//!     // Send the user here to authorize:
//!     let url = client.authorize_url("https://example.com/callback", &AuthorizeOptions::default());
//!     println!("{url}");
//!
//!     // Back on the callback, exchange the code and fetch the profile:
//!     let profile = client.get_user_by_code("CODE_FROM_CALLBACK").await?;
//!     println!("hello {}", profile.screen_name);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod token;

pub use client::{AuthorizeOptions, OAuthClient, UserQuery};
pub use config::Config;
pub use error::{OAuthError, OAuthResult, StoreError};
pub use models::{TokenInfo, UserProfile};
pub use store::{MemoryStore, TokenStore};
pub use token::{AccessToken, TokenData};
