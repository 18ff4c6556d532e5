//! Token persistence seam.
//!
//! The client never owns durable token state; it reads and writes through a
//! [`TokenStore`] supplied at construction. The bundled [`MemoryStore`] is a
//! process-local map meant for development and tests only - it has no
//! cross-process visibility and loses everything on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::token::TokenData;

/// Durable storage for token records, keyed by uid.
///
/// Implementations decide atomicity and locking; the client issues at most one
/// `save` per successful exchange or refresh and does not serialize concurrent
/// calls for the same uid.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Look up the stored token for a uid, if any.
    async fn get(&self, uid: &str) -> Result<Option<TokenData>, StoreError>;

    /// Persist a token record for a uid, replacing any previous one.
    async fn save(&self, uid: &str, token: &TokenData) -> Result<(), StoreError>;
}

/// In-memory token store.
///
/// Unsuitable for multi-instance deployments: state is local to this process.
/// The client logs a warning when this default is used in a production-like
/// environment.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tokens: Arc<RwLock<HashMap<String, TokenData>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, uid: &str) -> Result<Option<TokenData>, StoreError> {
        Ok(self.tokens.read().await.get(uid).cloned())
    }

    async fn save(&self, uid: &str, token: &TokenData) -> Result<(), StoreError> {
        self.tokens.write().await.insert(uid.to_owned(), token.clone());
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}
