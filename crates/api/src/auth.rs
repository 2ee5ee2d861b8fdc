//! Bearer-token authentication.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use common::Principal;
use tokio::sync::RwLock;

/// Resolves a bearer token to the principal it belongs to.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the principal for a valid token, `None` otherwise.
    async fn verify(&self, token: &str) -> Option<Principal>;
}

/// Authenticator backed by a static token table.
///
/// Stands in for a real identity service; tokens are registered at
/// startup (or by tests) and never expire.
#[derive(Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: Arc<RwLock<HashMap<String, Principal>>>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a principal, replacing any previous entry.
    pub async fn register(&self, token: impl Into<String>, principal: Principal) {
        self.tokens.write().await.insert(token.into(), principal);
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn verify(&self, token: &str) -> Option<Principal> {
        self.tokens.read().await.get(token).cloned()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
