//! Explicit authentication session.
//!
//! [`AuthSession`] is a cheaply cloneable handle to the current token pair.
//! The client reads the access token for every request and replaces the pair
//! after a refresh; callers can inspect, seed, or clear it directly.

use std::sync::{Arc, PoisonError, RwLock};

use wizplat_core::models::user::TokenPair;

#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    tokens: Arc<RwLock<Option<TokenPair>>>,
}

impl AuthSession {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session seeded with previously issued tokens.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Some(tokens))),
        }
    }

    pub fn set_tokens(&self, tokens: TokenPair) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    pub fn clear(&self) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|t| t.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().map(|t| t.refresh_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
