//! Token manager with cached access tokens and refresh fallback
//!
//! The manager holds at most one [`TokenSet`]. `get_access_token` takes an
//! async mutex for the whole check-and-grant sequence, so concurrent callers
//! that find the token expired wait for a single grant instead of each
//! issuing their own.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::traits::TokenGrantClient;
use super::types::{AuthError, TokenSet};

/// Default safety margin applied to token expiry
pub const DEFAULT_EXPIRY_BUFFER_SECONDS: i64 = 60;

/// Token manager with refresh-then-reauthenticate semantics
pub struct TokenManager<G: TokenGrantClient> {
    grant_client: G,
    tokens: Mutex<Option<TokenSet>>,
    expiry_buffer_seconds: i64,
}

impl<G: TokenGrantClient> std::fmt::Debug for TokenManager<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("expiry_buffer_seconds", &self.expiry_buffer_seconds)
            .finish_non_exhaustive()
    }
}

impl<G: TokenGrantClient> TokenManager<G> {
    /// Create a token manager with no cached tokens
    ///
    /// # Arguments
    /// * `grant_client` - Token endpoint client
    /// * `expiry_buffer_seconds` - Tokens expiring within this many seconds
    ///   are treated as already expired
    #[must_use]
    pub fn new(grant_client: G, expiry_buffer_seconds: i64) -> Self {
        Self { grant_client, tokens: Mutex::new(None), expiry_buffer_seconds }
    }

    /// Prime the cache with tokens obtained elsewhere.
    #[must_use]
    pub fn with_tokens(mut self, tokens: Option<TokenSet>) -> Self {
        self.tokens = Mutex::new(tokens);
        self
    }

    /// Return a valid access token, running a grant if needed.
    ///
    /// # Errors
    /// Returns the password grant's error when no grant succeeds. A failed
    /// refresh grant is logged and followed by a password grant.
    pub async fn get_access_token(&self) -> Result<String, AuthError> {
        let mut tokens = self.tokens.lock().await;

        if let Some(current) = tokens.as_ref() {
            if current.is_usable(self.expiry_buffer_seconds) {
                return Ok(current.access_token.clone());
            }
        }

        let previous_refresh = tokens.as_ref().and_then(|t| t.refresh_token.clone());
        let mut fresh = match previous_refresh.as_deref() {
            Some(refresh_token) => match self.grant_client.refresh_grant(refresh_token).await {
                Ok(fresh) => {
                    info!("access token refreshed");
                    fresh
                }
                Err(err) => {
                    warn!(error = %err, "token refresh failed, falling back to password grant");
                    self.authenticate().await?
                }
            },
            None => self.authenticate().await?,
        };

        // Some servers omit the refresh token on refresh; keep the one we had.
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = previous_refresh;
        }

        debug!(expires_in = fresh.expires_in, "caching access token");
        let access_token = fresh.access_token.clone();
        *tokens = Some(fresh);
        Ok(access_token)
    }

    /// Current token set without triggering a grant
    pub async fn current_tokens(&self) -> Option<TokenSet> {
        self.tokens.lock().await.clone()
    }

    /// Drop the cached access token; the refresh token is kept.
    pub async fn invalidate(&self) {
        if let Some(tokens) = self.tokens.lock().await.as_mut() {
            tokens.expires_at = None;
        }
    }

    async fn authenticate(&self) -> Result<TokenSet, AuthError> {
        let tokens = self.grant_client.password_grant().await?;
        info!("OAuth password grant succeeded");
        Ok(tokens)
    }
}
