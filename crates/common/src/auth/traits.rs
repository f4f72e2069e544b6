//! Traits for token endpoint access
//!
//! Abstracting the token endpoint keeps [`TokenManager`](super::TokenManager)
//! testable without a server and lets different providers plug in.

use async_trait::async_trait;

use super::types::{AuthError, TokenSet};

/// Client for the OAuth 2.0 grants used by the token manager
#[async_trait]
pub trait TokenGrantClient: Send + Sync {
    /// Resource owner password grant
    ///
    /// # Errors
    /// Returns error if credentials are missing or the endpoint rejects them
    async fn password_grant(&self) -> Result<TokenSet, AuthError>;

    /// Refresh token grant
    ///
    /// # Errors
    /// Returns error if the refresh token is expired, revoked, or unknown
    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenSet, AuthError>;
}
