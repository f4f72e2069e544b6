//! OAuth token types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while obtaining tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status
    #[error("token endpoint rejected the {grant} grant with status {status}")]
    Rejected { grant: &'static str, status: u16, body: String },

    /// The token endpoint could not be reached
    #[error("token request failed: {0}")]
    Transport(String),

    /// The token endpoint answered with something that is not a token
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// Credentials needed for a grant are not configured
    #[error("missing credentials for {0} grant")]
    MissingCredentials(&'static str),
}

/// Access token with its refresh token and expiry.
///
/// `expires_at` is the absolute expiry reported by the server. The expiry
/// buffer is applied when checking validity, not when storing.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub token_type: String,

    /// Access token lifetime in seconds as reported by the server
    pub expires_in: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

impl TokenSet {
    /// Create a new `TokenSet` whose `expires_at` is computed from `expires_in`.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at = (expires_in > 0).then(|| Utc::now() + chrono::Duration::seconds(expires_in));

        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Tokens supplied up front, e.g. from a secret, with no known expiry.
    ///
    /// A seeded access token is never trusted on its own: without an expiry
    /// it is treated as expired, so a seeded refresh token gets used first.
    #[must_use]
    pub fn seeded(access_token: Option<String>, refresh_token: Option<String>) -> Option<Self> {
        if access_token.is_none() && refresh_token.is_none() {
            return None;
        }

        Some(Self {
            access_token: access_token.unwrap_or_default(),
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: 0,
            expires_at: None,
            scope: None,
        })
    }

    /// Override the absolute expiry.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// True when the access token can be used for at least `buffer_seconds`
    /// more.
    #[must_use]
    pub fn is_usable(&self, buffer_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) if !self.access_token.is_empty() => {
                Utc::now() + chrono::Duration::seconds(buffer_seconds) < expires_at
            }
            _ => false,
        }
    }

    /// Seconds until expiry, if an expiry is known
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

/// OAuth token response from the authorization server (RFC 6749).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut tokens = TokenSet::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            response.scope,
        );
        if let Some(token_type) = response.token_type {
            tokens.token_type = token_type;
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_inside_buffer_is_not_usable() {
        let tokens = TokenSet::new("abc".into(), None, 30, None);
        assert!(!tokens.is_usable(60));
        assert!(tokens.is_usable(0));
    }

    #[test]
    fn token_outside_buffer_is_usable() {
        let tokens = TokenSet::new("abc".into(), Some("r".into()), 1800, None);
        assert!(tokens.is_usable(60));
        let remaining = tokens.seconds_until_expiry().unwrap();
        assert!((1795..=1800).contains(&remaining));
    }

    #[test]
    fn seeded_tokens_are_never_usable() {
        let tokens = TokenSet::seeded(Some("seed".into()), Some("refresh".into())).unwrap();
        assert!(!tokens.is_usable(0));
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
        assert!(TokenSet::seeded(None, None).is_none());
    }

    #[test]
    fn token_response_converts_with_server_token_type() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","token_type":"bearer","expires_in":1799,"scope":"useraccount"}"#,
        )
        .unwrap();
        let tokens = TokenSet::from(response);

        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.token_type, "bearer");
        assert_eq!(tokens.expires_in, 1799);
        assert!(tokens.expires_at.is_some());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let tokens = TokenSet::new("secret-access".into(), Some("secret-refresh".into()), 60, None);
        let rendered = format!("{tokens:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
