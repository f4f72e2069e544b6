//! Request authentication for the Table API
//!
//! Basic credentials become a fixed `Authorization` header. OAuth credentials
//! go through a [`TokenManager`] backed by the instance's `/oauth_token.do`
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use snowgate_common::{AuthError, TokenGrantClient, TokenManager, TokenResponse, TokenSet};
use snowgate_domain::constants::OAUTH_TOKEN_PATH;
use snowgate_domain::{AuthType, Credentials, Result, ServiceNowError};
use tracing::debug;

use crate::errors::InfraError;

/// Grant client for `POST {instance}/oauth_token.do`
///
/// Each grant is a single form-encoded request. Token calls never go through
/// the retrying executor.
pub struct ServiceNowGrantClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for ServiceNowGrantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceNowGrantClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl ServiceNowGrantClient {
    /// # Errors
    /// `CREDENTIALS_ERROR` when the client id or secret is missing, or when the
    /// HTTP client cannot be built.
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        let (Some(client_id), Some(client_secret)) =
            (credentials.client_id.clone(), credentials.client_secret.clone())
        else {
            return Err(ServiceNowError::credentials(
                "OAuth credentials require clientId and clientSecret",
            ));
        };

        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|err| ServiceNowError::from(InfraError::from(err)))?;

        Ok(Self {
            client,
            token_url: format!("{}{OAUTH_TOKEN_PATH}", credentials.base_url()),
            client_id,
            client_secret,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    async fn exchange(
        &self,
        grant: &'static str,
        params: &[(&str, &str)],
    ) -> std::result::Result<TokenSet, AuthError> {
        debug!(grant, url = %self.token_url, "requesting OAuth token");

        let response = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { grant, status: status.as_u16(), body });
        }

        let token: TokenResponse =
            response.json().await.map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        Ok(token.into())
    }
}

#[async_trait]
impl TokenGrantClient for ServiceNowGrantClient {
    async fn password_grant(&self) -> std::result::Result<TokenSet, AuthError> {
        let (Some(username), Some(password)) = (self.username.as_deref(), self.password.as_deref())
        else {
            return Err(AuthError::MissingCredentials("password"));
        };

        self.exchange(
            "password",
            &[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("username", username),
                ("password", password),
            ],
        )
        .await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> std::result::Result<TokenSet, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingCredentials("refresh_token"));
        }

        self.exchange(
            "refresh_token",
            &[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }
}

/// Produces the `Authorization` header for each request
pub enum AuthProvider {
    Basic { header: String },
    OAuth(TokenManager<ServiceNowGrantClient>),
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { .. } => f.write_str("AuthProvider::Basic"),
            Self::OAuth(manager) => f.debug_tuple("AuthProvider::OAuth").field(manager).finish(),
        }
    }
}

impl AuthProvider {
    /// Build the provider matching `credentials.auth_type`
    ///
    /// Seeded `accessToken`/`refreshToken` values prime the OAuth cache.
    ///
    /// # Errors
    /// `CREDENTIALS_ERROR` when the fields the scheme needs are missing.
    pub fn from_credentials(
        credentials: &Credentials,
        timeout: Duration,
        expiry_buffer_secs: i64,
    ) -> Result<Self> {
        match credentials.auth_type {
            AuthType::Basic => {
                let (Some(username), Some(password)) =
                    (credentials.username.as_deref(), credentials.password.as_deref())
                else {
                    return Err(ServiceNowError::credentials(
                        "Basic auth requires username and password",
                    ));
                };
                Ok(Self::basic(username, password))
            }
            AuthType::OAuth => {
                let grants = ServiceNowGrantClient::new(credentials, timeout)?;
                let seeded = TokenSet::seeded(
                    credentials.access_token.clone(),
                    credentials.refresh_token.clone(),
                );
                Ok(Self::OAuth(TokenManager::new(grants, expiry_buffer_secs).with_tokens(seeded)))
            }
        }
    }

    pub fn basic(username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        Self::Basic { header: format!("Basic {encoded}") }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::Basic { .. } => AuthType::Basic,
            Self::OAuth(_) => AuthType::OAuth,
        }
    }

    /// Value for the `Authorization` header
    ///
    /// # Errors
    /// `AUTH_ERROR` (401) when no OAuth grant succeeds.
    pub async fn authorization_header(&self) -> Result<String> {
        match self {
            Self::Basic { header } => Ok(header.clone()),
            Self::OAuth(manager) => {
                let token = manager.get_access_token().await.map_err(auth_failure)?;
                Ok(format!("Bearer {token}"))
            }
        }
    }
}

fn auth_failure(err: AuthError) -> ServiceNowError {
    let message = format!("OAuth authentication failed: {err}");
    match err {
        AuthError::Rejected { body, .. } if !body.is_empty() => {
            let details = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
            ServiceNowError::auth(message).with_details(details)
        }
        _ => ServiceNowError::auth(message),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn oauth_credentials(instance: &str) -> Credentials {
        Credentials::oauth(instance, "cid", "csecret").with_user("svc", "pw")
    }

    #[tokio::test]
    async fn basic_header_is_precomputed() {
        let provider = AuthProvider::basic("admin", "secret");
        assert_eq!(provider.authorization_header().await.unwrap(), "Basic YWRtaW46c2VjcmV0");
        assert_eq!(provider.auth_type(), AuthType::Basic);
    }

    #[test]
    fn basic_requires_username_and_password() {
        let mut creds = Credentials::basic("https://x", "u", "p");
        creds.password = None;

        let err = AuthProvider::from_credentials(&creds, Duration::from_secs(5), 60).unwrap_err();
        assert_eq!(err.code_str(), Some("CREDENTIALS_ERROR"));
    }

    #[tokio::test]
    async fn password_grant_posts_form_to_token_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth_token.do"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("client_id=cid"))
            .and(body_string_contains("username=svc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "refresh_token": "ref-1",
                "token_type": "Bearer",
                "expires_in": 1799
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grants =
            ServiceNowGrantClient::new(&oauth_credentials(&server.uri()), Duration::from_secs(5)).unwrap();
        let tokens = grants.password_grant().await.unwrap();

        assert_eq!(tokens.access_token, "tok-1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("ref-1"));
        assert!(tokens.is_usable(60));
    }

    #[tokio::test]
    async fn rejected_grant_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth_token.do"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "access_denied"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            AuthProvider::from_credentials(&oauth_credentials(&server.uri()), Duration::from_secs(5), 60)
                .unwrap();
        let err = provider.authorization_header().await.unwrap_err();

        assert_eq!(err.status_code, 401);
        assert_eq!(err.code_str(), Some("AUTH_ERROR"));
        assert_eq!(err.details.unwrap()["error"], "access_denied");
    }

    #[tokio::test]
    async fn password_grant_without_user_is_missing_credentials() {
        let grants = ServiceNowGrantClient::new(
            &Credentials::oauth("https://x.service-now.com", "cid", "cs"),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(grants.password_grant().await.unwrap_err(), AuthError::MissingCredentials("password"));
        assert_eq!(grants.token_url(), "https://x.service-now.com/oauth_token.do");
    }
}
