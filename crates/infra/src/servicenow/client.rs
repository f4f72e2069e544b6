//! Table API executor
//!
//! Every call goes through the same pipeline: one rate-limit token, an
//! `Authorization` header, then [`HttpClient::send`] with retry. Non-2xx
//! responses are normalised into [`ServiceNowError`].

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use snowgate_common::{RateLimitSettings, RateLimiter, RetryConfig};
use snowgate_core::{non_blank, resolve_credentials, validate_credentials, EncodedQuery, SecretStore};
use snowgate_domain::constants::TABLE_API_PREFIX;
use snowgate_domain::{
    AuthType, ClientConfig, ListResponse, Result, ServiceNowError, SingleResponse, SnowgateConfig,
};
use tracing::debug;
use url::Url;

use super::auth::AuthProvider;
use crate::http::HttpClient;

const USER_AGENT: &str = concat!("snowgate/", env!("CARGO_PKG_VERSION"));

fn instance_url(instance: &str) -> Result<String> {
    match Url::parse(instance) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(instance.to_string())
        }
        _ => Err(ServiceNowError::credentials(format!(
            "Invalid credentials: instance is not an http(s) URL: {instance}"
        ))),
    }
}

/// Query string pairs
pub type QueryParams<'a> = [(&'a str, String)];

/// Client for one ServiceNow instance
///
/// Share it behind an `Arc`; the rate limiter and token cache are internal.
#[derive(Debug)]
pub struct ServiceNowClient {
    base_url: String,
    http: HttpClient,
    auth: AuthProvider,
    rate_limiter: RateLimiter,
}

impl ServiceNowClient {
    /// # Errors
    /// `CREDENTIALS_ERROR` for incomplete credentials or an instance that is
    /// not an http(s) URL, `CONFIG_ERROR` for invalid retry or rate-limit
    /// settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        validate_credentials(&config.credentials)?;
        let base_url = instance_url(config.credentials.base_url())?;

        let retry = RetryConfig::builder()
            .max_retries(config.max_retries)
            .exponential_backoff(config.retry_delay(), 2.0, config.max_retry_delay())
            .proportional_jitter(0.1)
            .build()
            .map_err(|err| ServiceNowError::config(format!("invalid retry configuration: {err}")))?;

        let rate_limiter = RateLimiter::new(RateLimitSettings {
            max_requests: config.rate_limit.max_requests,
            window: config.rate_limit.window(),
            enabled: config.rate_limit.enabled,
        })
        .map_err(|err| ServiceNowError::config(format!("invalid rate limit configuration: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .retry(retry)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let auth = AuthProvider::from_credentials(
            &config.credentials,
            config.timeout(),
            config.token_expiry_buffer_secs,
        )?;

        Ok(Self {
            base_url,
            http,
            auth,
            rate_limiter,
        })
    }

    /// Resolve credentials from `store` and build a client with the host
    /// settings in `config`.
    pub async fn from_secret_store(store: &dyn SecretStore, config: &SnowgateConfig) -> Result<Self> {
        let credentials = resolve_credentials(store, &config.secret_name).await?;
        Self::new(config.client_config(credentials))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth.auth_type()
    }

    pub fn auth(&self) -> &AuthProvider {
        &self.auth
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Send one logical request and decode the JSON response body.
    ///
    /// `path` is relative to the instance URL, e.g. `/api/now/table/incident`.
    ///
    /// # Errors
    /// Non-2xx responses keep their status and the platform's error message.
    /// Transport failures are `NETWORK_ERROR`, undecodable bodies are
    /// `INVALID_RESPONSE`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &QueryParams<'_>,
    ) -> Result<T> {
        self.rate_limiter.acquire().await;
        let authorization = self.auth.authorization_header().await?;

        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "ServiceNow request");

        let mut builder =
            self.http.request(method.clone(), &url).header(AUTHORIZATION, authorization);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ServiceNowError::network(format!("failed to read response body: {err}")))?;

        if !status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "ServiceNow request failed");
            let reason = status.canonical_reason().unwrap_or("Request failed");
            return Err(ServiceNowError::from_response(status.as_u16(), reason, &text));
        }

        serde_json::from_str(&text).map_err(|err| {
            ServiceNowError::invalid_response(format!("failed to decode {path} response: {err}"))
                .with_details(Value::String(text))
        })
    }

    /// `GET /api/now/table/{table}/{sys_id}`
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        sys_id: &str,
        query: &QueryParams<'_>,
    ) -> Result<T> {
        let envelope: SingleResponse<T> =
            self.request(Method::GET, &record_path(table, sys_id), None, query).await?;
        Ok(envelope.result)
    }

    /// `GET /api/now/table/{table}`
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &QueryParams<'_>,
    ) -> Result<Vec<T>> {
        let envelope: ListResponse<T> =
            self.request(Method::GET, &table_path(table), None, query).await?;
        Ok(envelope.result)
    }

    /// `POST /api/now/table/{table}`
    pub async fn create_record<T, B>(&self, table: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        let envelope: SingleResponse<T> =
            self.request(Method::POST, &table_path(table), Some(&body), &[]).await?;
        Ok(envelope.result)
    }

    /// `PATCH /api/now/table/{table}/{sys_id}`
    pub async fn update_record<T, B>(&self, table: &str, sys_id: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        let envelope: SingleResponse<T> =
            self.request(Method::PATCH, &record_path(table, sys_id), Some(&body), &[]).await?;
        Ok(envelope.result)
    }

    /// Fetch a record by `number`, or by `sys_id` when no number is given.
    ///
    /// The number wins when both are present. A number lookup that matches
    /// nothing is `NOT_FOUND`; passing neither key is `MISSING_PARAMETER`.
    pub(crate) async fn find_by_number_or_id<T: DeserializeOwned>(
        &self,
        table: &str,
        sys_id: Option<&str>,
        number: Option<&str>,
        query: &QueryParams<'_>,
    ) -> Result<T> {
        let Some(number) = non_blank(number) else {
            return match non_blank(sys_id) {
                Some(sys_id) => self.get_record(table, sys_id, query).await,
                None => Err(ServiceNowError::missing_parameter(&["sys_id or number"])),
            };
        };

        let mut params: Vec<(&str, String)> = vec![
            ("sysparm_query", EncodedQuery::new().eq("number", number).build()),
            ("sysparm_limit", "1".to_string()),
        ];
        params.extend(query.iter().cloned());

        self.list_records(table, &params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceNowError::not_found(format!("No {table} record found with number {number}")))
    }
}

pub(crate) fn table_path(table: &str) -> String {
    format!("{TABLE_API_PREFIX}/{}", urlencoding::encode(table))
}

pub(crate) fn record_path(table: &str, sys_id: &str) -> String {
    format!("{}/{}", table_path(table), urlencoding::encode(sys_id))
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|err| ServiceNowError::invalid_parameter(format!("request body is not valid JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use snowgate_domain::{Credentials, RateLimitConfig};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ServiceNowClient {
        let mut config = ClientConfig::new(Credentials::basic(format!("{}/", server.uri()), "admin", "pw"));
        config.retry_delay_ms = 1;
        config.max_retry_delay_ms = 5;
        ServiceNowClient::new(config).unwrap()
    }

    #[test]
    fn paths_are_encoded() {
        assert_eq!(table_path("incident"), "/api/now/table/incident");
        assert_eq!(record_path("incident", "a b"), "/api/now/table/incident/a%20b");
    }

    #[tokio::test]
    async fn sends_json_headers_auth_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/now/table/incident"))
            .and(query_param("sysparm_limit", "5"))
            .and(header("authorization", "Basic YWRtaW46cHc="))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let records: Vec<Value> =
            client.list_records("incident", &[("sysparm_limit", "5".to_string())]).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(client.base_url(), server.uri());
    }

    #[tokio::test]
    async fn patch_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/now/table/incident/abc"))
            .and(body_json(serde_json::json!({"comments": "hi"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": {"sys_id": "abc"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let record: Value = client_for(&server)
            .update_record("incident", "abc", &serde_json::json!({"comments": "hi"}))
            .await
            .unwrap();
        assert_eq!(record["sys_id"], "abc");
    }

    #[tokio::test]
    async fn error_body_is_normalised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"message": "User Not Authorized", "detail": "ACL"},
                "status": "failure"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).get_record::<Value>("incident", "x", &[]).await.unwrap_err();

        assert_eq!(err.status_code, 403);
        assert_eq!(err.message, "User Not Authorized");
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn undecodable_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_record::<Value>("incident", "x", &[]).await.unwrap_err();

        assert_eq!(err.status_code, 500);
        assert_eq!(err.code_str(), Some("INVALID_RESPONSE"));
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = ClientConfig::new(Credentials::basic("https://x", "u", "p"));
        config.rate_limit = RateLimitConfig { max_requests: 0, window_ms: 1000, enabled: true };
        assert_eq!(ServiceNowClient::new(config).unwrap_err().code_str(), Some("CONFIG_ERROR"));

        let mut config = ClientConfig::new(Credentials::basic("https://x", "u", "p"));
        config.retry_delay_ms = 20_000;
        assert_eq!(ServiceNowClient::new(config).unwrap_err().code_str(), Some("CONFIG_ERROR"));

        let config = ClientConfig::new(Credentials::basic("", "u", "p"));
        assert_eq!(ServiceNowClient::new(config).unwrap_err().code_str(), Some("CREDENTIALS_ERROR"));

        let config = ClientConfig::new(Credentials::basic("dev12345.service-now.com", "u", "p"));
        let err = ServiceNowClient::new(config).unwrap_err();
        assert_eq!(err.code_str(), Some("CREDENTIALS_ERROR"));
        assert!(err.message.contains("dev12345.service-now.com"));
    }
}
