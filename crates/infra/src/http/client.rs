use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use snowgate_common::RetryConfig;
use snowgate_domain::{Result, ServiceNowError};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// HTTP client with built-in retry and timeout support.
///
/// Server errors (5xx) and transport failures (timeout, connect, request)
/// are retried according to the [`RetryConfig`]. Any other response is
/// returned to the caller on the first attempt. When retries run out the
/// last response or error is returned unchanged.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryConfig,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("retry", &self.retry).finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.retry.total_attempts();

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                ServiceNowError::new(
                    "request body cannot be cloned; buffer the body to enable retries",
                    500,
                )
            })?;

            let request = cloned_builder.build().map_err(|err| ServiceNowError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            let is_last = attempt + 1 >= attempts;

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && !is_last {
                        self.sleep_with_backoff(attempt, &status.to_string()).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if !is_last && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt, &err.to_string()).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(ServiceNowError::network("http client exhausted retries without producing a result"))
    }

    async fn sleep_with_backoff(&self, attempt: u32, reason: &str) {
        let delay = self.retry.delay_for(attempt);
        warn!(
            retry = attempt + 1,
            max_retries = self.retry.max_retries,
            delay_ms = delay.as_millis() as u64,
            reason,
            "retrying ServiceNow request"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryConfig,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        self.retry
            .validate()
            .map_err(|err| ServiceNowError::config(format!("invalid retry configuration: {err}")))?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| ServiceNowError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TABLE: &str = "/api/now/table/incident";

    fn quick_retries(max_retries: u32) -> RetryConfig {
        RetryConfig::builder()
            .max_retries(max_retries)
            .fixed_backoff(Duration::from_millis(5))
            .no_jitter()
            .build()
            .expect("retry config")
    }

    fn table_client() -> HttpClient {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        HttpClient::builder()
            .retry(quick_retries(2))
            .default_headers(headers)
            .user_agent("snowgate-test")
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn sends_default_headers_on_table_reads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TABLE))
            .and(header("accept", "application/json"))
            .and(header("user-agent", "snowgate-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = table_client();
        let url = format!("{}{TABLE}", server.uri());
        let response = client.send(client.request(Method::GET, url)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn replays_json_body_after_gateway_errors() {
        let server = MockServer::start().await;
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let payload = json!({ "short_description": "Printer on fire", "urgency": "1" });

        Mock::given(method("POST"))
            .and(path(TABLE))
            .and(body_json(payload.clone()))
            .respond_with(move |_: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(504)
                } else {
                    ResponseTemplate::new(201).set_body_json(json!({ "result": { "sys_id": "s1" } }))
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = table_client();
        let url = format!("{}{TABLE}", server.uri());
        let response =
            client.send(client.request(Method::POST, url).json(&payload)).await.expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn hands_back_unauthorized_without_retrying() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("{TABLE}/abc")))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = table_client();
        let url = format!("{}{TABLE}/abc", server.uri());
        let response = client
            .send(client.request(Method::PATCH, url).json(&json!({ "state": "2" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refused_connection_becomes_network_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("local addr")
        };

        let client = HttpClient::builder().retry(quick_retries(1)).build().expect("http client");
        let err = client
            .send(client.request(Method::GET, format!("http://{addr}{TABLE}")))
            .await
            .unwrap_err();

        assert_eq!(err.status_code, 500);
        assert_eq!(err.code_str(), Some("NETWORK_ERROR"));
    }

    #[tokio::test]
    async fn slow_instance_hits_the_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(50))
            .retry(RetryConfig::no_retry())
            .build()
            .expect("http client");

        let err = client.send(client.request(Method::GET, server.uri())).await.unwrap_err();
        assert!(err.message.contains("timed out"), "{}", err.message);
        assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
    }
}
