#![allow(dead_code)]

use serde_json::{json, Value};
use snowgate_domain::{ClientConfig, Credentials};
use snowgate_infra::ServiceNowClient;
use wiremock::{MockServer, ResponseTemplate};

/// Client settings tuned for tests: millisecond backoff, no rate limiting.
pub fn fast_config(credentials: Credentials) -> ClientConfig {
    let mut config = ClientConfig::new(credentials);
    config.retry_delay_ms = 1;
    config.max_retry_delay_ms = 5;
    config.timeout_ms = 5_000;
    config.rate_limit.enabled = false;
    config
}

/// Basic-auth client pointed at the mock server.
pub fn basic_client(server: &MockServer) -> ServiceNowClient {
    let credentials = Credentials::basic(server.uri(), "admin", "secret");
    ServiceNowClient::new(fast_config(credentials)).expect("basic client should build")
}

/// OAuth credentials with a resource owner for the password grant.
pub fn oauth_credentials(server: &MockServer) -> Credentials {
    Credentials::oauth(server.uri(), "client-id", "client-secret").with_user("svc.account", "pw")
}

pub fn oauth_client(server: &MockServer) -> ServiceNowClient {
    ServiceNowClient::new(fast_config(oauth_credentials(server))).expect("oauth client should build")
}

/// `{"result": value}` with status 200.
pub fn result(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": value }))
}

/// Token endpoint response body.
pub fn token(access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> ResponseTemplate {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "scope": "useraccount",
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// ServiceNow-style error body.
pub fn failure(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "message": message, "detail": null },
        "status": "failure",
    }))
}

pub fn incident(sys_id: &str, number: &str) -> Value {
    json!({
        "sys_id": sys_id,
        "number": number,
        "short_description": "Email is down",
        "state": "1",
        "priority": "2",
    })
}

/// Number of requests the server received for `path`.
pub async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .count()
}

/// JSON bodies the server received for `path`, in arrival order.
pub async fn bodies(server: &MockServer, path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .map(|request| serde_json::from_slice(&request.body).expect("request body should be JSON"))
        .collect()
}
