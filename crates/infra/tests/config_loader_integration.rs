//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a client from it.

use std::io::Write;

use snowgate_domain::{AuthType, LogFormat};
use snowgate_infra::{config, FileSecretStore, ServiceNowClient};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "secret_name": "prod/servicenow",
            "rate_limit": { "max_requests": 25, "window_ms": 10000, "enabled": true },
            "timeout_ms": 15000,
            "max_retries": 2,
            "retry_delay_ms": 500,
            "max_retry_delay_ms": 8000,
            "logging": { "level": "debug", "format": "json" }
        }"#,
        "json",
    );

    let config = tokio_test::assert_ok!(config::load_from_file(Some(path.clone())));

    assert_eq!(config.secret_name, "prod/servicenow");
    assert_eq!(config.rate_limit.max_requests, 25);
    assert_eq!(config.rate_limit.window_ms, 10_000);
    assert_eq!(config.timeout_ms, 15_000);
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.retry_delay_ms, 500);
    assert_eq!(config.max_retry_delay_ms, 8_000);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
secret_name = "staging/servicenow"
max_retries = 0

[rate_limit]
max_requests = 5
window_ms = 1000
enabled = false

[logging]
level = "warn"
"#,
        "toml",
    );

    let config = tokio_test::assert_ok!(config::load_from_file(Some(path.clone())));

    assert_eq!(config.secret_name, "staging/servicenow");
    assert_eq!(config.max_retries, 0);
    assert!(!config.rate_limit.enabled);
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_minimal_fields() {
    let path = write_config("{}", "json");

    let config = tokio_test::assert_ok!(config::load_from_file(Some(path.clone())));

    assert_eq!(config, snowgate_domain::SnowgateConfig::default());
    assert_eq!(config.secret_name, "servicenow/credentials");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let err = tokio_test::assert_err!(config::load_from_file(Some(
        "/nonexistent/path/snowgate.json".into()
    )));

    assert_eq!(err.code_str(), Some("CONFIG_ERROR"));
    assert!(err.message.contains("not found"), "Error message should mention 'not found'");
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = write_config(r#"{ "this is": "not valid" "#, "json");

    let err = tokio_test::assert_err!(config::load_from_file(Some(path.clone())));

    assert_eq!(err.code_str(), Some("CONFIG_ERROR"));
    assert!(err.message.contains("Invalid JSON"), "Error message should mention invalid JSON");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_unsupported_extension() {
    let path = write_config("secret_name: x", "yaml");

    let err = tokio_test::assert_err!(config::load_from_file(Some(path.clone())));
    assert!(err.message.contains("Unsupported config format"));

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_client_from_file_config_and_file_secret() {
    let secrets = tempfile::tempdir().expect("Failed to create secret dir");
    std::fs::create_dir_all(secrets.path().join("prod")).expect("Failed to create secret subdir");
    std::fs::write(
        secrets.path().join("prod").join("servicenow.json"),
        r#"{"instance":"https://dev1.service-now.com/","authType":"oauth","clientId":"cid","clientSecret":"cs","username":"svc","password":"pw"}"#,
    )
    .expect("Failed to write secret");

    let path = write_config(r#"{ "secret_name": "prod/servicenow" }"#, "json");
    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    let store = FileSecretStore::new(secrets.path());
    let client = tokio_test::assert_ok!(ServiceNowClient::from_secret_store(&store, &config).await);

    assert_eq!(client.base_url(), "https://dev1.service-now.com");
    assert_eq!(client.auth_type(), AuthType::OAuth);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_missing_secret_is_a_credentials_error() {
    let secrets = tempfile::tempdir().expect("Failed to create secret dir");
    let store = FileSecretStore::new(secrets.path());

    let err = ServiceNowClient::from_secret_store(&store, &snowgate_domain::SnowgateConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.code_str(), Some("CREDENTIALS_ERROR"));
}
