//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Machine-readable error codes carried by [`ServiceNowError`]
///
/// Codes reported by the remote instance that have no dedicated variant are
/// kept verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    MissingParameter,
    InvalidParameter,
    AuthError,
    NotFound,
    NetworkError,
    NotImplemented,
    CredentialsError,
    UnknownAction,
    UnsupportedTable,
    ConfigError,
    InvalidResponse,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::AuthError => "AUTH_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::NetworkError => "NETWORK_ERROR",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::CredentialsError => "CREDENTIALS_ERROR",
            Self::UnknownAction => "UNKNOWN_ACTION",
            Self::UnsupportedTable => "UNSUPPORTED_TABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::Other(code) => code.as_str(),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MISSING_PARAMETER" => Self::MissingParameter,
            "INVALID_PARAMETER" => Self::InvalidParameter,
            "AUTH_ERROR" => Self::AuthError,
            "NOT_FOUND" => Self::NotFound,
            "NETWORK_ERROR" => Self::NetworkError,
            "NOT_IMPLEMENTED" => Self::NotImplemented,
            "CREDENTIALS_ERROR" => Self::CredentialsError,
            "UNKNOWN_ACTION" => Self::UnknownAction,
            "UNSUPPORTED_TABLE" => Self::UnsupportedTable,
            "CONFIG_ERROR" => Self::ConfigError,
            "INVALID_RESPONSE" => Self::InvalidResponse,
            _ => Self::Other(value),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure raised by every client operation
///
/// Local validation failures, authentication failures, transport failures and
/// remote HTTP errors all surface in this one shape so callers can branch on
/// `status_code` and `error_code`.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceNowError {
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ServiceNowError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self { message: message.into(), status_code, error_code: None, details: None }
    }

    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.error_code = Some(code);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 400 for required inputs that are absent or blank
    pub fn missing_parameter<S: AsRef<str>>(fields: &[S]) -> Self {
        let names: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        Self::new(format!("Missing required parameters: {}", names.join(", ")), 400)
            .with_code(ErrorCode::MissingParameter)
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(message, 400).with_code(ErrorCode::InvalidParameter)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(message, 401).with_code(ErrorCode::AuthError)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404).with_code(ErrorCode::NotFound)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, 500).with_code(ErrorCode::NetworkError)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(message, 501).with_code(ErrorCode::NotImplemented)
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::new(message, 500).with_code(ErrorCode::CredentialsError)
    }

    pub fn unknown_action(action: &str) -> Self {
        Self::new(format!("Unknown action: {action}"), 400).with_code(ErrorCode::UnknownAction)
    }

    pub fn unsupported_table(table: &str) -> Self {
        Self::new(format!("Unsupported table: {table}"), 400).with_code(ErrorCode::UnsupportedTable)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(message, 500).with_code(ErrorCode::ConfigError)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(message, 500).with_code(ErrorCode::InvalidResponse)
    }

    /// Normalize a non-2xx response.
    ///
    /// The message comes from `error.message` (then `error.detail`) in a JSON
    /// body, falling back to `fallback_message`. The code comes from
    /// `error.code`. The raw body is kept as `details`, parsed when it is JSON.
    pub fn from_response(status_code: u16, fallback_message: &str, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let error_obj = parsed.as_ref().and_then(|v| v.get("error"));

        let message = error_obj
            .and_then(|e| e.get("message").or_else(|| e.get("detail")))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback_message)
            .to_string();

        let error_code = error_obj
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .map(|c| ErrorCode::from(c.to_string()));

        let details = match parsed {
            Some(json) => Some(json),
            None if body.is_empty() => None,
            None => Some(Value::String(body.to_string())),
        };

        Self { message, status_code, error_code, details }
    }

    /// The status is in the 4xx range
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match &self.error_code {
            Some(ErrorCode::NetworkError) => true,
            Some(
                ErrorCode::NotImplemented
                | ErrorCode::CredentialsError
                | ErrorCode::ConfigError
                | ErrorCode::InvalidResponse,
            ) => false,
            _ => self.status_code >= 500,
        }
    }

    pub fn code_str(&self) -> Option<&str> {
        self.error_code.as_ref().map(ErrorCode::as_str)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ServiceNowError>;
