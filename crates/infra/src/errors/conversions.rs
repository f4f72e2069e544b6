//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use snowgate_domain::ServiceNowError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ServiceNowError);

impl From<InfraError> for ServiceNowError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ServiceNowError> for InfraError {
    fn from(value: ServiceNowError) -> Self {
        InfraError(value)
    }
}

trait IntoServiceNowError {
    fn into_servicenow(self) -> ServiceNowError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → ServiceNowError */
/* -------------------------------------------------------------------------- */

impl IntoServiceNowError for KeyringError {
    fn into_servicenow(self) -> ServiceNowError {
        use KeyringError::{Ambiguous, BadEncoding, Invalid, NoEntry, NoStorageAccess, PlatformFailure, TooLong};

        let description = self.to_string();

        let message = match self {
            NoEntry => "keychain entry not found".to_string(),
            BadEncoding(_) => "credential in keychain is not valid UTF-8".to_string(),
            TooLong(name, limit) => {
                format!("keychain attribute '{name}' exceeds platform limit ({limit})")
            }
            Invalid(attr, reason) => format!("keychain attribute '{attr}' is invalid: {reason}"),
            Ambiguous(entries) => {
                format!("multiple keychain entries matched request ({} results)", entries.len())
            }
            PlatformFailure(err) => format!("keychain platform error: {err}"),
            NoStorageAccess(err) => format!("unable to access secure storage: {err}"),
            _ => description,
        };

        ServiceNowError::credentials(message)
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_servicenow())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ServiceNowError */
/* -------------------------------------------------------------------------- */

impl IntoServiceNowError for HttpError {
    fn into_servicenow(self) -> ServiceNowError {
        if self.is_timeout() {
            return ServiceNowError::network(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return ServiceNowError::network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return ServiceNowError::invalid_response(format!("failed to decode response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return ServiceNowError::from_response(code, reason, "");
        }

        ServiceNowError::network(format!("HTTP request failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_servicenow())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use snowgate_domain::ErrorCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_credentials_error() {
        let mapped: ServiceNowError = InfraError::from(KeyringError::NoEntry).into();

        assert_eq!(mapped.status_code, 500);
        assert_eq!(mapped.error_code, Some(ErrorCode::CredentialsError));
        assert!(mapped.message.contains("keychain"));
    }

    #[tokio::test]
    async fn http_status_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ServiceNowError = InfraError::from(error).into();
        assert_eq!(mapped.status_code, 401);
        assert_eq!(mapped.message, "Unauthorized");
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: ServiceNowError = InfraError::from(error).into();
        assert_eq!(mapped.status_code, 500);
        assert_eq!(mapped.code_str(), Some("NETWORK_ERROR"));
    }
}
