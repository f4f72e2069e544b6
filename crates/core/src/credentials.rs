//! Credential resolution and validation

use snowgate_domain::{AuthType, Credentials, Result, ServiceNowError};
use tracing::{debug, info};

use crate::ports::SecretStore;

/// Check that the fields required by the declared auth type are present.
///
/// # Errors
/// `CREDENTIALS_ERROR` (500) naming the first missing requirement.
pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    if is_blank(Some(credentials.instance.as_str())) {
        return Err(ServiceNowError::credentials(
            "Invalid credentials: ServiceNow instance URL is required",
        ));
    }

    match credentials.auth_type {
        AuthType::Basic => {
            if is_blank(credentials.username.as_deref()) || is_blank(credentials.password.as_deref())
            {
                return Err(ServiceNowError::credentials(
                    "Invalid credentials: username and password are required for basic authentication",
                ));
            }
        }
        AuthType::OAuth => {
            if is_blank(credentials.client_id.as_deref())
                || is_blank(credentials.client_secret.as_deref())
            {
                return Err(ServiceNowError::credentials(
                    "Invalid credentials: clientId and clientSecret are required for OAuth authentication",
                ));
            }
        }
    }

    Ok(())
}

/// Parse a secret string into validated credentials.
///
/// # Errors
/// `CREDENTIALS_ERROR` when the string is empty, is not valid JSON, or fails
/// [`validate_credentials`].
pub fn parse_credentials(secret: &str) -> Result<Credentials> {
    if secret.trim().is_empty() {
        return Err(ServiceNowError::credentials("Credentials secret is empty"));
    }

    let credentials: Credentials = serde_json::from_str(secret).map_err(|e| {
        ServiceNowError::credentials(format!("Failed to parse credentials secret: {e}"))
    })?;

    validate_credentials(&credentials)?;
    Ok(credentials)
}

/// Load credentials named `secret_name` from `store`.
///
/// # Errors
/// `CREDENTIALS_ERROR` when the secret is missing, unreadable, or invalid.
pub async fn resolve_credentials(store: &dyn SecretStore, secret_name: &str) -> Result<Credentials> {
    debug!(secret_name, "resolving ServiceNow credentials");

    let secret = store
        .get_secret(secret_name)
        .await
        .map_err(|e| {
            ServiceNowError::credentials(format!("Failed to retrieve ServiceNow credentials: {}", e.message))
        })?
        .ok_or_else(|| {
            ServiceNowError::credentials(format!("Credentials secret not found: {secret_name}"))
        })?;

    let credentials = parse_credentials(&secret)?;
    info!(
        instance = %credentials.base_url(),
        auth_type = %credentials.auth_type,
        "ServiceNow credentials resolved"
    );
    Ok(credentials)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
