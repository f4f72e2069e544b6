//! Process-wide client holder
//!
//! Hosts that serve many calls keep one [`SharedClient`] and call
//! [`SharedClient::get`] per call. The first call resolves credentials and
//! builds the client; later calls reuse it. A failed build is not cached.

use std::sync::Arc;

use snowgate_core::SecretStore;
use snowgate_domain::{Result, ServiceNowError, SnowgateConfig};
use tokio::sync::OnceCell;
use tracing::info;

use super::client::ServiceNowClient;

enum Source {
    Config { config: SnowgateConfig, store: Arc<dyn SecretStore> },
    Prebuilt,
}

/// Lazily initialised, injectable [`ServiceNowClient`]
pub struct SharedClient {
    cell: OnceCell<Arc<ServiceNowClient>>,
    source: Source,
}

impl std::fmt::Debug for SharedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedClient")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl SharedClient {
    /// Build on first use from `config.secret_name` in `store`.
    pub fn from_config(config: SnowgateConfig, store: Arc<dyn SecretStore>) -> Self {
        Self { cell: OnceCell::new(), source: Source::Config { config, store } }
    }

    /// Wrap an already-built client.
    pub fn with_client(client: Arc<ServiceNowClient>) -> Self {
        Self { cell: OnceCell::new_with(Some(client)), source: Source::Prebuilt }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// The shared client, building it if needed
    ///
    /// Concurrent first callers wait for a single build.
    ///
    /// # Errors
    /// The credential or construction error of this attempt; the next call
    /// tries again.
    pub async fn get(&self) -> Result<Arc<ServiceNowClient>> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                match &self.source {
                    Source::Config { config, store } => {
                        let client =
                            ServiceNowClient::from_secret_store(store.as_ref(), config).await?;
                        info!(
                            secret_name = %config.secret_name,
                            auth_type = %client.auth_type(),
                            "ServiceNow client initialised"
                        );
                        Ok::<_, ServiceNowError>(Arc::new(client))
                    }
                    Source::Prebuilt => Err(ServiceNowError::config(
                        "shared client has no configuration to build from",
                    )),
                }
            })
            .await?;
        Ok(Arc::clone(client))
    }
}

#[cfg(test)]
mod tests {
    use snowgate_domain::{ClientConfig, Credentials};

    use super::*;
    use crate::secrets::StaticSecretStore;

    #[tokio::test]
    async fn injected_client_is_returned() {
        let client = Arc::new(
            ServiceNowClient::new(ClientConfig::new(Credentials::basic("https://x", "u", "p")))
                .unwrap(),
        );
        let shared = SharedClient::with_client(Arc::clone(&client));

        assert!(shared.is_initialized());
        assert!(Arc::ptr_eq(&shared.get().await.unwrap(), &client));
    }

    #[tokio::test]
    async fn failed_initialisation_is_retried() {
        let shared = SharedClient::from_config(
            SnowgateConfig::default(),
            Arc::new(StaticSecretStore::new()),
        );

        let err = shared.get().await.unwrap_err();
        assert_eq!(err.code_str(), Some("CREDENTIALS_ERROR"));
        assert!(!shared.is_initialized());
        assert!(shared.get().await.is_err());
    }

    #[tokio::test]
    async fn builds_once_and_reuses() {
        let secret = serde_json::to_string(&Credentials::basic("https://dev.service-now.com", "u", "p"))
            .unwrap();
        let store = StaticSecretStore::new().with_secret("servicenow/credentials", secret);
        let shared = SharedClient::from_config(SnowgateConfig::default(), Arc::new(store));

        assert!(!shared.is_initialized());
        let first = shared.get().await.unwrap();
        let second = shared.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.base_url(), "https://dev.service-now.com");
    }
}
