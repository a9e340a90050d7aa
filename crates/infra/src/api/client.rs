//! API client entry point
//!
//! Resolves credentials, builds the shared transport and exposes the
//! clusters façade.

use std::sync::Arc;

use clustersync_core::SyncPolicy;
use clustersync_domain::{Config, ConnectionSettings, EndpointConfig, Result};
use tracing::info;

use super::clusters::ClustersApi;
use crate::config::resolve_endpoint;
use crate::http::TransportClient;

/// Entry point for every remote operation
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<TransportClient>,
    clusters: ClustersApi,
}

impl ApiClient {
    /// Build a client from loaded configuration
    ///
    /// Credentials missing from `config` are read from `DATABRICKS_DOMAIN`
    /// and `DATABRICKS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `ClusterSyncError::Config` if credentials cannot be resolved
    /// or the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .connection(config.connection.clone())
            .sync_policy(SyncPolicy::from(&config.sync))
            .build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn clusters(&self) -> &ClustersApi {
        &self.clusters
    }

    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    connection: Option<ConnectionSettings>,
    endpoint: Option<EndpointConfig>,
    sync_policy: SyncPolicy,
}

impl ApiClientBuilder {
    /// Connection settings; blank credentials fall back to the environment.
    pub fn connection(mut self, settings: ConnectionSettings) -> Self {
        self.connection = Some(settings);
        self
    }

    /// An already resolved endpoint; takes precedence over
    /// [`connection`](Self::connection).
    pub fn endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// # Errors
    ///
    /// Returns `ClusterSyncError::Config` if credentials cannot be resolved
    /// or the HTTP client cannot be built
    pub fn build(self) -> Result<ApiClient> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => resolve_endpoint(&self.connection.unwrap_or_default())?,
        };

        let transport = Arc::new(TransportClient::new(&endpoint)?);
        info!(
            base_url = %transport.base_url(),
            max_attempts = transport.max_attempts(),
            "API client ready"
        );

        Ok(ApiClient {
            clusters: ClustersApi::new(Arc::clone(&transport), self.sync_policy),
            transport,
        })
    }
}
