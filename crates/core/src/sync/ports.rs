//! Port interfaces for synchronization

use async_trait::async_trait;
use clustersync_domain::{ClusterState, Result};

/// Reads the current state of a cluster from the control plane
#[async_trait]
pub trait ClusterStateSource: Send + Sync {
    /// Query the state of `cluster_id` once. Implementations must not cache.
    async fn cluster_state(&self, cluster_id: &str) -> Result<ClusterState>;
}
