//! Example: Driving a cluster through its lifecycle
//!
//! Creates a small cluster, waits for it to run, restarts it, then
//! terminates and permanently deletes it.
//!
//! # Setup
//!
//! 1. Export credentials (or put them in `./clustersync.toml`): ```bash
//!    export DATABRICKS_DOMAIN=dbc-1234.cloud.databricks.com export
//!    DATABRICKS_TOKEN=dapi... ```
//!
//! 2. Run this example: ```bash RUST_LOG=clustersync=debug cargo run
//!    --example cluster_lifecycle ```

use clustersync_domain::CreateClusterRequest;
use clustersync_infra::{config, ApiClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load()?;
    let client = ApiClient::from_config(&config)?;
    let clusters = client.clusters();

    let request = CreateClusterRequest {
        cluster_name: Some("clustersync-example".into()),
        spark_version: "4.2.x-scala2.11".into(),
        node_type_id: "i3.xlarge".into(),
        num_workers: Some(1),
        autotermination_minutes: Some(20),
        ..Default::default()
    };

    let created = clusters.create_sync(&request).await?;
    tracing::info!(cluster_id = %created.cluster_id, polls = created.polls, "cluster running");

    let restarted = clusters.restart_sync(&created.cluster_id).await?;
    tracing::info!(elapsed = ?restarted.elapsed, "cluster restarted");

    let deleted = clusters.permanent_delete_sync(&created.cluster_id).await?;
    tracing::info!(outcome = ?deleted.outcome, "cluster removed");

    Ok(())
}
