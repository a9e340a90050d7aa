//! Clusters API façade
//!
//! Raw calls map one-to-one onto `clusters/*` endpoints. The `*_sync`
//! variants wrap a raw call in a synchronization session and return once
//! the cluster has reached the operation's target state.

use std::sync::Arc;

use async_trait::async_trait;
use clustersync_core::{
    ClusterStateSource, SyncOutcome, SyncPolicy, SyncReport, Synchronizer, Transition,
};
use clustersync_domain::constants::{
    CLUSTERS_CREATE, CLUSTERS_DELETE, CLUSTERS_EDIT, CLUSTERS_GET, CLUSTERS_LIST,
    CLUSTERS_PERMANENT_DELETE, CLUSTERS_RESTART, CLUSTERS_START,
};
use clustersync_domain::{
    ClusterIdRequest, ClusterInfo, ClusterOperation, ClusterState, CreateClusterRequest,
    CreateClusterResponse, EditClusterRequest, ListClustersResponse, Result,
};
use reqwest::Method;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::http::TransportClient;

/// Operations on clusters through a shared [`TransportClient`].
#[derive(Clone)]
pub struct ClustersApi {
    transport: Arc<TransportClient>,
    policy: SyncPolicy,
}

impl ClustersApi {
    pub fn new(transport: Arc<TransportClient>, policy: SyncPolicy) -> Self {
        Self { transport, policy }
    }

    /// Same transport, different polling cadence.
    pub fn with_policy(&self, policy: SyncPolicy) -> Self {
        Self { transport: Arc::clone(&self.transport), policy }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /* ---------------------------------------------------------------------- */
    /* Raw calls */
    /* ---------------------------------------------------------------------- */

    pub async fn create(&self, request: &CreateClusterRequest) -> Result<CreateClusterResponse> {
        self.transport.query(Method::POST, CLUSTERS_CREATE, Some(request)).await
    }

    pub async fn edit(&self, request: &EditClusterRequest) -> Result<()> {
        self.transport.execute(Method::POST, CLUSTERS_EDIT, Some(request)).await?;
        Ok(())
    }

    pub async fn start(&self, cluster_id: &str) -> Result<()> {
        self.post_id(CLUSTERS_START, cluster_id).await
    }

    pub async fn restart(&self, cluster_id: &str) -> Result<()> {
        self.post_id(CLUSTERS_RESTART, cluster_id).await
    }

    /// Terminate the cluster. Its configuration is kept and it can be
    /// started again.
    pub async fn delete(&self, cluster_id: &str) -> Result<()> {
        self.post_id(CLUSTERS_DELETE, cluster_id).await
    }

    /// Remove a terminated cluster for good.
    pub async fn permanent_delete(&self, cluster_id: &str) -> Result<()> {
        self.post_id(CLUSTERS_PERMANENT_DELETE, cluster_id).await
    }

    pub async fn get(&self, cluster_id: &str) -> Result<ClusterInfo> {
        let request = ClusterIdRequest::new(cluster_id);
        self.transport.query(Method::GET, CLUSTERS_GET, Some(&request)).await
    }

    pub async fn list(&self) -> Result<Vec<ClusterInfo>> {
        let response: ListClustersResponse =
            self.transport.query::<(), _>(Method::GET, CLUSTERS_LIST, None).await?;
        Ok(response.clusters)
    }

    pub async fn state(&self, cluster_id: &str) -> Result<ClusterState> {
        Ok(self.get(cluster_id).await?.state)
    }

    async fn post_id(&self, path: &str, cluster_id: &str) -> Result<()> {
        let request = ClusterIdRequest::new(cluster_id);
        self.transport.execute(Method::POST, path, Some(&request)).await?;
        Ok(())
    }

    /* ---------------------------------------------------------------------- */
    /* Synchronized calls */
    /* ---------------------------------------------------------------------- */

    /// Create a cluster and wait until it is `RUNNING`.
    #[instrument(skip_all, fields(spark_version = %request.spark_version))]
    pub async fn create_sync(&self, request: &CreateClusterRequest) -> Result<SyncReport> {
        let transition = Transition::for_operation(ClusterOperation::Create);
        self.synchronizer()
            .run(
                || async move { self.create(request).await.map(|response| response.cluster_id) },
                &transition,
            )
            .await
    }

    /// Apply a new configuration and wait until the cluster is `RUNNING`.
    ///
    /// A `TERMINATED` cluster is left alone: the edit is not sent and the
    /// report's outcome is `Skipped`.
    #[instrument(skip_all, fields(cluster_id = %request.cluster_id))]
    pub async fn edit_sync(&self, request: &EditClusterRequest) -> Result<SyncReport> {
        let transition = Transition::for_operation(ClusterOperation::Edit);
        self.synchronizer()
            .run_unless_settled(
                &request.cluster_id,
                || async move { self.edit(request).await.map(|()| request.cluster_id.clone()) },
                &transition,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn start_sync(&self, cluster_id: &str) -> Result<SyncReport> {
        let transition = Transition::for_operation(ClusterOperation::Start);
        self.synchronizer()
            .run(
                || async move { self.start(cluster_id).await.map(|()| cluster_id.to_string()) },
                &transition,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn restart_sync(&self, cluster_id: &str) -> Result<SyncReport> {
        let transition = Transition::for_operation(ClusterOperation::Restart);
        self.synchronizer()
            .run(
                || async move { self.restart(cluster_id).await.map(|()| cluster_id.to_string()) },
                &transition,
            )
            .await
    }

    /// Terminate the cluster and wait until it is `TERMINATED`.
    ///
    /// A cluster that does not exist counts as deleted; the report's outcome
    /// is then `Absent`.
    #[instrument(skip(self))]
    pub async fn delete_sync(&self, cluster_id: &str) -> Result<SyncReport> {
        let started = Instant::now();
        let transition = Transition::for_operation(ClusterOperation::Delete);
        let result = self
            .synchronizer()
            .run(
                || async move { self.delete(cluster_id).await.map(|()| cluster_id.to_string()) },
                &transition,
            )
            .await;

        absent_if_missing(cluster_id, started, result)
    }

    /// [`delete_sync`](Self::delete_sync), then remove the terminated
    /// cluster for good.
    #[instrument(skip(self))]
    pub async fn permanent_delete_sync(&self, cluster_id: &str) -> Result<SyncReport> {
        let started = Instant::now();
        let report = self.delete_sync(cluster_id).await?;
        if report.outcome == SyncOutcome::Absent {
            return Ok(report);
        }

        debug!("cluster terminated, deleting permanently");
        let result = self
            .permanent_delete(cluster_id)
            .await
            .map(|()| SyncReport { elapsed: started.elapsed(), ..report });

        absent_if_missing(cluster_id, started, result)
    }

    fn synchronizer(&self) -> Synchronizer<'_> {
        Synchronizer::new(self, self.policy)
    }
}

#[async_trait]
impl ClusterStateSource for ClustersApi {
    async fn cluster_state(&self, cluster_id: &str) -> Result<ClusterState> {
        self.state(cluster_id).await
    }
}

/// Deleting a cluster that is already gone succeeds.
fn absent_if_missing(
    cluster_id: &str,
    started: Instant,
    result: Result<SyncReport>,
) -> Result<SyncReport> {
    match result {
        Err(err) if err.is_resource_missing() => {
            warn!(cluster_id, error = %err, "cluster does not exist, treating delete as complete");
            Ok(SyncReport::absent(cluster_id, started.elapsed()))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clustersync_domain::EndpointConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn clusters_for(server: &MockServer) -> ClustersApi {
        let endpoint = EndpointConfig::new(&server.uri(), "t")
            .unwrap()
            .with_max_retries(0)
            .with_retry_delay(Duration::from_millis(5));
        let transport = Arc::new(TransportClient::new(&endpoint).unwrap());
        let policy = SyncPolicy::new(Duration::from_millis(10), Duration::from_secs(5));
        ClustersApi::new(transport, policy)
    }

    #[tokio::test]
    async fn get_decodes_cluster_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/get"))
            .and(query_param("cluster_id", "c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster_id": "c-1",
                "cluster_name": "etl",
                "state": "RESIZING",
                "state_message": "adding workers",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = clusters_for(&server).get("c-1").await.unwrap();
        assert_eq!(info.cluster_name.as_deref(), Some("etl"));
        assert_eq!(info.state, ClusterState::Resizing);
    }

    #[tokio::test]
    async fn list_tolerates_missing_clusters_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        assert!(clusters_for(&server).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_sync_skips_terminated_cluster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"cluster_id": "c-2", "state": "TERMINATED"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/edit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let request = EditClusterRequest {
            cluster_id: "c-2".into(),
            spark_version: "4.2.x-scala2.11".into(),
            node_type_id: "i3.xlarge".into(),
            num_workers: Some(4),
            ..Default::default()
        };
        let report = clusters_for(&server).edit_sync(&request).await.unwrap();

        assert_eq!(report.outcome, SyncOutcome::Skipped);
        assert_eq!(report.final_state, Some(ClusterState::Terminated));
    }

    #[tokio::test]
    async fn permanent_delete_failure_is_not_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/clusters/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"cluster_id": "c-3", "state": "TERMINATED"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/clusters/permanent-delete"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error_code": "PERMISSION_DENIED",
                "message": "not allowed",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = clusters_for(&server).permanent_delete_sync("c-3").await.unwrap_err();
        let api = err.api_error().expect("api error");
        assert_eq!(api.status(), Some(403));
        assert_eq!(api.code(), Some("PERMISSION_DENIED"));
    }
}
