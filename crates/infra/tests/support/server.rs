//! Wiremock helpers for scripting control-plane responses

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clustersync_core::SyncPolicy;
use clustersync_domain::EndpointConfig;
use clustersync_infra::{ApiClient, ClustersApi};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Poll fast and give up well before a test would hang.
pub fn fast_policy() -> SyncPolicy {
    SyncPolicy::new(Duration::from_millis(10), Duration::from_secs(5))
}

/// A client for `server` that retries `max_retries` times with a tiny delay.
pub fn client_for(server: &MockServer, max_retries: u32, policy: SyncPolicy) -> ApiClient {
    let endpoint = EndpointConfig::new(&server.uri(), "dapi-integration")
        .expect("endpoint")
        .with_max_retries(max_retries)
        .with_retry_delay(Duration::from_millis(10));
    ApiClient::builder().endpoint(endpoint).sync_policy(policy).build().expect("api client")
}

pub fn clusters_for(server: &MockServer, max_retries: u32) -> ClustersApi {
    client_for(server, max_retries, fast_policy()).clusters().clone()
}

/// Answer `verb path` with `responses` in order, repeating the last one.
///
/// Returns the number of requests the endpoint has received.
pub async fn mount_sequence(
    server: &MockServer,
    verb: &str,
    endpoint: &str,
    responses: Vec<ResponseTemplate>,
) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    Mock::given(method(verb))
        .and(path(format!("/api/2.0/{endpoint}")))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            let current = hits_clone.fetch_add(1, Ordering::SeqCst);
            responses
                .get(current)
                .or_else(|| responses.last())
                .cloned()
                .unwrap_or_else(|| ResponseTemplate::new(500))
        })
        .mount(server)
        .await;
    hits
}

pub fn cluster_state(cluster_id: &str, state: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"cluster_id": cluster_id, "state": state}))
}

pub fn empty_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({}))
}

pub fn does_not_exist(cluster_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error_code": "INVALID_PARAMETER_VALUE",
        "message": format!("Cluster {cluster_id} does not exist"),
    }))
}

pub fn unavailable() -> ResponseTemplate {
    ResponseTemplate::new(503).set_body_string("service temporarily unavailable")
}

pub fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
