//! Domain-level constants
//!
//! Defaults mirror the control plane's own recommendations; the endpoint
//! paths are relative to the `/api/2.0/` base.

use std::time::Duration;

// Environment fallback for connection settings
pub const ENV_DOMAIN: &str = "DATABRICKS_DOMAIN";
pub const ENV_TOKEN: &str = "DATABRICKS_TOKEN";

// Transport defaults
pub const API_BASE_PATH: &str = "api/2.0/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

// Synchronizer defaults
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// Shortest interval between two state queries of one session.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

// Error codes
pub const INVALID_PARAMETER_VALUE: &str = "INVALID_PARAMETER_VALUE";
pub const RESOURCE_MISSING_MARKER: &str = "does not exist";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const TIMEOUT_ERROR: &str = "TIMEOUT";
pub const REQUEST_ERROR: &str = "REQUEST_ERROR";

// Clusters endpoints
pub const CLUSTERS_CREATE: &str = "clusters/create";
pub const CLUSTERS_EDIT: &str = "clusters/edit";
pub const CLUSTERS_START: &str = "clusters/start";
pub const CLUSTERS_RESTART: &str = "clusters/restart";
pub const CLUSTERS_DELETE: &str = "clusters/delete";
pub const CLUSTERS_PERMANENT_DELETE: &str = "clusters/permanent-delete";
pub const CLUSTERS_GET: &str = "clusters/get";
pub const CLUSTERS_LIST: &str = "clusters/list";
