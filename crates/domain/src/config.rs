//! Configuration structures
//!
//! [`Config`] is the serde shape of a configuration file. Connection
//! credentials in it are optional because they may come from the
//! environment instead; [`EndpointConfig`] is the resolved form the
//! transport is built from, and cannot exist without both a domain and a
//! token.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_BASE_PATH, DEFAULT_MAX_RETRIES, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_SECS, DEFAULT_SYNC_TIMEOUT,
};
use crate::errors::{ClusterSyncError, Result};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Connection settings as written by the user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// Retries after the first attempt; `0` disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            domain: None,
            token: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("domain", &self.domain)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_seconds", &self.retry_delay_seconds)
            .finish()
    }
}

/// Polling cadence and ceiling for synchronized operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_sync_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: DEFAULT_POLL_INTERVAL.as_secs(),
            timeout_seconds: DEFAULT_SYNC_TIMEOUT.as_secs(),
        }
    }
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_seconds() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_poll_interval_seconds() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_sync_timeout_seconds() -> u64 {
    DEFAULT_SYNC_TIMEOUT.as_secs()
}

/// Resolved endpoint configuration for the transport client
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    base_url: String,
    token: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl EndpointConfig {
    /// Build an endpoint for `domain` with default retry settings.
    ///
    /// A bare host gets `https://`; an explicit `http://` or `https://`
    /// scheme is kept.
    ///
    /// # Errors
    /// Returns `ClusterSyncError::Config` if either value is blank.
    pub fn new(domain: &str, token: &str) -> Result<Self> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(ClusterSyncError::Config("missing credentials: domain is empty".into()));
        }
        if token.trim().is_empty() {
            return Err(ClusterSyncError::Config("missing credentials: token is empty".into()));
        }

        let host = domain.trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/{API_BASE_PATH}")
        } else {
            format!("https://{host}/{API_BASE_PATH}")
        };

        Ok(Self {
            base_url,
            token: token.trim().to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        })
    }

    /// Apply the timeout and retry numbers from user settings.
    pub fn with_settings(mut self, settings: &ConnectionSettings) -> Self {
        self.request_timeout = Duration::from_secs(settings.request_timeout_seconds);
        self.max_retries = settings.max_retries;
        self.retry_delay = Duration::from_secs(settings.retry_delay_seconds);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Base address every request path is resolved against; ends in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
