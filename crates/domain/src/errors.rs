//! Error types used throughout clustersync
//!
//! Two layers:
//! - [`ApiError`] is the structured error produced by the transport for a
//!   non-200 response or a network failure. Its transience flag is decided
//!   once by [`ApiError::classify`] and never changes afterwards.
//! - [`ClusterSyncError`] is what every public operation returns. It wraps
//!   [`ApiError`] and adds configuration, decoding and synchronization
//!   failures.

use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    INVALID_PARAMETER_VALUE, NETWORK_ERROR, RESOURCE_MISSING_MARKER, TIMEOUT_ERROR,
};
use crate::types::ClusterState;

/// Body of a failed response, decided once when the response is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    /// The server returned a JSON error document.
    Structured { code: Option<String>, message: String },
    /// Anything else; carries the raw body text.
    Raw(String),
}

impl ErrorPayload {
    /// Wrap a non-JSON body the way the control plane's clients report it.
    pub fn raw(body: impl AsRef<str>) -> Self {
        Self::Raw(format!("request error: {}", body.as_ref()))
    }
}

/// Structured error for a single failed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    status: Option<u16>,
    code: Option<String>,
    message: String,
    transient: bool,
}

impl ApiError {
    /// Classify a response by its status code.
    ///
    /// Status `>= 500` is transient no matter what code the body carries;
    /// everything else (4xx included) is permanent.
    pub fn classify(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self { status: Some(status), code, message: message.into(), transient: status >= 500 }
    }

    /// Classify a parsed error body.
    pub fn from_payload(status: u16, payload: ErrorPayload) -> Self {
        match payload {
            ErrorPayload::Structured { code, message } => Self::classify(status, code, message),
            ErrorPayload::Raw(text) => Self::classify(status, None, text),
        }
    }

    /// Low-level network failure (connection refused, reset, body read).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: Some(NETWORK_ERROR.to_string()),
            message: message.into(),
            transient: true,
        }
    }

    /// Per-attempt timeout elapsed before a response arrived.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: Some(TIMEOUT_ERROR.to_string()),
            message: message.into(),
            transient: true,
        }
    }

    /// A failure that retrying the identical request cannot fix.
    pub fn permanent(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status: None, code: Some(code.into()), message: message.into(), transient: false }
    }

    /// HTTP status, absent for network-level failures.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Machine-readable error code reported by the server.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the failure is eligible for automatic retry.
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// The control plane's way of saying the cluster is gone.
    pub fn is_resource_missing(&self) -> bool {
        self.code() == Some(INVALID_PARAMETER_VALUE)
            && self.message.contains(RESOURCE_MISSING_MARKER)
    }
}

/// Main error type for clustersync
#[derive(Error, Debug)]
pub enum ClusterSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("unexpected state ({state}) for cluster {cluster_id} while waiting for {target}")]
    UnexpectedState { cluster_id: String, state: ClusterState, target: ClusterState },

    /// The remote operation may still be in flight; the outcome is unknown.
    #[error(
        "timeout when waiting for cluster {cluster_id} to have state {target} (waited {elapsed:?})"
    )]
    Timeout { cluster_id: String, target: ClusterState, elapsed: Duration },
}

impl ClusterSyncError {
    /// Only transport-level API errors are ever transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_transient())
    }

    pub fn is_resource_missing(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_resource_missing())
    }

    /// The API error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for clustersync operations
pub type Result<T> = std::result::Result<T, ClusterSyncError>;
