//! Cluster lifecycle states and the operations that move between them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_wire_state_conversions;

/// State reported by `clusters/get`.
///
/// Only meaningful inside one polling session; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    Pending,
    Running,
    Restarting,
    Resizing,
    Terminating,
    Terminated,
    Error,
    /// Reported by the server as `UNKNOWN`, or a value this crate does not
    /// recognise.
    #[serde(other)]
    Unknown,
}

impl_wire_state_conversions!(ClusterState {
    Pending => "PENDING",
    Running => "RUNNING",
    Restarting => "RESTARTING",
    Resizing => "RESIZING",
    Terminating => "TERMINATING",
    Terminated => "TERMINATED",
    Error => "ERROR",
    Unknown => "UNKNOWN",
});

/// State-changing operations that have a synchronized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOperation {
    Create,
    Edit,
    Start,
    Restart,
    Delete,
}

impl fmt::Display for ClusterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Start => "start",
            Self::Restart => "restart",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}
