//! Transition descriptors
//!
//! A [`Transition`] says what a synchronized operation waits for: one
//! target state, the states the cluster may pass through on the way, and
//! the states in which the operation is already considered done before it
//! is invoked.

use std::collections::BTreeSet;

use clustersync_domain::{ClusterOperation, ClusterState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    target: ClusterState,
    in_progress: BTreeSet<ClusterState>,
    settled: BTreeSet<ClusterState>,
}

impl Transition {
    pub fn new(target: ClusterState, in_progress: impl IntoIterator<Item = ClusterState>) -> Self {
        Self { target, in_progress: in_progress.into_iter().collect(), settled: BTreeSet::new() }
    }

    /// States in which a pre-check skips the operation entirely.
    pub fn with_settled(mut self, settled: impl IntoIterator<Item = ClusterState>) -> Self {
        self.settled = settled.into_iter().collect();
        self
    }

    /// Preset used by the clusters façade for each operation kind.
    pub fn for_operation(operation: ClusterOperation) -> Self {
        use ClusterState::{Pending, Resizing, Restarting, Running, Terminated, Terminating};

        match operation {
            ClusterOperation::Create | ClusterOperation::Start => Self::new(Running, [Pending]),
            ClusterOperation::Edit => Self::new(Running, [Restarting]).with_settled([Terminated]),
            ClusterOperation::Restart => Self::new(Running, [Restarting]),
            ClusterOperation::Delete => {
                Self::new(Terminated, [Pending, Restarting, Resizing, Terminating])
            }
        }
    }

    pub fn target(&self) -> ClusterState {
        self.target
    }

    pub fn in_progress(&self) -> &BTreeSet<ClusterState> {
        &self.in_progress
    }

    pub fn settled(&self) -> &BTreeSet<ClusterState> {
        &self.settled
    }

    /// Whether `state` is a legitimate intermediate state for this transition.
    pub fn allows(&self, state: ClusterState) -> bool {
        self.in_progress.contains(&state)
    }

    pub fn is_settled(&self, state: ClusterState) -> bool {
        self.settled.contains(&state)
    }
}
