//! Remote Operation Synchronizer
//!
//! Turns an asynchronous remote operation into one awaited call. A session
//! invokes the state-changing call exactly once, then queries the cluster
//! state on a fixed interval until one of three things happens:
//!
//! - the cluster reaches the transition's target state (success);
//! - the cluster reports a state outside the transition's in-progress set
//!   ([`ClusterSyncError::UnexpectedState`]);
//! - the deadline passes ([`ClusterSyncError::Timeout`]).
//!
//! Query errors are never retried here; the transport already retries
//! transient failures of each individual request.
//!
//! The deadline is measured from the start of the session, invocation
//! included, and is the only way a session is cut short.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use clustersync_domain::constants::{
    DEFAULT_POLL_INTERVAL, DEFAULT_SYNC_TIMEOUT, MIN_POLL_INTERVAL,
};
use clustersync_domain::{ClusterState, ClusterSyncError, Result, SyncSettings};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

use super::ports::ClusterStateSource;
use super::transition::Transition;

/// Polling cadence and overall ceiling for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl SyncPolicy {
    /// `poll_interval` is raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self { poll_interval: poll_interval.max(MIN_POLL_INTERVAL), timeout }
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, timeout: DEFAULT_SYNC_TIMEOUT }
    }
}

impl From<&SyncSettings> for SyncPolicy {
    fn from(settings: &SyncSettings) -> Self {
        Self::new(
            Duration::from_secs(settings.poll_interval_seconds),
            Duration::from_secs(settings.timeout_seconds),
        )
    }
}

/// Logical phase of a session, reported in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Invoking,
    Polling,
    Satisfied,
    Failed,
    TimedOut,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Satisfied | Self::Failed | Self::TimedOut)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invoking => "invoking",
            Self::Polling => "polling",
            Self::Satisfied => "satisfied",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(name)
    }
}

/// How a successful session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Polling observed the target state.
    Reached,
    /// The pre-check found the cluster in a settled state; nothing was invoked.
    Skipped,
    /// The cluster no longer exists; set by callers that treat that as done.
    Absent,
}

/// Summary of a successful session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub cluster_id: String,
    pub outcome: SyncOutcome,
    /// Last state observed, if any query succeeded.
    pub final_state: Option<ClusterState>,
    /// Status queries issued while polling; the pre-check is not counted.
    pub polls: u32,
    pub elapsed: Duration,
}

impl SyncReport {
    /// Report for a cluster found to be already gone.
    pub fn absent(cluster_id: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            outcome: SyncOutcome::Absent,
            final_state: None,
            polls: 0,
            elapsed,
        }
    }
}

/// Runs synchronization sessions against one state source.
///
/// Holds no per-session state, so one value can run many sessions; each
/// call to [`run`](Self::run) is independent.
pub struct Synchronizer<'a> {
    source: &'a dyn ClusterStateSource,
    policy: SyncPolicy,
}

impl<'a> Synchronizer<'a> {
    pub fn new(source: &'a dyn ClusterStateSource, policy: SyncPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Invoke the operation once and wait for `transition`'s target state.
    ///
    /// `invocation` returns the identifier of the cluster to poll. Its
    /// error is returned unchanged and nothing is polled.
    ///
    /// # Errors
    /// - whatever `invocation` or a state query returns
    /// - `UnexpectedState` if the cluster leaves the in-progress set
    /// - `Timeout` if the deadline passes first; the remote operation may
    ///   still complete later
    #[instrument(skip_all, fields(target = %transition.target()))]
    pub async fn run<F, Fut>(&self, invocation: F, transition: &Transition) -> Result<SyncReport>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        let started = Instant::now();
        let cluster_id = self.invoke(invocation).await?;
        self.poll(cluster_id, transition, started).await
    }

    /// Like [`run`](Self::run), but first checks the current state of
    /// `cluster_id` and skips invocation and polling when it is one of the
    /// transition's settled states.
    #[instrument(skip_all, fields(cluster_id = %cluster_id, target = %transition.target()))]
    pub async fn run_unless_settled<F, Fut>(
        &self,
        cluster_id: &str,
        invocation: F,
        transition: &Transition,
    ) -> Result<SyncReport>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        let started = Instant::now();

        let current = self.source.cluster_state(cluster_id).await.map_err(|err| {
            warn!(phase = %SessionPhase::Failed, error = %err, "pre-check query failed");
            err
        })?;

        if transition.is_settled(current) {
            info!(state = %current, "cluster already settled, skipping operation");
            return Ok(SyncReport {
                cluster_id: cluster_id.to_string(),
                outcome: SyncOutcome::Skipped,
                final_state: Some(current),
                polls: 0,
                elapsed: started.elapsed(),
            });
        }

        let cluster_id = self.invoke(invocation).await?;
        self.poll(cluster_id, transition, started).await
    }

    async fn invoke<F, Fut>(&self, invocation: F) -> Result<String>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        debug!(phase = %SessionPhase::Invoking, "invoking state-changing call");
        invocation().await.map_err(|err| {
            warn!(phase = %SessionPhase::Failed, error = %err, "invocation failed");
            err
        })
    }

    async fn poll(
        &self,
        cluster_id: String,
        transition: &Transition,
        started: Instant,
    ) -> Result<SyncReport> {
        let target = transition.target();
        let deadline = started + self.policy.timeout;
        let mut polls = 0u32;

        while Instant::now() < deadline {
            let state = self.source.cluster_state(&cluster_id).await.map_err(|err| {
                warn!(
                    phase = %SessionPhase::Failed,
                    cluster_id = %cluster_id,
                    error = %err,
                    "state query failed"
                );
                err
            })?;
            polls += 1;

            if state == target {
                let elapsed = started.elapsed();
                info!(
                    phase = %SessionPhase::Satisfied,
                    cluster_id = %cluster_id,
                    state = %state,
                    polls,
                    elapsed = ?elapsed,
                    "cluster reached target state"
                );
                return Ok(SyncReport {
                    cluster_id,
                    outcome: SyncOutcome::Reached,
                    final_state: Some(state),
                    polls,
                    elapsed,
                });
            }

            if !transition.allows(state) {
                warn!(
                    phase = %SessionPhase::Failed,
                    cluster_id = %cluster_id,
                    state = %state,
                    "cluster entered a state outside the transition"
                );
                return Err(ClusterSyncError::UnexpectedState { cluster_id, state, target });
            }

            debug!(
                phase = %SessionPhase::Polling,
                cluster_id = %cluster_id,
                state = %state,
                polls,
                "cluster still in progress"
            );

            let remaining = deadline.saturating_duration_since(Instant::now());
            let interval = self.policy.poll_interval.max(MIN_POLL_INTERVAL);
            sleep(interval.min(remaining)).await;
        }

        let elapsed = started.elapsed();
        warn!(
            phase = %SessionPhase::TimedOut,
            cluster_id = %cluster_id,
            polls,
            elapsed = ?elapsed,
            "gave up waiting for target state"
        );
        Err(ClusterSyncError::Timeout { cluster_id, target, elapsed })
    }
}
