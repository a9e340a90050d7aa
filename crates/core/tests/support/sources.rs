//! In-memory implementations of `ClusterStateSource`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use clustersync_core::ClusterStateSource;
use clustersync_domain::{ApiError, ClusterState, Result as DomainResult};

/// One scripted answer to a state query.
#[derive(Debug, Clone)]
pub enum Observation {
    State(ClusterState),
    Failure(ApiError),
}

/// Replays observations in order; once exhausted, repeats the last one.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Observation>>,
    last: Mutex<Option<Observation>>,
    queries: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(observations: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            script: Mutex::new(observations.into_iter().collect()),
            last: Mutex::new(None),
            queries: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor for scripts without failures.
    pub fn states(states: impl IntoIterator<Item = ClusterState>) -> Self {
        Self::new(states.into_iter().map(Observation::State))
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterStateSource for ScriptedSource {
    async fn cluster_state(&self, _cluster_id: &str) -> DomainResult<ClusterState> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        let observation = match next {
            Some(observation) => {
                *last = Some(observation.clone());
                observation
            }
            None => last.clone().unwrap_or(Observation::State(ClusterState::Unknown)),
        };

        match observation {
            Observation::State(state) => Ok(state),
            Observation::Failure(err) => Err(err.into()),
        }
    }
}
