//! Integration tests for the Remote Operation Synchronizer
//!
//! Sessions run against scripted state sources with tokio's clock paused,
//! so poll counts and deadlines are exact.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clustersync_core::{SyncOutcome, SyncPolicy, Synchronizer, Transition};
use clustersync_domain::{ApiError, ClusterOperation, ClusterState, ClusterSyncError};
use support::sources::{Observation, ScriptedSource};

fn policy() -> SyncPolicy {
    SyncPolicy::new(Duration::from_secs(10), Duration::from_secs(30 * 60))
}

#[tokio::test(start_paused = true)]
async fn poll_count_matches_sequence_length() {
    for in_progress_polls in 0..8 {
        let mut states = vec![ClusterState::Pending; in_progress_polls];
        states.push(ClusterState::Running);
        let expected = states.len();

        let source = ScriptedSource::states(states);
        let sync = Synchronizer::new(&source, policy());
        let report = sync
            .run(
                || async { Ok("c-seq".to_string()) },
                &Transition::for_operation(ClusterOperation::Create),
            )
            .await
            .expect("session should reach RUNNING");

        assert_eq!(report.outcome, SyncOutcome::Reached);
        assert_eq!(report.polls as usize, expected);
        assert_eq!(source.queries(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn illegal_state_fails_regardless_of_good_prefix() {
    for good_prefix in [0usize, 1, 5] {
        let mut states = vec![ClusterState::Terminating; good_prefix];
        states.push(ClusterState::Running);
        states.push(ClusterState::Terminated);

        let source = ScriptedSource::states(states);
        let sync = Synchronizer::new(&source, policy());
        let err = sync
            .run(
                || async { Ok("c-del".to_string()) },
                &Transition::for_operation(ClusterOperation::Delete),
            )
            .await
            .expect_err("RUNNING is not a valid state while deleting");

        assert!(matches!(
            err,
            ClusterSyncError::UnexpectedState { state: ClusterState::Running, .. }
        ));
        assert_eq!(source.queries(), good_prefix + 1, "polling must stop at the illegal state");
    }
}

#[tokio::test(start_paused = true)]
async fn never_reaching_target_is_a_timeout_not_success() {
    let source = ScriptedSource::states([ClusterState::Restarting]);
    let short_policy = SyncPolicy::new(Duration::from_secs(10), Duration::from_secs(95));
    let sync = Synchronizer::new(&source, short_policy);

    let result = sync
        .run(
            || async { Ok("c-stuck".to_string()) },
            &Transition::for_operation(ClusterOperation::Restart),
        )
        .await;

    match result {
        Err(ClusterSyncError::Timeout { cluster_id, target, .. }) => {
            assert_eq!(cluster_id, "c-stuck");
            assert_eq!(target, ClusterState::Running);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    // t = 0, 10, ..., 90
    assert_eq!(source.queries(), 10);
}

#[tokio::test(start_paused = true)]
async fn slow_invocation_counts_against_the_deadline() {
    let source = ScriptedSource::states([ClusterState::Running]);
    let short_policy = SyncPolicy::new(Duration::from_secs(10), Duration::from_secs(30));
    let sync = Synchronizer::new(&source, short_policy);

    let err = sync
        .run(
            || async {
                tokio::time::sleep(Duration::from_secs(45)).await;
                Ok("c-slow".to_string())
            },
            &Transition::for_operation(ClusterOperation::Start),
        )
        .await
        .expect_err("deadline passed during invocation");

    assert!(matches!(err, ClusterSyncError::Timeout { .. }));
    assert_eq!(source.queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn query_failure_is_propagated_unchanged() {
    let missing = ApiError::classify(
        400,
        Some("INVALID_PARAMETER_VALUE".into()),
        "Cluster c-gone does not exist",
    );
    let source = ScriptedSource::new([
        Observation::State(ClusterState::Terminating),
        Observation::Failure(missing.clone()),
    ]);
    let sync = Synchronizer::new(&source, policy());

    let err = sync
        .run(
            || async { Ok("c-gone".to_string()) },
            &Transition::for_operation(ClusterOperation::Delete),
        )
        .await
        .expect_err("query failure ends the session");

    assert_eq!(err.api_error(), Some(&missing));
    assert!(err.is_resource_missing());
    assert_eq!(source.queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn invocation_runs_exactly_once() {
    let source = ScriptedSource::states([
        ClusterState::Pending,
        ClusterState::Pending,
        ClusterState::Pending,
        ClusterState::Running,
    ]);
    let sync = Synchronizer::new(&source, policy());
    let invocations = AtomicUsize::new(0);

    sync.run(
        || async {
            invocations.fetch_add(1, Ordering::SeqCst);
            Ok("c-once".to_string())
        },
        &Transition::for_operation(ClusterOperation::Start),
    )
    .await
    .expect("session should succeed");

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn independent_sessions_run_concurrently() {
    let mut handles = Vec::new();

    for (index, pending_polls) in [1usize, 4, 2, 6].into_iter().enumerate() {
        handles.push(tokio::spawn(async move {
            let mut states = vec![ClusterState::Pending; pending_polls];
            states.push(ClusterState::Running);
            let source = Arc::new(ScriptedSource::states(states));

            let sync = Synchronizer::new(source.as_ref(), policy());
            let cluster_id = format!("c-{index}");
            let report = sync
                .run(
                    || async move { Ok(cluster_id) },
                    &Transition::for_operation(ClusterOperation::Create),
                )
                .await
                .expect("each session should succeed");

            (report, pending_polls + 1, source.queries())
        }));
    }

    for (index, handle) in handles.into_iter().enumerate() {
        let (report, expected_polls, queries) = handle.await.expect("task should not panic");
        assert_eq!(report.cluster_id, format!("c-{index}"));
        assert_eq!(report.polls as usize, expected_polls);
        assert_eq!(queries, expected_polls);
    }
}
