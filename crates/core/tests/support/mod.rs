//! Shared test helpers for `clustersync-core` integration tests.
//!
//! Scripted state sources so synchronizer tests can describe a remote
//! cluster as a list of observations.

pub mod sources;
