//! # clustersync Core
//!
//! The Remote Operation Synchronizer, free of any HTTP code.
//!
//! This crate contains:
//! - The port the synchronizer reads cluster state through
//!   ([`ClusterStateSource`])
//! - Transition descriptors for each synchronized operation
//! - The invoke-then-poll session itself ([`Synchronizer`])
//!
//! ## Architecture Principles
//! - Only depends on `clustersync-domain`
//! - All remote access goes through the port trait
//! - Time comes from `tokio::time`, so tests can pause and advance it

pub mod sync;

pub use sync::ports::ClusterStateSource;
pub use sync::synchronizer::{SessionPhase, SyncOutcome, SyncPolicy, SyncReport, Synchronizer};
pub use sync::transition::Transition;
