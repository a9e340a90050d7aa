//! # clustersync Domain
//!
//! Types shared by every clustersync crate.
//!
//! This crate contains:
//! - Cluster states and the request/response models of the clusters API
//! - The error taxonomy and the status-code classifier
//! - Configuration structures
//! - Constants (defaults, environment variable names, API paths)
//!
//! ## Architecture
//! - No dependencies on other clustersync crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
