//! # clustersync Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The HTTP transport with bounded retry (reqwest)
//! - Configuration loading and credential resolution
//! - The clusters API façade and the [`ApiClient`] entry point
//!
//! ## Architecture
//! - Implements traits defined in `clustersync-core`
//! - Contains all "impure" code (network, files, environment)

pub mod api;
pub mod config;
pub(crate) mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ClustersApi};
pub use http::TransportClient;
