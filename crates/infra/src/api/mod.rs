//! Control-plane API client
//!
//! [`ApiClient`] owns one [`TransportClient`](crate::http::TransportClient)
//! and hands out per-resource façades that share it.

pub mod client;
pub mod clusters;

pub use client::{ApiClient, ApiClientBuilder};
pub use clusters::ClustersApi;
