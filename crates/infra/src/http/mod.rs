//! HTTP transport for the control-plane REST API

pub mod client;
pub mod response;

pub use client::TransportClient;
pub use response::parse_error_payload;
