//! Shared fixtures for infra integration tests

pub mod server;
