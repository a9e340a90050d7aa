//! Configuration loading and endpoint resolution
//!
//! This module provides utilities for loading clustersync configuration
//! from files and resolving connection credentials from the environment.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_from_file, probe_config_paths, resolve_endpoint, resolve_endpoint_with,
};
