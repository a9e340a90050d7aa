//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Probe the current working directory for a config file
//! 2. Fall back to [`Config::default`] when none exists
//! 3. Supports JSON and TOML formats
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./clustersync.toml`, `./clustersync.json`
//! 2. `./config.toml`, `./config.json`
//!
//! ## Environment Variables
//! Connection credentials left out of the file are read from:
//! - `DATABRICKS_DOMAIN`: workspace host, with or without scheme
//! - `DATABRICKS_TOKEN`: personal access token
//!
//! An explicit value always wins; an empty variable counts as unset.

use std::path::{Path, PathBuf};

use clustersync_domain::constants::{ENV_DOMAIN, ENV_TOKEN};
use clustersync_domain::{ClusterSyncError, Config, ConnectionSettings, EndpointConfig, Result};

/// Load configuration from the first probed file, or defaults
///
/// # Errors
/// Returns `ClusterSyncError::Config` if a probed file exists but cannot be
/// read or parsed.
pub fn load() -> Result<Config> {
    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `ClusterSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClusterSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClusterSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClusterSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClusterSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClusterSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ClusterSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the current working directory for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    ["clustersync.toml", "clustersync.json", "config.toml", "config.json"]
        .into_iter()
        .map(|name| cwd.join(name))
        .find(|path| path.exists())
}

/// Resolve connection settings against the process environment
///
/// # Errors
/// See [`resolve_endpoint_with`].
pub fn resolve_endpoint(settings: &ConnectionSettings) -> Result<EndpointConfig> {
    resolve_endpoint_with(settings, |key| std::env::var(key).ok())
}

/// Resolve connection settings, reading fallbacks through `lookup`
///
/// # Errors
/// Returns `ClusterSyncError::Config` if the domain or the token is neither
/// set explicitly nor available through `lookup`.
pub fn resolve_endpoint_with<F>(settings: &ConnectionSettings, lookup: F) -> Result<EndpointConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let domain = pick(settings.domain.as_deref(), ENV_DOMAIN, &lookup).ok_or_else(|| {
        ClusterSyncError::Config(format!(
            "missing credentials: set connection.domain or {ENV_DOMAIN}"
        ))
    })?;
    let token = pick(settings.token.as_deref(), ENV_TOKEN, &lookup).ok_or_else(|| {
        ClusterSyncError::Config(format!(
            "missing credentials: set connection.token or {ENV_TOKEN}"
        ))
    })?;

    let endpoint = EndpointConfig::new(&domain, &token)?.with_settings(settings);
    tracing::debug!(base_url = %endpoint.base_url(), "Resolved API endpoint");
    Ok(endpoint)
}

fn pick<F>(explicit: Option<&str>, key: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| lookup(key).filter(|value| !value.trim().is_empty()))
}
