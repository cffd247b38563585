//! Configuration management for the mixtape client.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the remote
//! API location, the cache directory and the diagnostics filter.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

/// Base URL used when `MIXTAPE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Filter used for stderr diagnostics when `MIXTAPE_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `mixtape/.env` inside the platform-specific
/// local data directory.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/mixtape/.env`
/// - macOS: `~/Library/Application Support/mixtape/.env`
/// - Windows: `%LOCALAPPDATA%/mixtape/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or if an
/// existing `.env` file cannot be parsed. A missing `.env` file is not an
/// error: every setting has a default.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's local data directory (`<data_local_dir>/mixtape`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mixtape");
    path
}

/// Returns the base URL of the remote API.
///
/// Reads `MIXTAPE_API_URL` and strips a trailing slash so endpoint paths can
/// be appended directly.
///
/// # Example
///
/// ```
/// let url = api_url(); // e.g., "https://music.example.com/api"
/// ```
pub fn api_url() -> String {
    let url = env::var("MIXTAPE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Returns the login page of the remote API, opened in the browser by `auth`.
pub fn login_url() -> String {
    format!("{}/login", api_url())
}

/// Returns the directory holding cached API responses.
///
/// `MIXTAPE_CACHE_DIR` overrides the default `<data dir>/cache`.
pub fn cache_dir() -> PathBuf {
    match env::var("MIXTAPE_CACHE_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => data_dir().join("cache"),
    }
}

/// Returns the path of the persisted access token.
pub fn token_path() -> PathBuf {
    data_dir().join("token.json")
}

/// Returns the `tracing` filter directive for stderr diagnostics.
pub fn log_filter() -> String {
    env::var("MIXTAPE_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}
