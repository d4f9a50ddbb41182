//! XDG Base Directory paths for coda.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths. This matches tools like gh, docker, kubectl.

use std::path::PathBuf;

/// Get the coda config directory.
///
/// Returns `$XDG_CONFIG_HOME/coda` if set, otherwise `~/.config/coda`.
/// This is where `config.toml` lives.
///
/// # Examples
///
/// ```
/// use coda_paths::config_dir;
///
/// let config = config_dir().join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("coda")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/coda")
    } else {
        PathBuf::from(".config/coda")
    }
}

/// Get the coda cache directory.
///
/// Returns `$XDG_CACHE_HOME/coda` if set, otherwise `~/.cache/coda`.
/// Annotated-output run caches are stored here.
pub fn cache_dir() -> PathBuf {
    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg_cache).join("coda")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".cache/coda")
    } else {
        PathBuf::from(".cache/coda")
    }
}

/// Get the coda data directory.
///
/// Returns `$XDG_DATA_HOME/coda` if set, otherwise `~/.local/share/coda`.
/// Pipeline run logs are stored here.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("coda")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/coda")
    } else {
        PathBuf::from(".local/share/coda")
    }
}
