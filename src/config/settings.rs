//! Application settings loaded from config.toml
//!
//! Server address, upload storage and the admin accounts to seed on startup.
//! Every section is optional; a missing file yields the defaults.

use crate::{
    core::storage::DEFAULT_MAX_UPLOAD_BYTES,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Upload storage settings
    pub storage: StorageConfig,
    /// Admin accounts to seed into `admin_roles`
    pub admins: Vec<AdminConfig>,
}

/// `[server]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// `[storage]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploads are written to
    pub root: PathBuf,
    /// Base URL uploads are served from
    pub public_base_url: String,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/uploads"),
            public_base_url: "http://localhost:8080/files".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// One `[[admins]]` entry
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// External user id (gateway user id or Discord id)
    pub user_id: String,
    /// Role name, defaults to `admin`
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    crate::core::auth::ROLE_ADMIN.to_string()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.as_ref().display()),
    })
}

/// Loads configuration from `BOXPRINT_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: defaults are used and a warning is logged.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("BOXPRINT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!("No config file at {path}, using defaults");
        return Ok(Config::default());
    }
    load_config(&path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_addr = "127.0.0.1:3000"

            [storage]
            root = "/var/lib/boxprint"
            public_base_url = "https://cdn.boxpox.in/prints/"
            max_upload_bytes = 1048576

            [[admins]]
            user_id = "gateway-user-1"
            role = "super_admin"

            [[admins]]
            user_id = "123456789012345678"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.storage.root, PathBuf::from("/var/lib/boxprint"));
        assert_eq!(config.storage.max_upload_bytes, 1_048_576);
        assert_eq!(config.admins.len(), 2);
        assert_eq!(config.admins[0].role, "super_admin");
        assert_eq!(config.admins[1].role, "admin");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.storage.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.admins.is_empty());
    }

    #[test]
    fn test_load_config_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbind_addr = 1").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
