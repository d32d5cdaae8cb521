// Configuration loading and parsing (config/tracker.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Assembled service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// WebSocket listen port.
    pub ws_port: u16,
    /// SQLite database path. `":memory:"` gives an ephemeral store.
    pub db_path: String,
    /// Bound on the list-leagues page.
    pub page_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            ws_port: 9587,
            db_path: "auction.db".to_string(),
            page_size: 100,
        }
    }
}

/// Wrapper for the top-level `[service]` table in tracker.toml.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    service: ServiceSection,
}

#[derive(Debug, Deserialize)]
struct ServiceSection {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_db_path")]
    db_path: String,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_port() -> u16 {
    ServiceConfig::default().ws_port
}

fn default_db_path() -> String {
    ServiceConfig::default().db_path
}

fn default_page_size() -> usize {
    ServiceConfig::default().page_size
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `config/tracker.toml` relative to `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<ServiceConfig, ConfigError> {
    let path = base_dir.join("config").join("tracker.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    parse_config(&text, &path)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, falling back to built-in defaults when no config file
/// exists. A present-but-broken file is still an error.
pub fn load_or_default() -> Result<ServiceConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    match load_config_from(&cwd) {
        Err(ConfigError::FileNotFound { .. }) => Ok(ServiceConfig::default()),
        other => other,
    }
}

fn parse_config(text: &str, path: &Path) -> Result<ServiceConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = ServiceConfig {
        ws_port: file.service.port,
        db_path: file.service.db_path,
        page_size: file.service.page_size,
    };

    validate(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.ws_port == 0 {
        return Err(ConfigError::ValidationError {
            field: "service.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.db_path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "service.db_path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "service.page_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
