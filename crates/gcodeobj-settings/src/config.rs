//! Configuration management for gcodeobj
//!
//! Supports JSON and TOML files, picked by extension, stored in the
//! platform config directory by default.
//!
//! Configuration is organized into logical sections:
//! - Marker convention (token, derived extension)
//! - Host layout (base folder, uploads subdirectory)
//! - HTTP server (bind address)
//! - Extraction (inline response or derived file)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use gcodeobj_core::{ExtractMode, MarkerConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Application directory name under the platform config directory
const APP_DIR: &str = "gcodeobj";

/// Default configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Host layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Host base folder (OctoPrint's `~/.octoprint`)
    pub base_folder: PathBuf,
    /// Directory under the base folder holding uploaded gcode
    pub uploads_dir: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            base_folder: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".octoprint"),
            uploads_dir: "uploads".to_string(),
        }
    }
}

impl HostSettings {
    /// Folder job paths are resolved against
    pub fn uploads_folder(&self) -> PathBuf {
        self.base_folder.join(&self.uploads_dir)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5080".to_string(),
        }
    }
}

impl ServerSettings {
    /// Parsed bind address
    pub fn bind_addr(&self) -> SettingsResult<SocketAddr> {
        self.bind.parse().map_err(|e| SettingsError::InvalidSetting {
            key: "server.bind".to_string(),
            reason: format!("'{}' is not a socket address: {}", self.bind, e),
        })
    }
}

/// Extraction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Inline response or derived file
    pub mode: ExtractMode,
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marker convention
    pub marker: MarkerConfig,
    /// Host layout
    pub host: HostSettings,
    /// HTTP server
    pub server: ServerSettings,
    /// Extraction
    pub extract: ExtractSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/gcodeobj/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load `path`, or the default location when `None`
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from_file(&path)
                } else {
                    debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, content).map_err(|e| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.marker
            .validate()
            .map_err(|e| SettingsError::InvalidSetting {
                key: "marker".to_string(),
                reason: e.to_string(),
            })?;

        let uploads = Path::new(&self.host.uploads_dir);
        if self.host.uploads_dir.is_empty()
            || uploads
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(SettingsError::InvalidSetting {
                key: "host.uploads_dir".to_string(),
                reason: format!(
                    "'{}' must be a relative path below the base folder",
                    self.host.uploads_dir
                ),
            });
        }

        self.server.bind_addr()?;

        Ok(())
    }
}
