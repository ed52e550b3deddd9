//! gcodeobj Settings Crate
//!
//! Handles application configuration and settings persistence.

pub mod config;
pub mod error;

pub use config::{Config, ExtractSettings, HostSettings, ServerSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
