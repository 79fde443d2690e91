//! Configuration file handling
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8000
//! root = "/alsa/interface"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! Every key is optional; command-line flags override the file.

use alsa_osc_core::{Root, DEFAULT_BIND_ADDR, DEFAULT_OSC_PORT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Host or IP to bind
    pub bind: String,
    /// UDP port
    pub port: u16,
    /// OSC address root
    pub root: Root,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_OSC_PORT,
            root: Root::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Filter directive (trace, debug, info, warn, error, or an EnvFilter spec)
    pub level: String,
    /// Output logs as JSON
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/alsa-osc/config.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("alsa-osc").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load an explicitly given file, or the default file when it exists,
    /// or fall back to built-in defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
