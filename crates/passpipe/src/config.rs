//! Configuration for passpipe
//!
//! Optional JSON file. `$PASSPIPE_CONFIG` points at it explicitly, otherwise
//! `<config dir>/passpipe/config.json` is used. A missing file means defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PasspipeError, Result};
use crate::secret::DEFAULT_PROMPT;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PASSPIPE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Text shown when asking for the password
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

impl Config {
    /// Default config location (~/.config/passpipe/config.json)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("passpipe")
            .join("config.json")
    }

    /// Config path honoring `$PASSPIPE_CONFIG`
    pub fn path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => Self::default_path(),
        }
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| PasspipeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| PasspipeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
