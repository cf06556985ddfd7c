//! TUI configuration persistence
//!
//! Cosmetic settings that persist across sessions, kept separate from the
//! lock policy the gate enforces.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "tui.json";

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Use the high-contrast theme
    #[serde(default)]
    pub high_contrast: bool,

    /// Render tick interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            high_contrast: false,
            tick_ms: default_tick_ms(),
        }
    }
}

impl TuiConfig {
    /// Load from `dir`.
    ///
    /// Returns default configuration if the file doesn't exist or can't be
    /// parsed.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save to `dir`
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(dir.join(CONFIG_FILE_NAME), contents)
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved TUI config to {}", dir.display());
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
