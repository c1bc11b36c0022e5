//! Application configuration loaded from ~/.cuelab/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::midi::MidiOutputConfig;
use crate::storage::default_script_path;

/// Top-level configuration. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueConfig {
    /// Script file to open when none is given on the command line.
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,
    /// Save the script after every edit.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Minimum log level: error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub midi: MidiOutputConfig,
}

fn default_autosave() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Get the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cuelab").join("config.yaml"))
}

impl CueConfig {
    /// Load config from the standard path.
    /// Returns None if the file doesn't exist or doesn't parse.
    pub fn load() -> Option<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_yaml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                None
            }
        }
    }

    /// The configured log level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            autosave: default_autosave(),
            log_level: default_log_level(),
            midi: MidiOutputConfig::default(),
        }
    }
}
