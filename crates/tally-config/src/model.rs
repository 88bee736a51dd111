use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_RECENT_COUNT: usize = 5;
pub const MAX_RECENT_COUNT: usize = 50;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the tracker's JSON documents. Defaults to `<home>/data`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_recent_count")]
    pub recent_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            recent_count: Self::default_recent_count(),
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_recent_count() -> usize {
        DEFAULT_RECENT_COUNT
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => home.join("data"),
        }
    }

    pub fn set_recent_count(&mut self, count: usize) -> Result<(), ConfigError> {
        if count == 0 || count > MAX_RECENT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "recent count must be between 1 and {MAX_RECENT_COUNT}"
            )));
        }
        self.recent_count = count;
        Ok(())
    }
}
