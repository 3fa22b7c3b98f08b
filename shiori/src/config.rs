use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shiori_client_shared::config::{self as shared_config, ConfigError};

use crate::ui;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub search: shared_config::Search,
    pub style: ui::Style,
}
impl Config {
    pub const FILENAME: &str = "config.toml";

    pub fn load() -> Result<Self, ConfigError> {
        shared_config::load_config(Self::FILENAME)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        shared_config::save_config(Self::FILENAME, self)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub repaint_secs: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub library_columns: u32,
    /// Overrides the platform cache directory for cover thumbnails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails_dir: Option<PathBuf>,
}
impl Default for General {
    fn default() -> Self {
        Self {
            repaint_secs: 1.0,
            window_width: 1024,
            window_height: 768,
            library_columns: 4,
            thumbnails_dir: None,
        }
    }
}
