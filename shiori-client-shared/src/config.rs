//! Configuration types and helpers shared by shiori clients.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shiori_core::{
    sf::FilesystemSource,
    shiori_state::{ExtensionId, FS_METADATA},
};

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Write(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Write(e) => write!(f, "failed to write config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Serialize(e) => write!(f, "failed to serialize config: {e}"),
        }
    }
}
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(e) | ConfigError::Write(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

/// Load a TOML config file, returning `T::default()` if the file doesn't exist.
pub fn load_config<T: Default + serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, ConfigError> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(contents) => toml::from_str(&contents).map_err(ConfigError::Parse),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no config file found, creating default config");
            Ok(T::default())
        }
        Err(e) => Err(ConfigError::Read(e)),
    }
}

pub fn save_config<T: Serialize>(path: impl AsRef<Path>, config: &T) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let contents = toml::to_string(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, contents).map_err(ConfigError::Write)?;
    tracing::info!("saved config to {}", path.display());
    Ok(())
}

/// Which source to search, and how the built-in filesystem source reads its library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Search {
    /// The source searched on startup.
    pub extension: ExtensionId,
    /// The directory whose subdirectories are the filesystem source's series.
    pub filesystem_root: PathBuf,
    /// How many series to fetch per page.
    pub page_size: usize,
}
impl Default for Search {
    fn default() -> Self {
        Self {
            extension: FS_METADATA,
            filesystem_root: PathBuf::from("library"),
            page_size: FilesystemSource::DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestConfig {
        search: Search,
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: TestConfig = load_config(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, TestConfig::default());
        assert_eq!(config.search.extension, FS_METADATA);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TestConfig {
            search: Search {
                extension: ExtensionId::from("elsewhere"),
                filesystem_root: PathBuf::from("/srv/manga"),
                page_size: 48,
            },
        };

        save_config(&path, &config).unwrap();
        let loaded: TestConfig = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: TestConfig = toml::from_str("[search]\npage_size = 12\n").unwrap();
        assert_eq!(config.search.page_size, 12);
        assert_eq!(config.search.extension, FS_METADATA);
        assert_eq!(config.search.filesystem_root, PathBuf::from("library"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\n").unwrap();
        assert!(matches!(
            load_config::<TestConfig>(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
