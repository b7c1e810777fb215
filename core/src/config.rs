//! Configuration management (`config.toml`)
//!
//! Holds the viewer's panel settings and the host struct layout. Settings
//! are stored in TOML format in the platform-specific config directory;
//! every field has a default so a partial file is enough.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Entity viewer panel settings
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Host struct offsets
    #[serde(default)]
    pub layout: Layout,
}

/// Entity viewer panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Show the window on startup (default: true)
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Open the character and item headers on first show (default: false)
    #[serde(default)]
    pub default_open: bool,
    /// Key that shows/hides the window (default: F2)
    #[serde(default = "default_toggle_key")]
    pub toggle_key: String,
}

/// Failure to load an explicitly requested config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn default_true() -> bool {
    true
}

fn default_toggle_key() -> String {
    "F2".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            visible: default_true(),
            default_open: false,
            toggle_key: default_toggle_key(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Kanan\config`
/// On macOS: `~/Library/Application Support/dev.kanan.Kanan`
/// On Linux: `~/.config/kanan`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "kanan", "Kanan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml` inside [`config_dir`].
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to `path`, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

/// Saves the configuration to the platform config directory.
///
/// Does nothing when the platform has no config directory.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.viewer.visible);
        assert!(!config.viewer.default_open);
        assert_eq!(config.viewer.toggle_key, "F2");
        assert_eq!(config.layout, Layout::default());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_viewer() {
        let toml_str = r#"
[viewer]
default_open = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.viewer.default_open);
        assert!(config.viewer.visible); // default
        assert_eq!(config.viewer.toggle_key, "F2"); // default
    }

    #[test]
    fn test_config_deserialize_layout_offsets() {
        let toml_str = r#"
[layout.entity_list]
characters = 0x28

[layout.item]
price = 0x9C
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.layout.entity_list.characters, 0x28);
        assert_eq!(config.layout.entity_list.items, Layout::default().entity_list.items);
        assert_eq!(config.layout.item.price, 0x9C);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.viewer.toggle_key = "F9".to_string();
        config.layout.character.equipment = 0x1A0;

        save_to(&config, &path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_path_inside_config_dir() {
        match (config_dir(), config_path()) {
            (Some(dir), Some(path)) => {
                assert_eq!(path.parent(), Some(dir.as_path()));
                assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
            }
            (None, None) => {}
            other => panic!("config_dir and config_path disagree: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[viewer]\nvisible = \"yes\"\n").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
