//! Runtime configuration loaded from TOML. Every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::LogConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Sight radius for field-of-view recomputation.
    pub fov_radius: i32,
    pub save_path: PathBuf,
    pub layout: PanelLayout,
    pub log: LogConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 80,
            screen_height: 50,
            fov_radius: 8,
            save_path: PathBuf::from("savegame.sav"),
            layout: PanelLayout::default(),
            log: LogConfig::default(),
        }
    }
}

/// Console positions of the HUD panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLayout {
    pub log_x: i32,
    pub log_y: i32,
    pub log_width: i32,
    pub log_height: i32,
    pub bar_x: i32,
    pub bar_y: i32,
    pub bar_width: i32,
    pub floor_x: i32,
    pub floor_y: i32,
    pub names_x: i32,
    pub names_y: i32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            log_x: 21,
            log_y: 45,
            log_width: 40,
            log_height: 5,
            bar_x: 0,
            bar_y: 45,
            bar_width: 20,
            floor_x: 0,
            floor_y: 47,
            names_x: 21,
            names_y: 44,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.fov_radius, 8);
    }

    #[test]
    fn test_partial_config() {
        let config = GameConfig::from_toml_str(
            r#"
            fov_radius = 5
            save_path = "run.sav"

            [layout]
            bar_width = 30

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.fov_radius, 5);
        assert_eq!(config.save_path, PathBuf::from("run.sav"));
        assert_eq!(config.layout.bar_width, 30);
        assert_eq!(config.layout.log_x, 21);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_config() {
        let err = GameConfig::from_toml_str("fov_radius = \"far\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load("/nonexistent/delve.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
