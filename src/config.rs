//! # Configuration
//!
//! A single TOML file, by default `<config dir>/padview/config.toml`:
//!
//! ```toml
//! [loop]
//! target_fps = 30
//! stick_scale = 10.0
//! idle_poll_ms = 250
//!
//! [haptics]
//! enabled = true
//! duration_ms = 100
//! strong_magnitude = 1.0
//! weak_magnitude = 1.0
//!
//! [display]
//! asset_dir = "assets/svg"
//! fullscreen = false
//! width = 960.0
//! height = 640.0
//! ```
//!
//! A missing file is created with the defaults above. Missing sections or keys
//! fall back to their defaults, so old files keep loading after new keys are
//! added.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CONFIG_DIR: &str = "padview";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
    #[serde(rename = "loop")]
    pub frame_loop: LoopConfig,
    pub haptics: HapticsConfig,
    pub display: DisplayConfig,
}

/// Frame loop pacing
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoopConfig {
    pub target_fps: u32,
    /// Pixels a stick indicator moves at full deflection
    pub stick_scale: f32,
    /// Poll interval for hot-plug events while no controller is connected
    pub idle_poll_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            stick_scale: 10.0,
            idle_poll_ms: 250,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
    pub duration_ms: u64,
    pub strong_magnitude: f32,
    pub weak_magnitude: f32,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 100,
            strong_magnitude: 1.0,
            weak_magnitude: 1.0,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Directory holding the controller artwork
    pub asset_dir: PathBuf,
    pub fullscreen: bool,
    pub width: f32,
    pub height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets/svg"),
            fullscreen: false,
            width: 960.0,
            height: 640.0,
        }
    }
}

impl VisualizerConfig {
    /// `<config dir>/padview/config.toml`, falling back to the home directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| {
                warn!("Could not determine config directory, using current directory");
                PathBuf::from(".")
            });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_loop.target_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "loop.target_fps",
                reason: "must be greater than 0".to_string(),
            });
        }
        for (field, value) in [
            ("haptics.strong_magnitude", self.haptics.strong_magnitude),
            ("haptics.weak_magnitude", self.haptics.weak_magnitude),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is outside [0, 1]", value),
                });
            }
        }
        Ok(())
    }

    /// Loads `path`, writing the defaults there first if it does not exist
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if !tokio::fs::try_exists(path).await.map_err(io_err)? {
            info!("Creating default configuration at {}", path.display());
            let config = Self::default();
            config.save(path).await?;
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(path).await.map_err(io_err)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config = VisualizerConfig::from_toml(
            r#"
            [loop]
            target_fps = 60

            [haptics]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.frame_loop.target_fps, 60);
        assert_eq!(config.frame_loop.stick_scale, 10.0);
        assert!(!config.haptics.enabled);
        assert_eq!(config.haptics.duration_ms, 100);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(
            VisualizerConfig::from_toml("").unwrap(),
            VisualizerConfig::default()
        );
    }

    #[test]
    fn rejects_zero_fps() {
        let err = VisualizerConfig::from_toml("[loop]\ntarget_fps = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "loop.target_fps",
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_magnitude() {
        let err = VisualizerConfig::from_toml("[haptics]\nweak_magnitude = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "haptics.weak_magnitude",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            VisualizerConfig::from_toml("[loop\ntarget_fps = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = VisualizerConfig::load_or_create(&path).await.unwrap();
        assert_eq!(config, VisualizerConfig::default());
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[loop]"));
        assert_eq!(VisualizerConfig::from_toml(&written).unwrap(), config);
    }

    #[tokio::test]
    async fn existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[display]\nfullscreen = true\n").unwrap();

        let config = VisualizerConfig::load_or_create(&path).await.unwrap();
        assert!(config.display.fullscreen);
        assert_eq!(config.frame_loop, LoopConfig::default());
    }
}
