//! TOML configuration for the input layer
//!
//! ```toml
//! [dispatcher]
//! double_click_interval_ms = 250
//! platform_quirks = true
//!
//! [controller]
//! heartbeat_ms = 5
//! down_threshold = 0.5
//! sustain_deadzone = 0.02
//!
//! [[bindings]]
//! behavior = "move_forward"
//! triggers = ["W"]
//! ```
//!
//! Missing sections fall back to their defaults. An absent `bindings` list yields the
//! default binding table.

use crate::controller::PollerSettings;
use crate::dispatch::DispatcherSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "triggerdispatch";
const CONFIG_FILE: &str = "bindings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Behavior name with the trigger strings bound to it
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BindingConfig {
    pub behavior: String,
    pub triggers: Vec<String>,
}

impl BindingConfig {
    pub fn new(behavior: impl Into<String>, triggers: &[&str]) -> Self {
        Self {
            behavior: behavior.into(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub dispatcher: DispatcherSettings,
    pub controller: PollerSettings,
    pub bindings: Vec<BindingConfig>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherSettings::default(),
            controller: PollerSettings::default(),
            bindings: default_bindings(),
        }
    }
}

/// Camera, movement and toggle bindings of a typical 3D viewer
pub fn default_bindings() -> Vec<BindingConfig> {
    vec![
        BindingConfig::new("mouse_control", &["button1", "M"]),
        BindingConfig::new("gamepad_movement_control", &["button1"]),
        BindingConfig::new("gamepad_camera_control", &["G"]),
        BindingConfig::new("scroll1", &["scroll"]),
        BindingConfig::new("move_forward", &["W"]),
        BindingConfig::new("move_left", &["A"]),
        BindingConfig::new("move_back", &["S"]),
        BindingConfig::new("move_right", &["D"]),
        BindingConfig::new("move_forward_fast", &["shift W"]),
        BindingConfig::new("move_left_fast", &["shift A"]),
        BindingConfig::new("move_back_fast", &["shift S"]),
        BindingConfig::new("move_right_fast", &["shift D"]),
        BindingConfig::new("move_up", &["K"]),
        BindingConfig::new("move_down", &["J"]),
        BindingConfig::new("set_rendering_quality", &["Q"]),
        BindingConfig::new("toggle_debug", &["shift Q"]),
        BindingConfig::new("toggle_fullscreen", &["F"]),
        BindingConfig::new("screenshot", &["P"]),
        BindingConfig::new("record_movie", &["shift P"]),
        BindingConfig::new("toggle_vr", &["shift V"]),
        BindingConfig::new("gamepad_screenshot", &["0"]),
        BindingConfig::new("gamepad_toggle_debug", &["up"]),
    ]
}

impl InputConfig {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("No config directory found, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading input config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path`, or the defaults when the file does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "No input config at {}, using default bindings",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved input config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = InputConfig::from_toml_str(
            r#"
            [controller]
            heartbeat_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.controller.heartbeat_ms, 10);
        assert_eq!(config.controller.down_threshold, 0.5);
        assert!(config.dispatcher.platform_quirks);
        assert_eq!(config.bindings, default_bindings());
    }

    #[test]
    fn explicit_bindings_replace_defaults() {
        let config = InputConfig::from_toml_str(
            r#"
            [dispatcher]
            double_click_interval_ms = 250

            [[bindings]]
            behavior = "jump"
            triggers = ["space", "double-click button1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatcher.double_click_interval_ms, Some(250));
        assert_eq!(
            config.bindings,
            vec![BindingConfig::new("jump", &["space", "double-click button1"])]
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            InputConfig::from_toml_str("[controller\nheartbeat_ms = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = InputConfig::default();
        config.dispatcher.platform_quirks = false;
        config.save(&path).unwrap();

        assert_eq!(InputConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = InputConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, InputConfig::default());
    }
}
