use crate::events::AppEvent;
use crate::geometry::Point;
use crate::input::RoleId;
use crate::ring::{AnimationSettings, AnimationStyle, RingConfig};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

fn default_true() -> bool {
    true
}

fn default_animation_duration() -> f64 {
    0.2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub appear_at_cursor: bool,
    #[serde(default)]
    pub center_offset: Point,
    #[serde(default)]
    pub auto_center_cursor: bool,
    #[serde(default = "default_true")]
    pub draw_ring_background: bool,
    #[serde(default)]
    pub animation: AnimationStyle,
    /// Seconds.
    #[serde(default = "default_animation_duration")]
    pub animation_duration: f64,
    #[serde(default = "default_true")]
    pub animate_icon_sizes: bool,
    #[serde(default)]
    pub keybind_passthrough: bool,
    #[serde(default = "default_true")]
    pub enable_escape_keybind: bool,
    /// Number of roles the host knows about. A binding listing all of them is unrestricted.
    #[serde(default)]
    pub role_count: usize,
    #[serde(default)]
    pub role: Option<RoleId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appear_at_cursor: true,
            center_offset: Point::default(),
            auto_center_cursor: false,
            draw_ring_background: true,
            animation: AnimationStyle::default(),
            animation_duration: default_animation_duration(),
            animate_icon_sizes: true,
            keybind_passthrough: false,
            enable_escape_keybind: true,
            role_count: 0,
            role: None,
        }
    }
}

impl Settings {
    pub fn animation(&self) -> AnimationSettings {
        AnimationSettings::new(self.animation, self.animation_duration)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(flatten)]
    pub general: Settings,
    #[serde(default)]
    pub rings: Vec<RingConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "tpie", "tpie").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("TPIE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Parses a configuration from TOML text, without touching the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!("Built-in configuration is invalid: {}", e);
        Config::default()
    })
}

/// Used both at startup and on reload, so a deleted or broken file falls back the same way.
pub fn load_or_default() -> Config {
    match get_config_path() {
        Ok(path) => load_or_default_from(&path),
        Err(e) => {
            log::error!("Failed to locate config, using defaults: {}", e);
            default_config()
        }
    }
}

pub fn load_or_default_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        return default_config();
    }

    match load_config_from(config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_settings_defaults() {
        let config = parse_config("").unwrap();
        let s = config.general;

        assert!(s.appear_at_cursor);
        assert!(!s.auto_center_cursor);
        assert!(s.draw_ring_background);
        assert_eq!(s.animation, AnimationStyle::Spiral);
        assert_eq!(s.animation_duration, 0.2);
        assert!(s.animate_icon_sizes);
        assert!(!s.keybind_passthrough);
        assert!(s.enable_escape_keybind);
        assert!(config.rings.is_empty());
    }

    #[test]
    fn test_ring_config_deserialization() {
        let toml = r#"
            animation = "Fade"
            animation_duration = 0.5
            center_offset = [10.0, -20.0]

            [[rings]]
            name = "Main"
            color = [1.0, 0.5, 0.0, 1.0]
            radius = 200
            quick_action = 0
            keybind = { keys = ["LCtrl", "1"], toggle = true }

            [[rings.items]]
            type = "command"
            command = "notify-send hi"

            [[rings.items]]
            type = "nested"
            ring = "Emotes"
            click_to_activate = true
        "#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.general.animation, AnimationStyle::Fade);
        assert_eq!(config.general.animation().duration, 0.5);
        assert_eq!(config.general.center_offset, Point::new(10.0, -20.0));

        let ring = &config.rings[0];
        assert_eq!(ring.name.as_str(), "Main");
        assert_eq!(ring.radius, 200.0);
        assert_eq!(ring.quick_action, Some(0));
        assert_eq!(ring.keybind.keys, vec![KeyCode::LeftControl, KeyCode::Digit1]);
        assert!(ring.keybind.toggle);
        assert_eq!(ring.items.len(), 2);
    }

    #[test]
    fn test_missing_or_broken_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("tpie-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let expected = default_config().rings.len();

        assert!(!path.exists());
        assert_eq!(load_or_default_from(&path).rings.len(), expected);

        fs_err::create_dir_all(&dir).unwrap();
        fs_err::write(&path, "rings = [").unwrap();
        assert!(load_config_from(&path).is_err());
        assert_eq!(load_or_default_from(&path).rings.len(), expected);

        fs_err::write(&path, "[[rings]]\nname = \"Only\"\n").unwrap();
        assert_eq!(load_or_default_from(&path).rings.len(), 1);

        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config();
        assert!(!config.rings.is_empty());
        for ring in &config.rings {
            assert!(!ring.items.is_empty(), "ring {} has no items", ring.name);
        }
    }
}
