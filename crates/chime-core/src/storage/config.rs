//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Display settings (12h/24h clock, default snooze)
//! - Timer defaults and presets
//! - Pomodoro plan and sounds
//! - Overlay settings (filters, position, display mode)
//!
//! Configuration is stored at `~/.config/chime/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::overlay::OverlaySettings;
use crate::pomodoro::PomodoroPlan;

/// Display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub time_format_24h: bool,
    /// Default snooze length in minutes when an alarm has none.
    #[serde(default = "default_snooze")]
    pub snooze_duration: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format_24h: true,
            snooze_duration: default_snooze(),
        }
    }
}

/// A reusable countdown preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub seconds: u64,
    pub label: String,
}

/// Timer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_volume")]
    pub volume: u32,
    #[serde(default)]
    pub subtle_mode: bool,
    #[serde(default)]
    pub auto_suspend: bool,
    #[serde(default = "default_presets")]
    pub presets: Vec<Preset>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            sound: default_sound(),
            volume: default_volume(),
            subtle_mode: false,
            auto_suspend: false,
            presets: default_presets(),
        }
    }
}

/// Pomodoro preferences: the plan plus notification behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default)]
    pub plan: PomodoroPlan,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_volume")]
    pub volume: u32,
    #[serde(default)]
    pub subtle_mode: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            plan: PomodoroPlan::default(),
            sound: default_sound(),
            volume: default_volume(),
            subtle_mode: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_snooze() -> u32 {
    5
}

fn default_sound() -> String {
    "alarm.mp3".to_string()
}

fn default_volume() -> u32 {
    100
}

fn default_presets() -> Vec<Preset> {
    [(5u64, "5 minutes"), (10, "10 minutes"), (15, "15 minutes"), (30, "30 minutes"), (60, "1 hour")]
        .into_iter()
        .map(|(minutes, label)| Preset {
            id: format!("preset-{minutes}"),
            seconds: minutes * 60,
            label: label.to_string(),
        })
        .collect()
}

/// Application configuration root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub overlay: OverlaySettings,
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location; IO or parse problems fall back to
    /// defaults (a best-effort display must not refuse to start).
    pub fn load_or_default() -> Self {
        Self::config_path()
            .and_then(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a value by dotted path (e.g. `display.time_format_24h`).
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = serde_json::to_value(self).ok()?;
        let mut current = &root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current.clone())
    }

    /// Set a value by dotted path, parsing `value` against the existing
    /// type at that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut root =
            serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        set_json_path(&mut root, key, value)?;
        *self = serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn set_json_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Err(ConfigError::UnknownKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let config = Config::default();
        assert!(config.display.time_format_24h);
        assert_eq!(config.display.snooze_duration, 5);
        assert_eq!(config.timer.sound, "alarm.mp3");
        assert_eq!(config.pomodoro.plan.work_minutes, 25);
        assert_eq!(config.timer.presets.len(), 5);
        assert_eq!(config.timer.presets[4].seconds, 3600);
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.display.time_format_24h = false;
        config.overlay.max_alerts = 9;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.display.time_format_24h);
        assert_eq!(loaded.overlay.max_alerts, 9);
        assert_eq!(loaded.timer.presets.len(), 5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ntime_format_24h = false\n").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.display.time_format_24h);
        assert_eq!(loaded.display.snooze_duration, 5);
        assert_eq!(loaded.pomodoro.plan.break_minutes, 5);
    }

    #[test]
    fn dotted_get_set() {
        let mut config = Config::default();
        config.set("display.snooze_duration", "9").unwrap();
        assert_eq!(config.display.snooze_duration, 9);
        assert_eq!(config.get("display.snooze_duration").unwrap(), serde_json::json!(9));

        config.set("overlay.enabled", "false").unwrap();
        assert!(!config.overlay.enabled);

        assert!(config.set("display.nope", "1").is_err());
        assert!(config.get("display.nope").is_none());
    }
}
