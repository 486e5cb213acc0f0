//! TOML-based application configuration.
//!
//! Stores:
//! - Session generation tuning (segment limits, pacing, sided multiplier)
//! - Timer cadence
//! - Default session request used when the CLI gets no flags
//!
//! Configuration is stored at `~/.config/workout-timer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;
use crate::exercise::SessionConfig;
use crate::session::{DurationLimits, DEFAULT_CATEGORY_TAGS, SIDED_MULTIPLIER};

/// Knobs for the session generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_seconds_per_exercise")]
    pub seconds_per_exercise: u32,
    #[serde(default = "default_min_exercises")]
    pub min_exercises: usize,
    #[serde(default = "default_min_segment_seconds")]
    pub min_segment_seconds: u32,
    #[serde(default = "default_max_segment_seconds")]
    pub max_segment_seconds: u32,
    #[serde(default = "default_sided_multiplier")]
    pub sided_multiplier: f64,
    /// Tags ignored when comparing muscle groups between segments.
    #[serde(default = "default_category_tags")]
    pub category_tags: Vec<String>,
}

/// Timer cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Session request used when nothing more specific is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub excluded_tags: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/workout-timer/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub session: SessionDefaults,
}

// Default functions
fn default_seconds_per_exercise() -> u32 {
    40
}
fn default_min_exercises() -> usize {
    3
}
fn default_min_segment_seconds() -> u32 {
    DurationLimits::default().min_seconds
}
fn default_max_segment_seconds() -> u32 {
    DurationLimits::default().max_seconds
}
fn default_sided_multiplier() -> f64 {
    SIDED_MULTIPLIER
}
fn default_category_tags() -> Vec<String> {
    DEFAULT_CATEGORY_TAGS.iter().map(|t| t.to_string()).collect()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_duration_minutes() -> u32 {
    10
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            seconds_per_exercise: default_seconds_per_exercise(),
            min_exercises: default_min_exercises(),
            min_segment_seconds: default_min_segment_seconds(),
            max_segment_seconds: default_max_segment_seconds(),
            sided_multiplier: default_sided_multiplier(),
            category_tags: default_category_tags(),
        }
    }
}

impl GenerationSettings {
    pub fn limits(&self) -> DurationLimits {
        DurationLimits {
            min_seconds: self.min_segment_seconds,
            max_seconds: self.max_segment_seconds,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            equipment: Vec::new(),
            excluded_tags: Vec::new(),
        }
    }
}

impl SessionDefaults {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::new(self.duration_minutes)
            .with_equipment(self.equipment.iter().cloned())
            .excluding(self.excluded_tags.iter().cloned())
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

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
                    serde_json::Value::Array(_) if !value.trim_start().starts_with('[') => {
                        serde_json::Value::Array(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(|s| serde_json::Value::String(s.to_string()))
                                .collect(),
                        )
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated, or if the default config cannot be written. An existing
    /// file is never overwritten.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, falling back to defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(%err, "using default configuration");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject combinations the generator and timer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };
        let g = &self.generation;
        if g.min_segment_seconds == 0 {
            return invalid("generation.min_segment_seconds", "must be positive");
        }
        if g.min_segment_seconds > g.max_segment_seconds {
            return invalid(
                "generation.min_segment_seconds",
                "must not exceed generation.max_segment_seconds",
            );
        }
        if g.seconds_per_exercise == 0 {
            return invalid("generation.seconds_per_exercise", "must be positive");
        }
        if !(g.sided_multiplier.is_finite() && g.sided_multiplier >= 1.0) {
            return invalid("generation.sided_multiplier", "must be at least 1.0");
        }
        if self.timer.tick_interval_ms == 0 {
            return invalid("timer.tick_interval_ms", "must be positive");
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the result fails validation. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
