//! Exercise library entries and per-session configuration.
//!
//! The library itself is owned by an outside collaborator (see
//! [`LibraryProvider`]); the core only reads it, validates it, and filters it
//! down to the pool a session may draw from.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, ValidationError};

/// Lowest accepted difficulty weight.
pub const MIN_DIFFICULTY: f64 = 0.5;
/// Highest accepted difficulty weight.
pub const MAX_DIFFICULTY: f64 = 2.0;

/// Equipment tag meaning "no equipment needed".
const NO_EQUIPMENT: &str = "none";

/// A single library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Relative effort in `[0.5, 2.0]`. Harder exercises get less time.
    pub difficulty: f64,
    /// Required equipment. Empty or `"None"` means bodyweight.
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Muscle-group and category labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Performed once per side; gets extra time and a switch-sides cue.
    #[serde(default)]
    pub sided: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Exercise {
    /// Bodyweight, unsided, enabled exercise with no tags.
    pub fn new(name: impl Into<String>, difficulty: f64) -> Self {
        Self {
            name: name.into(),
            difficulty,
            equipment: Vec::new(),
            tags: Vec::new(),
            sided: false,
            enabled: true,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }

    pub fn sided(mut self) -> Self {
        self.sided = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Equipment tags that actually require gear, lowercased.
    pub fn required_equipment(&self) -> impl Iterator<Item = String> + '_ {
        self.equipment
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty() && e != NO_EQUIPMENT)
    }

    pub fn needs_equipment(&self) -> bool {
        self.required_equipment().next().is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// What the caller asked for: how long, with what gear, avoiding which tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub duration_minutes: u32,
    /// Available equipment. Empty means no filtering.
    #[serde(default)]
    pub equipment_filter: BTreeSet<String>,
    #[serde(default)]
    pub excluded_tags: BTreeSet<String>,
}

impl SessionConfig {
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            ..Self::default()
        }
    }

    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment_filter = equipment.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluding<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Session length in seconds, or an error for a zero duration.
    pub fn total_seconds(&self) -> Result<u32, SessionError> {
        if self.duration_minutes == 0 {
            return Err(SessionError::InvalidConfiguration(
                "duration must be at least one minute".into(),
            ));
        }
        self.duration_minutes.checked_mul(60).ok_or_else(|| {
            SessionError::InvalidConfiguration(format!(
                "duration of {} minutes is too long",
                self.duration_minutes
            ))
        })
    }
}

/// Supplies the exercise library. Implementations own persistence and
/// editing; the core never writes back through this trait.
pub trait LibraryProvider {
    fn exercises(&self) -> Vec<Exercise>;
}

/// Check the library-level invariants on exercise entries.
pub fn validate_library(library: &[Exercise]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for exercise in library {
        let name = &exercise.name;
        if name.is_empty() || name.trim() != name {
            return Err(ValidationError::InvalidName { name: name.clone() });
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ValidationError::DuplicateName(name.clone()));
        }
        let d = exercise.difficulty;
        if !d.is_finite() || !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) {
            return Err(ValidationError::DifficultyOutOfRange {
                name: name.clone(),
                difficulty: d,
                min: MIN_DIFFICULTY,
                max: MAX_DIFFICULTY,
            });
        }
    }
    Ok(())
}

/// Reduce the library to the exercises this session may use.
///
/// Keeps enabled exercises whose required equipment is all available (when an
/// equipment filter is set) and that carry none of the excluded tags.
pub fn filter_pool(
    library: &[Exercise],
    config: &SessionConfig,
) -> Result<Vec<Exercise>, SessionError> {
    let available: HashSet<String> = config
        .equipment_filter
        .iter()
        .map(|e| e.trim().to_lowercase())
        .collect();

    let pool: Vec<Exercise> = library
        .iter()
        .filter(|e| e.enabled)
        .filter(|e| {
            available.is_empty() || e.required_equipment().all(|req| available.contains(&req))
        })
        .filter(|e| !config.excluded_tags.iter().any(|tag| e.has_tag(tag)))
        .cloned()
        .collect();

    if pool.is_empty() {
        return Err(SessionError::InvalidConfiguration(format!(
            "no exercises left after filtering {} library entries",
            library.len()
        )));
    }
    Ok(pool)
}
