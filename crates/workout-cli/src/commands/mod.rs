pub mod config;
pub mod library;
pub mod plan;
pub mod run;

use std::path::PathBuf;

use clap::Args;
use workout_core::{Config, SessionConfig, SessionGenerator, SessionPlan};

/// Flags shared by every command that builds a session.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Session length in minutes [default: session.duration_minutes]
    #[arg(short, long)]
    pub minutes: Option<u32>,
    /// Available equipment (repeatable); bodyweight exercises always qualify
    #[arg(short, long = "equipment")]
    pub equipment: Vec<String>,
    /// Leave out exercises carrying this tag (repeatable)
    #[arg(short = 'x', long = "exclude-tag")]
    pub exclude_tags: Vec<String>,
    /// JSON file with an array of exercises [default: built-in library]
    #[arg(short, long)]
    pub library: Option<PathBuf>,
    /// Seed for reproducible exercise selection
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SessionArgs {
    /// Merge the flags over the configured session defaults.
    pub fn session_config(&self, config: &Config) -> SessionConfig {
        let mut session = config.session.to_session_config();
        if let Some(minutes) = self.minutes {
            session.duration_minutes = minutes;
        }
        if !self.equipment.is_empty() {
            session.equipment_filter = self.equipment.iter().cloned().collect();
        }
        if !self.exclude_tags.is_empty() {
            session.excluded_tags = self.exclude_tags.iter().cloned().collect();
        }
        session
    }

    pub fn generator(&self, config: &Config) -> SessionGenerator {
        let settings = config.generation.clone();
        match self.seed {
            Some(seed) => SessionGenerator::with_seed(settings, seed),
            None => SessionGenerator::new(settings),
        }
    }

    /// Generate a plan from these flags.
    pub fn build_plan(&self, config: &Config) -> Result<SessionPlan, Box<dyn std::error::Error>> {
        let exercises = crate::library::load(self.library.as_deref())?;
        let plan = self
            .generator(config)
            .generate(&self.session_config(config), &exercises)?;
        Ok(plan)
    }
}
