//! End-to-end session generation.
//!
//! ```text
//! library -> filter -> select -> allocate -> enforce limits -> arrange -> SessionPlan
//! ```

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use tracing::{info, warn};

use super::allocator::allocate_with_multiplier;
use super::arranger::arrange;
use super::constraints::enforce;
use super::plan::SessionPlan;
use super::selector::{exercise_count, select};
use crate::error::Result;
use crate::exercise::{filter_pool, validate_library, Exercise, SessionConfig};
use crate::storage::GenerationSettings;

/// Builds session plans. Owns its random source so results are reproducible
/// when seeded.
#[derive(Debug, Clone)]
pub struct SessionGenerator {
    settings: GenerationSettings,
    rng: Mcg128Xsl64,
}

impl SessionGenerator {
    /// Generator seeded from OS entropy.
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Generator with a fixed seed.
    pub fn with_seed(settings: GenerationSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    /// Produce a plan for `config` from `library`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero duration or an empty pool after
    /// filtering; a validation error if the library breaks entry invariants.
    pub fn generate(
        &mut self,
        config: &SessionConfig,
        library: &[Exercise],
    ) -> Result<SessionPlan> {
        let total_seconds = config.total_seconds()?;
        validate_library(library)?;
        let pool = filter_pool(library, config)?;

        let count = exercise_count(total_seconds, pool.len(), &self.settings);
        let selected = select(&pool, count, &mut self.rng);
        let segments =
            allocate_with_multiplier(&selected, total_seconds, self.settings.sided_multiplier);
        let (segments, report) = enforce(segments, self.settings.limits());
        let segments = arrange(segments, &self.settings.category_tags);

        let plan = SessionPlan::new(segments, total_seconds);
        plan.check_conservation()?;
        debug_assert_eq!(plan.total_duration_seconds, total_seconds + report.inflated_seconds);

        if plan.is_inflated() {
            warn!(
                target_seconds = total_seconds,
                actual_seconds = plan.total_duration_seconds,
                "session runs longer than requested"
            );
        }
        info!(
            plan_id = %plan.id,
            pool = pool.len(),
            exercises = count,
            segments = plan.len(),
            total_seconds = plan.total_duration_seconds,
            "generated session"
        );
        Ok(plan)
    }
}

impl Default for SessionGenerator {
    fn default() -> Self {
        Self::new(GenerationSettings::default())
    }
}

/// Generate a plan with default settings and an unseeded random source.
pub fn generate_session(config: &SessionConfig, exercises: &[Exercise]) -> Result<SessionPlan> {
    SessionGenerator::default().generate(config, exercises)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, SessionError};

    fn library() -> Vec<Exercise> {
        vec![
            Exercise::new("Jumping Jacks", 0.8).with_tags(["cardio", "full body"]),
            Exercise::new("Squats", 1.0).with_tags(["legs", "glutes"]),
            Exercise::new("Push-ups", 1.3).with_tags(["chest", "arms"]),
            Exercise::new("Plank", 1.1).with_tags(["core"]),
            Exercise::new("Side Lunge", 1.2).sided().with_tags(["legs"]),
            Exercise::new("Burpees", 1.9).with_tags(["cardio", "full body"]),
        ]
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = SessionConfig::new(5);
        let a = SessionGenerator::with_seed(GenerationSettings::default(), 11)
            .generate(&config, &library())
            .unwrap();
        let b = SessionGenerator::with_seed(GenerationSettings::default(), 11)
            .generate(&config, &library())
            .unwrap();
        assert_eq!(a.segments, b.segments);
    }

    #[test]
    fn plan_matches_requested_length() {
        let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 3);
        let plan = generator.generate(&SessionConfig::new(4), &library()).unwrap();
        assert_eq!(plan.total_duration_seconds, 240);
        assert_eq!(plan.sum_durations(), 240);
        assert!(!plan.is_inflated());
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn zero_duration_is_invalid_configuration() {
        let err = generate_session(&SessionConfig::new(0), &library()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn filtered_out_library_is_invalid_configuration() {
        let config = SessionConfig::new(5)
            .with_equipment(["barbell"])
            .excluding(["legs", "core", "chest", "full body"]);
        let err = generate_session(&config, &library()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn invalid_library_is_rejected() {
        let mut lib = library();
        lib.push(Exercise::new("Squats", 1.0));
        let err = generate_session(&SessionConfig::new(5), &lib).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
