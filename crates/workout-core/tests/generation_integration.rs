//! Integration tests for session generation.
//!
//! These run the full pipeline (filter, select, allocate, enforce limits,
//! arrange) and check the properties every generated plan must have.

use proptest::prelude::*;
use workout_core::{
    CoreError, DurationLimits, Exercise, GenerationSettings, SessionConfig, SessionError,
    SessionGenerator, TimerController,
};

fn library() -> Vec<Exercise> {
    vec![
        Exercise::new("Marching", 0.6).with_tags(["legs", "cardio", "low impact"]),
        Exercise::new("Arm Circles", 0.8).with_tags(["shoulders", "mobility"]),
        Exercise::new("Squats", 1.0).with_tags(["legs", "glutes", "strength"]),
        Exercise::new("Plank", 1.2).with_equipment(["None"]).with_tags(["core"]),
        Exercise::new("Push-ups", 1.4).with_tags(["chest", "arms", "strength"]),
        Exercise::new("Side Lunge", 1.3).sided().with_tags(["legs", "glutes"]),
        Exercise::new("Mountain Climbers", 1.6).with_tags(["core", "cardio"]),
        Exercise::new("Dumbbell Row", 1.1)
            .sided()
            .with_equipment(["Dumbbell"])
            .with_tags(["back", "arms"]),
        Exercise::new("Burpees", 1.9).with_tags(["full body", "cardio", "high impact"]),
    ]
}

fn unsided_library() -> Vec<Exercise> {
    library().into_iter().filter(|e| !e.sided).collect()
}

#[test]
fn ten_minute_session_fills_exactly_ten_minutes() {
    let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 2024);
    let plan = generator.generate(&SessionConfig::new(10), &library()).unwrap();

    assert_eq!(plan.total_duration_seconds, 600);
    assert_eq!(plan.target_duration_seconds, 600);
    assert_eq!(plan.sum_durations(), 600);
    assert!(plan
        .segments
        .iter()
        .all(|s| DurationLimits::default().contains(s.duration_seconds)));
}

#[test]
fn equipment_filter_limits_pool() {
    let config = SessionConfig::new(5).with_equipment(["mat"]);
    let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 5);
    let plan = generator.generate(&config, &library()).unwrap();
    assert!(plan.segments.iter().all(|s| s.exercise.name != "Dumbbell Row"));
}

#[test]
fn excluded_tags_never_appear() {
    let config = SessionConfig::new(8).excluding(["cardio"]);
    let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 8);
    let plan = generator.generate(&config, &library()).unwrap();
    assert!(plan.segments.iter().all(|s| !s.exercise.has_tag("cardio")));
}

#[test]
fn small_pool_long_session_splits_segments() {
    let pool = vec![
        Exercise::new("Squats", 1.0).with_tags(["legs"]),
        Exercise::new("Push-ups", 1.5).with_tags(["chest"]),
    ];
    let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 1);
    let plan = generator.generate(&SessionConfig::new(10), &pool).unwrap();

    assert_eq!(plan.sum_durations(), 600);
    assert!(plan.len() >= 5);
    assert!(plan.segments.iter().all(|s| s.duration_seconds <= 120));
}

#[test]
fn failed_generation_leaves_loaded_session_alone() {
    let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), 3);
    let plan = generator.generate(&SessionConfig::new(3), &library()).unwrap();

    let mut timer = TimerController::new();
    timer.initialize(plan.clone()).unwrap();
    timer.start().unwrap();
    timer.tick().unwrap();
    let before = timer.state();

    let err = generator
        .generate(&SessionConfig::new(0), &library())
        .unwrap_err();
    assert!(matches!(err, CoreError::Session(SessionError::InvalidConfiguration(_))));

    assert_eq!(timer.state(), before);
    assert_eq!(timer.plan(), Some(&plan));
}

#[test]
fn custom_limits_are_respected() {
    let settings = GenerationSettings {
        min_segment_seconds: 30,
        max_segment_seconds: 60,
        ..GenerationSettings::default()
    };
    let mut generator = SessionGenerator::with_seed(settings, 77);
    let plan = generator.generate(&SessionConfig::new(12), &library()).unwrap();
    assert_eq!(plan.sum_durations(), 720);
    assert!(plan
        .segments
        .iter()
        .all(|s| (30..=60).contains(&s.duration_seconds)));
}

proptest! {
    #[test]
    fn generated_plans_conserve_time_within_limits(minutes in 1u32..=60, seed in any::<u64>()) {
        let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), seed);
        let plan = generator.generate(&SessionConfig::new(minutes), &library()).unwrap();

        prop_assert_eq!(plan.sum_durations(), minutes * 60);
        prop_assert_eq!(plan.total_duration_seconds, minutes * 60);
        prop_assert!(!plan.is_inflated());
        for segment in &plan.segments {
            prop_assert!(DurationLimits::default().contains(segment.duration_seconds));
        }
    }

    #[test]
    fn hardest_work_sits_in_the_middle(minutes in 3u32..=8, seed in any::<u64>()) {
        let mut generator = SessionGenerator::with_seed(GenerationSettings::default(), seed);
        let plan = generator.generate(&SessionConfig::new(minutes), &unsided_library()).unwrap();
        prop_assume!(plan.len() >= 3);

        let difficulties: Vec<f64> = plan.segments.iter().map(|s| s.difficulty()).collect();
        let middle_max = difficulties[1..difficulties.len() - 1]
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max);
        prop_assert!(difficulties[0] < middle_max);
        prop_assert!(difficulties[difficulties.len() - 1] < middle_max);
    }
}
