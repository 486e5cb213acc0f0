//! Exercise library sources for the CLI.
//!
//! The core never stores exercises; the CLI supplies them either from a JSON
//! file (an array of exercises) or from the built-in set below.

use std::path::Path;

use workout_core::{validate_library, CoreError, Exercise, LibraryProvider, ValidationError};

/// Library read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    exercises: Vec<Exercise>,
}

impl FileLibrary {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let exercises: Vec<Exercise> = serde_json::from_str(&content)?;
        if exercises.is_empty() {
            return Err(ValidationError::EmptyCollection(path.display().to_string()).into());
        }
        validate_library(&exercises)?;
        Ok(Self { exercises })
    }
}

impl LibraryProvider for FileLibrary {
    fn exercises(&self) -> Vec<Exercise> {
        self.exercises.clone()
    }
}

/// Bodyweight and light-equipment exercises used when no file is given.
pub struct BuiltinLibrary;

impl LibraryProvider for BuiltinLibrary {
    fn exercises(&self) -> Vec<Exercise> {
        vec![
            Exercise::new("Marching in Place", 0.5).with_tags(["legs", "cardio", "low impact"]),
            Exercise::new("Arm Circles", 0.6).with_tags(["shoulders", "mobility"]),
            Exercise::new("Jumping Jacks", 0.8).with_tags(["full body", "cardio"]),
            Exercise::new("Glute Bridge", 0.9).with_tags(["glutes", "hamstrings", "strength"]),
            Exercise::new("Bodyweight Squats", 1.0).with_tags(["legs", "glutes", "strength"]),
            Exercise::new("Reverse Lunge", 1.1).sided().with_tags(["legs", "glutes"]),
            Exercise::new("Plank", 1.1).with_equipment(["Mat"]).with_tags(["core"]),
            Exercise::new("Bird Dog", 0.8)
                .sided()
                .with_equipment(["Mat"])
                .with_tags(["core", "back", "balance"]),
            Exercise::new("Side Plank", 1.3)
                .sided()
                .with_equipment(["Mat"])
                .with_tags(["core", "obliques"]),
            Exercise::new("Push-ups", 1.3).with_tags(["chest", "arms", "shoulders", "strength"]),
            Exercise::new("Tricep Dips", 1.2).with_equipment(["Chair"]).with_tags(["arms"]),
            Exercise::new("Step-ups", 1.2)
                .sided()
                .with_equipment(["Chair"])
                .with_tags(["legs", "glutes"]),
            Exercise::new("Dumbbell Row", 1.2)
                .sided()
                .with_equipment(["Dumbbell"])
                .with_tags(["back", "arms"]),
            Exercise::new("Goblet Squat", 1.4)
                .with_equipment(["Dumbbell"])
                .with_tags(["legs", "core", "strength"]),
            Exercise::new("Kettlebell Swing", 1.6)
                .with_equipment(["Kettlebell"])
                .with_tags(["glutes", "back", "cardio"]),
            Exercise::new("High Knees", 1.4).with_tags(["legs", "cardio", "high impact"]),
            Exercise::new("Mountain Climbers", 1.6).with_tags(["core", "shoulders", "cardio"]),
            Exercise::new("Jump Squats", 1.7).with_tags(["legs", "plyometric", "high impact"]),
            Exercise::new("Burpees", 2.0).with_tags(["full body", "cardio", "high impact"]),
        ]
    }
}

/// Load from `path` if given, otherwise the built-in set.
pub fn load(path: Option<&Path>) -> Result<Vec<Exercise>, CoreError> {
    match path {
        Some(path) => Ok(FileLibrary::open(path)?.exercises()),
        None => Ok(BuiltinLibrary.exercises()),
    }
}
