use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use workout_core::{validate_library, Exercise};

#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// JSON file with an array of exercises [default: built-in library]
    #[arg(short, long)]
    pub library: Option<PathBuf>,
    /// Only list enabled exercises
    #[arg(long)]
    pub enabled: bool,
}

#[derive(Serialize)]
struct Listing {
    count: usize,
    exercises: Vec<Exercise>,
}

/// Validate and list a library as JSON.
pub fn run(args: LibraryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut exercises = crate::library::load(args.library.as_deref())?;
    validate_library(&exercises)?;
    if args.enabled {
        exercises.retain(|e| e.enabled);
    }
    let listing = Listing {
        count: exercises.len(),
        exercises,
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
