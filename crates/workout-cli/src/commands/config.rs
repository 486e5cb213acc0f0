use clap::Subcommand;
use workout_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting (e.g. "generation.max_segment_seconds")
    Get { key: String },
    /// Change one setting; lists take comma-separated items
    Set { key: String, value: String },
    /// Print the whole configuration as JSON
    List,
    /// Print where the configuration file lives
    Path,
    /// Restore every setting to its default
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let before = config.get(&key).unwrap_or_default();
            config.set(&key, &value)?;
            config.save()?;
            let after = config.get(&key).unwrap_or_default();
            println!("{key}: {before} -> {after}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            eprintln!("# {}", Config::path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            let path = Config::path()?;
            Config::default().save_to(&path)?;
            println!("reset {} to defaults", path.display());
        }
    }
    Ok(())
}
