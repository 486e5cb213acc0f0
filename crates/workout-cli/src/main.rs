use clap::{Parser, Subcommand};

mod commands;
mod library;

#[derive(Parser)]
#[command(name = "workout", version, about = "Timed workout session planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a session plan and print it as JSON
    Plan {
        #[command(flatten)]
        args: commands::SessionArgs,
    },
    /// Generate a session and run the countdown
    Run {
        #[command(flatten)]
        args: commands::run::RunArgs,
    },
    /// Validate and list the exercise library
    Library {
        #[command(flatten)]
        args: commands::library::LibraryArgs,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { args } => commands::plan::run(args),
        Commands::Run { args } => commands::run::run(args),
        Commands::Library { args } => commands::library::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
