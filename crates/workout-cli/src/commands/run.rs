use std::time::Duration;

use clap::Args;
use workout_core::{Config, SessionPlan, SessionRunner, TimerController};

use super::SessionArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Tick every 10 ms instead of the configured interval
    #[arg(long)]
    pub fast: bool,
}

/// Generate a session and run it, printing one JSON event per line.
pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let plan = args.session.build_plan(&config)?;
    let interval = if args.fast {
        Duration::from_millis(10)
    } else {
        Duration::from_millis(config.timer.tick_interval_ms)
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(drive(plan, interval))
}

async fn drive(plan: SessionPlan, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = TimerController::new();
    controller.on_event(|event| match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => tracing::warn!(%err, "could not encode timer event"),
    });
    controller.on_switch_sides(|| eprintln!(">> switch sides"));

    let mut runner = SessionRunner::new(controller, interval);
    runner.load(plan)?;
    runner.start()?;

    let interrupted = tokio::select! {
        _ = runner.wait_finished() => false,
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        runner.pause();
        if let Some(snapshot) = runner.snapshot() {
            eprintln!(
                "paused at exercise {}/{} ({}), {}s left",
                snapshot.current_index + 1,
                snapshot.segment_count,
                snapshot.exercise,
                snapshot.remaining_seconds
            );
        }
    }
    Ok(())
}
