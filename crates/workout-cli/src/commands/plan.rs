use workout_core::Config;

use super::SessionArgs;

/// Print a generated plan as JSON.
pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let plan = args.build_plan(&config)?;
    if plan.is_inflated() {
        eprintln!(
            "warning: session runs {}s longer than requested",
            plan.inflated_seconds()
        );
    }
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
