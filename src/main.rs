mod args;

use args::Args;
use clap::Parser;
use jelly_pathfinder::{Pathfinder, PathfinderError, PathfinderResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> PathfinderResult<()> {
    let config = args.build_config()?;
    let mut pathfinder = Pathfinder::new(config)?;

    log::info!(
        "🔍 Analysing {} with {} item and {} pose templates",
        pathfinder.config().screenshot.display(),
        pathfinder.config().items.len(),
        pathfinder.config().characters.len()
    );
    // A missing screenshot aborts before any template work
    let screenshot = pathfinder.load_screenshot()?;
    pathfinder.load_templates()?;

    let report = pathfinder.analyze(&screenshot)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "🍪 Character '{}' at {}",
            report.character.pose, report.start
        );
        println!(
            "🧭 Pathfinder result: {} of {} items in {}ms",
            report.path.len(),
            report.path.len() + report.unreachable,
            report.processing_time_ms
        );
        print!("{}", report.path);
    }

    let overlay = pathfinder.render(&screenshot, &report);
    overlay
        .save(&args.output)
        .map_err(|source| PathfinderError::OutputWrite {
            path: args.output.clone(),
            source,
        })?;
    log::info!("✅ Overlay saved to {}", args.output.display());

    Ok(())
}
