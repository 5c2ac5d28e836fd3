//! Orrery — headless orbit simulator and transfer planner.
//!
//! Loads a body tree from JSON, rescales it once, advances it for a number
//! of ticks and prints every body's state. With two or more `--step`
//! arguments it also plans the transfers between consecutive stops.
//!
//! Run with: `cargo run -p orrery-app -- --step Earth --step Mars`

mod report;
mod runner;

use std::process::ExitCode;

use clap::Parser;
use orrery_config::{CliArgs, Config, ConfigError};
use orrery_sim::{Itinerary, LoadError, PlanError, SimClock, System, plan};
use tracing::{error, info};

use crate::runner::TickMode;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("orrery: {err}");
            return ExitCode::FAILURE;
        }
    };

    orrery_log::init_logging(None, cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &CliArgs) -> Result<Config, AppError> {
    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok(config)
}

fn run(args: &CliArgs, config: &Config) -> Result<(), AppError> {
    let sim = &config.simulation;

    let mut system = System::load(&config.data.system_path)?;
    system.normalize(&sim.scale, sim.time_scaler);
    info!(
        "Normalized {} bodies (time scaler {}, {} scale levels)",
        system.len(),
        sim.time_scaler,
        sim.scale.len()
    );

    let mode = if args.realtime {
        TickMode::Realtime {
            frame_rate: sim.frame_rate,
        }
    } else {
        TickMode::Fixed {
            tick_ms: args.tick_ms,
        }
    };
    let mut clock = SimClock::with_multiplier(sim.time_multiplier);
    let summary = runner::run(&mut system, &mut clock, mode, args.ticks);
    info!(
        "Ran {} ticks, {:.1} ms at x{}",
        summary.ticks,
        summary.elapsed_ms,
        clock.time_multiplier()
    );

    print!("{}", report::bodies(&system));

    if args.steps.len() >= 2 {
        let itinerary = Itinerary::new(args.steps.iter().cloned());
        let legs = plan(&system, &itinerary, &config.transfer_settings())?;
        print!("{}", report::legs(&legs));
    }

    Ok(())
}
