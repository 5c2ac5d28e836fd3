//! Command-line argument parsing for Orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// Setting values override those loaded from `config.ron`; the run controls
/// (`--ticks`, `--tick-ms`, `--realtime`, `--step`) only apply to this run.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Hierarchical orbit simulator and transfer planner")]
pub struct CliArgs {
    /// JSON file describing the body tree.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 60)]
    pub ticks: u32,

    /// Fixed tick length in milliseconds (ignored with --realtime).
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    pub tick_ms: f64,

    /// Measure tick deltas from the wall clock at the configured frame rate.
    #[arg(long)]
    pub realtime: bool,

    /// Playback speed multiplier.
    #[arg(long)]
    pub time_multiplier: Option<f64>,

    /// Period multiplier applied at normalization.
    #[arg(long)]
    pub time_scaler: Option<f64>,

    /// Transfer speed in display units per millisecond.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Body to visit; repeat to build an itinerary.
    #[arg(long = "step", value_name = "BODY")]
    pub steps: Vec<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.data {
            self.data.system_path = path.clone();
        }
        if let Some(m) = args.time_multiplier {
            self.simulation.time_multiplier = m;
        }
        if let Some(s) = args.time_scaler {
            self.simulation.time_scaler = s;
        }
        if let Some(v) = args.speed {
            self.transfer.speed = v;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            data: Some(PathBuf::from("moons.json")),
            time_multiplier: Some(5.0),
            speed: Some(0.5),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.data.system_path, PathBuf::from("moons.json"));
        assert_eq!(config.simulation.time_multiplier, 5.0);
        assert_eq!(config.transfer.speed, 0.5);
        // Non-overridden fields retain defaults
        assert_eq!(config.simulation.time_scaler, 500.0);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_repeated_steps() {
        let args = CliArgs::parse_from([
            "orrery",
            "--step",
            "Earth",
            "--step",
            "Mars",
            "--ticks",
            "10",
            "--time-multiplier",
            "2.5",
        ]);
        assert_eq!(args.steps, ["Earth", "Mars"]);
        assert_eq!(args.ticks, 10);
        assert_eq!(args.time_multiplier, Some(2.5));
        assert!(!args.realtime);
        assert!((args.tick_ms - 1000.0 / 60.0).abs() < 1e-12);
    }
}
