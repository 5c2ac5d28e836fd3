//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use orrery_sim::{ScaleTable, TIME_SCALER, TransferSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Time and scale settings for the body tree.
    pub simulation: SimulationConfig,
    /// Transfer solver settings.
    pub transfer: TransferConfig,
    /// Input data location.
    pub data: DataConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Simulation time and scale configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier applied once to every period at normalization.
    pub time_scaler: f64,
    /// Playback speed multiplier applied every tick.
    pub time_multiplier: f64,
    /// Target ticks per second in real-time mode.
    pub frame_rate: u32,
    /// Per-depth radius and distance divisors.
    pub scale: ScaleTable,
}

/// Transfer solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferConfig {
    /// Travel speed in display units per millisecond.
    pub speed: f64,
    /// Bisection stopping half-width.
    pub tolerance: f64,
    /// Bisection iteration cap.
    pub max_iterations: u32,
}

/// Input data configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file describing the body tree.
    pub system_path: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scaler: TIME_SCALER,
            time_multiplier: 1.0,
            frame_rate: 60,
            scale: ScaleTable::default(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            speed: 0.05,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            system_path: PathBuf::from("data/celestial-bodies.json"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Platform config directory for Orrery, e.g. `~/.config/orrery`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("orrery"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Checks values that deserialize fine but would break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue { field, reason })
        };

        if !self.simulation.time_scaler.is_finite() || self.simulation.time_scaler <= 0.0 {
            return invalid("simulation.time_scaler", "must be positive and finite");
        }
        if !self.simulation.time_multiplier.is_finite() || self.simulation.time_multiplier < 0.0 {
            return invalid("simulation.time_multiplier", "must be non-negative and finite");
        }
        if self.simulation.frame_rate == 0 {
            return invalid("simulation.frame_rate", "must be at least 1");
        }
        if !self.transfer.speed.is_finite() || self.transfer.speed <= 0.0 {
            return invalid("transfer.speed", "must be positive and finite");
        }
        if !self.transfer.tolerance.is_finite() || self.transfer.tolerance <= 0.0 {
            return invalid("transfer.tolerance", "must be positive and finite");
        }
        Ok(())
    }

    /// Solver settings for itinerary planning.
    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            speed: self.transfer.speed,
            tolerance: self.transfer.tolerance,
            max_iterations: self.transfer.max_iterations,
            time_multiplier: self.simulation.time_multiplier,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
