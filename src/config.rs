//! Configuration management for drill and pedal tuning
//!
//! Runtime configuration is loaded from a JSON file so that axis mapping,
//! calibration and drill targets can be adjusted without recompiling. Every
//! section has serde defaults, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::drills::{DrillConfig, DrillEngine};
use crate::error::{log_config_error, ConfigError};
use crate::session::{StreakTracker, DEFAULT_STREAK_GOAL};
use crate::signal::{AxisName, AxisSource, NormalizationConfig, PedalPipeline};

/// Default config file location for desktop hosts and the CLI
pub const DEFAULT_CONFIG_PATH: &str = "assets/pedal_config.json";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Brake channel normalization (invert, deadzone, calibrated zero)
    pub brake: NormalizationConfig,
    /// Throttle channel normalization
    pub throttle: NormalizationConfig,
    /// EMA time constant shared by both channels, 0 disables smoothing
    pub smoothing_ms: f64,
    pub axis_brake: AxisName,
    pub axis_throttle: AxisName,
    /// Drill graded on the brake channel
    pub drill: DrillConfig,
    /// Consecutive passes that complete a session
    pub streak_goal: u32,
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            brake: NormalizationConfig::default(),
            throttle: NormalizationConfig::default(),
            smoothing_ms: 20.0,
            axis_brake: AxisName::X,
            axis_throttle: AxisName::Y,
            drill: DrillConfig::default(),
            streak_goal: DEFAULT_STREAK_GOAL,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration. A missing, unparsable or invalid file logs a
    /// warning and yields the defaults instead.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(err) => {
                        log_config_error(&err, "AppConfig::load_from_file");
                        log::warn!(
                            "[Config] Invalid configuration in {:?}: {}. Using defaults.",
                            path.as_ref(),
                            err
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.brake.validate()?;
        self.throttle.validate()?;
        if !self.smoothing_ms.is_finite() || self.smoothing_ms < 0.0 {
            return Err(ConfigError::InvalidTimeConstant {
                time_constant_ms: self.smoothing_ms,
            });
        }
        if self.streak_goal == 0 {
            return Err(ConfigError::InvalidGoal { goal: 0 });
        }
        self.drill.validate()
    }

    /// Pipeline over `source` with this config's axes, calibration and smoothing
    pub fn pipeline<S: AxisSource>(&self, source: S) -> PedalPipeline<S> {
        PedalPipeline::with_config(
            source,
            self.axis_brake,
            self.axis_throttle,
            self.brake,
            self.throttle,
            self.smoothing_ms,
        )
    }

    pub fn drill_engine(&self) -> Result<DrillEngine, ConfigError> {
        DrillEngine::new(self.drill.clone())
    }

    pub fn streak_tracker(&self) -> Result<StreakTracker, ConfigError> {
        StreakTracker::new(self.streak_goal)
    }
}
