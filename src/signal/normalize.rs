// Axis normalization - raw device counts to a calibrated unit interval
//
// Maps one raw joystick-layer sample (0..=65535) to [0, 1]:
// 1. Clamp to the nominal range and scale by division
// 2. Reflect if the axis is inverted
// 3. Apply calibrated zero + deadzone as a floor (values at or below it read 0)
// 4. Rescale the remaining travel linearly back onto [0, 1]

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound of the nominal raw axis range
pub const RAW_AXIS_MAX: u32 = 65_535;

/// Highest floor the zero + deadzone combination may reach
const MAX_FLOOR: f64 = 0.98;

/// Remaining travel below which the calibration is considered degenerate
const DEGENERATE_SPAN: f64 = 1e-9;

/// Per-channel normalization settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Reflect the axis (pedals wired so that rest reads full scale)
    pub invert: bool,
    /// Deadzone above the calibrated zero, in unit-interval terms
    pub deadzone: f64,
    /// Calibrated resting position, in unit-interval terms
    pub zero_raw: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            invert: false,
            deadzone: 0.02,
            zero_raw: 0.0,
        }
    }
}

impl NormalizationConfig {
    /// Validate deadzone and zero are inside [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.deadzone) {
            return Err(ConfigError::InvalidDeadzone {
                deadzone: self.deadzone,
            });
        }
        if !(0.0..=1.0).contains(&self.zero_raw) {
            return Err(ConfigError::InvalidZero {
                zero_raw: self.zero_raw,
            });
        }
        Ok(())
    }

    /// Effective floor: `min(0.98, zero_raw + deadzone)`
    pub fn floor(&self) -> f64 {
        (self.zero_raw + self.deadzone).min(MAX_FLOOR)
    }
}

/// Clamp a raw count to the nominal range and scale it to [0, 1]
pub fn raw_to_unit(raw: u32) -> f64 {
    f64::from(raw.min(RAW_AXIS_MAX)) / f64::from(RAW_AXIS_MAX)
}

/// Normalize one raw axis sample
///
/// Always returns a value in [0, 1]. Out-of-range counts are clamped, never
/// rejected, and a calibration that leaves no usable travel reads 0.
///
/// # Examples
/// ```
/// use pedal_trainer::signal::{normalize, NormalizationConfig};
///
/// let cfg = NormalizationConfig::default();
/// assert_eq!(normalize(0, &cfg), 0.0);
/// assert_eq!(normalize(65_535, &cfg), 1.0);
/// ```
pub fn normalize(raw: u32, cfg: &NormalizationConfig) -> f64 {
    let mut x = raw_to_unit(raw);
    if cfg.invert {
        x = 1.0 - x;
    }

    let floor = cfg.floor();
    if x <= floor {
        return 0.0;
    }

    let span = 1.0 - floor;
    if span <= DEGENERATE_SPAN {
        return 0.0;
    }

    ((x - floor) / span).clamp(0.0, 1.0)
}
