// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// Single source of truth for the numeric codes a host maps to its own
/// validation messages.
///
/// Error code range: 3001-3007
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// Drill target percentage outside 10..=99
    pub const TARGET_OUT_OF_RANGE: i32 = 3001;

    /// Band or hold tolerance negative or not finite
    pub const INVALID_TOLERANCE: i32 = 3002;

    /// Onset threshold, hysteresis or grading threshold invalid
    pub const INVALID_THRESHOLD: i32 = 3003;

    /// Streak goal must be at least one rep
    pub const INVALID_GOAL: i32 = 3004;

    /// Deadzone outside [0, 1]
    pub const INVALID_DEADZONE: i32 = 3005;

    /// Calibrated zero outside [0, 1]
    pub const INVALID_ZERO: i32 = 3006;

    /// Smoothing time constant negative or not finite
    pub const INVALID_TIME_CONSTANT: i32 = 3007;
}

/// Log a configuration error with structured context
///
/// Logs the numeric code, the component and the message. The logging is
/// non-blocking and will not panic on failure.
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=DrillConfig, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Configuration validation errors
///
/// Raised when a drill, normalization or streak configuration is built, never
/// while a sample stream is being graded.
///
/// Error code range: 3001-3007
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Target percentage must be within 10..=99
    TargetOutOfRange { target_pct: u8 },

    /// A tolerance field is negative or not finite
    InvalidTolerance { field: &'static str, value: f64 },

    /// A threshold field is out of its valid range
    InvalidThreshold { field: &'static str, value: f64 },

    /// Streak goal must be at least 1
    InvalidGoal { goal: u32 },

    /// Deadzone must be within [0, 1]
    InvalidDeadzone { deadzone: f64 },

    /// Calibrated zero must be within [0, 1]
    InvalidZero { zero_raw: f64 },

    /// Smoothing time constant must be finite and >= 0
    InvalidTimeConstant { time_constant_ms: f64 },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::TargetOutOfRange { .. } => ConfigErrorCodes::TARGET_OUT_OF_RANGE,
            ConfigError::InvalidTolerance { .. } => ConfigErrorCodes::INVALID_TOLERANCE,
            ConfigError::InvalidThreshold { .. } => ConfigErrorCodes::INVALID_THRESHOLD,
            ConfigError::InvalidGoal { .. } => ConfigErrorCodes::INVALID_GOAL,
            ConfigError::InvalidDeadzone { .. } => ConfigErrorCodes::INVALID_DEADZONE,
            ConfigError::InvalidZero { .. } => ConfigErrorCodes::INVALID_ZERO,
            ConfigError::InvalidTimeConstant { .. } => ConfigErrorCodes::INVALID_TIME_CONSTANT,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::TargetOutOfRange { target_pct } => {
                format!("Target must be within 10..=99 percent (got {})", target_pct)
            }
            ConfigError::InvalidTolerance { field, value } => {
                format!("Tolerance {} must be finite and >= 0 (got {})", field, value)
            }
            ConfigError::InvalidThreshold { field, value } => {
                format!("Threshold {} out of range (got {})", field, value)
            }
            ConfigError::InvalidGoal { goal } => {
                format!("Streak goal must be at least 1 (got {})", goal)
            }
            ConfigError::InvalidDeadzone { deadzone } => {
                format!("Deadzone must be within [0, 1] (got {})", deadzone)
            }
            ConfigError::InvalidZero { zero_raw } => {
                format!("Calibrated zero must be within [0, 1] (got {})", zero_raw)
            }
            ConfigError::InvalidTimeConstant { time_constant_ms } => {
                format!(
                    "Smoothing time constant must be finite and >= 0 ms (got {})",
                    time_constant_ms
                )
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::TargetOutOfRange { target_pct: 100 }.code(),
            ConfigErrorCodes::TARGET_OUT_OF_RANGE
        );
        assert_eq!(
            ConfigError::InvalidTolerance {
                field: "band_tolerance",
                value: -0.1
            }
            .code(),
            ConfigErrorCodes::INVALID_TOLERANCE
        );
        assert_eq!(
            ConfigError::InvalidThreshold {
                field: "onset_threshold",
                value: 2.0
            }
            .code(),
            ConfigErrorCodes::INVALID_THRESHOLD
        );
        assert_eq!(
            ConfigError::InvalidGoal { goal: 0 }.code(),
            ConfigErrorCodes::INVALID_GOAL
        );
        assert_eq!(
            ConfigError::InvalidDeadzone { deadzone: 1.5 }.code(),
            ConfigErrorCodes::INVALID_DEADZONE
        );
        assert_eq!(
            ConfigError::InvalidZero { zero_raw: -1.0 }.code(),
            ConfigErrorCodes::INVALID_ZERO
        );
        assert_eq!(
            ConfigError::InvalidTimeConstant {
                time_constant_ms: -5.0
            }
            .code(),
            ConfigErrorCodes::INVALID_TIME_CONSTANT
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::TargetOutOfRange { target_pct: 5 };
        assert_eq!(err.message(), "Target must be within 10..=99 percent (got 5)");

        let err = ConfigError::InvalidTolerance {
            field: "band_tolerance",
            value: -0.5,
        };
        assert!(err.message().contains("band_tolerance"));
        assert!(err.message().contains("-0.5"));

        let err = ConfigError::InvalidGoal { goal: 0 };
        assert!(err.message().contains("at least 1"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidDeadzone { deadzone: 2.0 };
        let display = format!("{}", err);
        assert!(display.contains("ConfigError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
