// Drill configuration - targets, goals and grading thresholds
//
// Every tuning constant the grader uses lives on DrillConfig so that brake and
// throttle channels (or two sessions) can run different tunings side by side.
// A config is validated once when an engine is built and is immutable after.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Desired time-to-band speed for the application phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationGoal {
    /// Reach the band within `fast_max_ms`
    Fast,
    /// Reach the band after `fast_max_ms` but within `medium_max_ms`
    Medium,
    /// Only the absolute ceiling applies
    Any,
}

impl ApplicationGoal {
    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationGoal::Fast => "FAST",
            ApplicationGoal::Medium => "MEDIUM",
            ApplicationGoal::Any => "ANY",
        }
    }
}

/// Desired release duration (last in-band sample to below onset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseGoal {
    /// Release within `release_medium_min_ms..=release_medium_max_ms`
    Medium,
    /// Release over at least `release_slow_min_ms`
    Slow,
    /// Any measured release passes
    Any,
}

impl ReleaseGoal {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReleaseGoal::Medium => "MEDIUM",
            ReleaseGoal::Slow => "SLOW",
            ReleaseGoal::Any => "ANY",
        }
    }
}

/// Grading thresholds, tuned for load-cell pedals
///
/// Fractions are on the unit interval (0.06 = 6 % of pedal travel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillThresholds {
    /// FAST application ceiling
    pub fast_max_ms: f64,
    /// MEDIUM application ceiling
    pub medium_max_ms: f64,
    /// Absolute time-to-band ceiling regardless of goal
    pub ttb_ceiling_ms: f64,
    pub release_medium_min_ms: f64,
    pub release_medium_max_ms: f64,
    pub release_slow_min_ms: f64,
    /// Overshoot allowed above the target (and above band_high for detection)
    pub overshoot_pct: f64,
    /// Dip below target that counts as an early correction
    pub correction_pct: f64,
    /// Window after first band entry in which dips count as corrections
    pub correction_window_ms: f64,
    /// Upward step during release that counts as a bump
    pub release_bump_pct: f64,
    /// Floor applied to any non-zero hold requirement
    pub hold_min_ms: f64,
    /// Sliding window (ending at the last crossing) for oscillation counting
    pub oscillation_window_ms: f64,
    /// Crossings within the window that fail the rep
    pub oscillation_min_crossings: usize,
}

impl Default for DrillThresholds {
    fn default() -> Self {
        Self {
            fast_max_ms: 120.0,
            medium_max_ms: 250.0,
            ttb_ceiling_ms: 400.0,
            release_medium_min_ms: 300.0,
            release_medium_max_ms: 800.0,
            release_slow_min_ms: 800.0,
            overshoot_pct: 0.06,
            correction_pct: 0.06,
            correction_window_ms: 200.0,
            release_bump_pct: 0.05,
            hold_min_ms: 150.0,
            oscillation_window_ms: 500.0,
            oscillation_min_crossings: 3,
        }
    }
}

impl DrillThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("fast_max_ms", self.fast_max_ms),
            ("medium_max_ms", self.medium_max_ms),
            ("ttb_ceiling_ms", self.ttb_ceiling_ms),
            ("release_medium_min_ms", self.release_medium_min_ms),
            ("release_medium_max_ms", self.release_medium_max_ms),
            ("release_slow_min_ms", self.release_slow_min_ms),
            ("overshoot_pct", self.overshoot_pct),
            ("correction_pct", self.correction_pct),
            ("correction_window_ms", self.correction_window_ms),
            ("release_bump_pct", self.release_bump_pct),
            ("hold_min_ms", self.hold_min_ms),
            ("oscillation_window_ms", self.oscillation_window_ms),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        if self.oscillation_min_crossings == 0 {
            return Err(ConfigError::InvalidThreshold {
                field: "oscillation_min_crossings",
                value: 0.0,
            });
        }
        // Reversed windows would fail every rep aimed at them
        if self.fast_max_ms > self.medium_max_ms {
            return Err(ConfigError::InvalidThreshold {
                field: "fast_max_ms",
                value: self.fast_max_ms,
            });
        }
        if self.release_medium_min_ms > self.release_medium_max_ms {
            return Err(ConfigError::InvalidThreshold {
                field: "release_medium_min_ms",
                value: self.release_medium_min_ms,
            });
        }
        Ok(())
    }
}

/// Immutable per-session drill configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// Target pedal position in percent (10..=99)
    pub target_pct: u8,
    pub application_goal: ApplicationGoal,
    pub release_goal: ReleaseGoal,
    /// Half-width of the on-target band
    pub band_tolerance: f64,
    /// Minimum in-band hold, 0 disables the check
    pub hold_required_ms: u32,
    /// Tolerance for holding drills (carried for hosts, not used by grading)
    pub hold_tolerance: f64,
    /// Position at which a rep starts (and below which it may end)
    pub onset_threshold: f64,
    /// How long the pedal must stay below onset before the rep closes
    pub end_hysteresis_ms: f64,
    pub thresholds: DrillThresholds,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            target_pct: 80,
            application_goal: ApplicationGoal::Fast,
            release_goal: ReleaseGoal::Medium,
            band_tolerance: 0.04,
            hold_required_ms: 0,
            hold_tolerance: 0.03,
            onset_threshold: 0.03,
            end_hysteresis_ms: 200.0,
            thresholds: DrillThresholds::default(),
        }
    }
}

impl DrillConfig {
    /// Config with the given target and goals, defaults elsewhere
    pub fn new(target_pct: u8, application_goal: ApplicationGoal, release_goal: ReleaseGoal) -> Self {
        Self {
            target_pct,
            application_goal,
            release_goal,
            ..Self::default()
        }
    }

    pub fn with_band_tolerance(mut self, band_tolerance: f64) -> Self {
        self.band_tolerance = band_tolerance;
        self
    }

    pub fn with_hold_required_ms(mut self, hold_required_ms: u32) -> Self {
        self.hold_required_ms = hold_required_ms;
        self
    }

    /// Validate ranges
    ///
    /// # Validation Rules
    /// * `target_pct` within 10..=99
    /// * tolerances finite and >= 0
    /// * `onset_threshold` within (0, 1]
    /// * `end_hysteresis_ms` and every threshold finite and >= 0
    /// * `fast_max_ms <= medium_max_ms` and `release_medium_min_ms <= release_medium_max_ms`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=99).contains(&self.target_pct) {
            return Err(ConfigError::TargetOutOfRange {
                target_pct: self.target_pct,
            });
        }
        for (field, value) in [
            ("band_tolerance", self.band_tolerance),
            ("hold_tolerance", self.hold_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { field, value });
            }
        }
        if !self.onset_threshold.is_finite()
            || self.onset_threshold <= 0.0
            || self.onset_threshold > 1.0
        {
            return Err(ConfigError::InvalidThreshold {
                field: "onset_threshold",
                value: self.onset_threshold,
            });
        }
        if !self.end_hysteresis_ms.is_finite() || self.end_hysteresis_ms < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                field: "end_hysteresis_ms",
                value: self.end_hysteresis_ms,
            });
        }
        self.thresholds.validate()
    }

    /// Target position on the unit interval
    pub fn target(&self) -> f64 {
        f64::from(self.target_pct) / 100.0
    }

    pub fn band_low(&self) -> f64 {
        (self.target() - self.band_tolerance).max(0.0)
    }

    pub fn band_high(&self) -> f64 {
        (self.target() + self.band_tolerance).min(1.0)
    }

    pub fn in_band(&self, value: f64) -> bool {
        self.band_low() <= value && value <= self.band_high()
    }

    /// Effective hold requirement, `None` when holding is not drilled
    pub fn required_hold_ms(&self) -> Option<f64> {
        (self.hold_required_ms > 0)
            .then(|| f64::from(self.hold_required_ms).max(self.thresholds.hold_min_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drills::DrillEngine;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = DrillConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.target_pct, 80);
        assert_eq!(cfg.application_goal, ApplicationGoal::Fast);
        assert_eq!(cfg.release_goal, ReleaseGoal::Medium);
    }

    #[test]
    fn test_band_edges() {
        let cfg = DrillConfig::default();
        assert!((cfg.band_low() - 0.76).abs() < 1e-12);
        assert!((cfg.band_high() - 0.84).abs() < 1e-12);
        assert!(cfg.in_band(0.8));
        assert!(!cfg.in_band(0.7));
    }

    #[test]
    fn test_band_is_clamped_to_unit_interval() {
        let cfg = DrillConfig::new(99, ApplicationGoal::Any, ReleaseGoal::Any)
            .with_band_tolerance(0.05);
        assert_eq!(cfg.band_high(), 1.0);
        let cfg = DrillConfig::new(10, ApplicationGoal::Any, ReleaseGoal::Any)
            .with_band_tolerance(0.2);
        assert_eq!(cfg.band_low(), 0.0);
    }

    #[test]
    fn test_target_out_of_range_rejected() {
        for target in [0u8, 9, 100, 255] {
            let cfg = DrillConfig::new(target, ApplicationGoal::Fast, ReleaseGoal::Medium);
            assert_eq!(
                cfg.validate(),
                Err(ConfigError::TargetOutOfRange { target_pct: target })
            );
        }
        for target in [10u8, 50, 99] {
            let cfg = DrillConfig::new(target, ApplicationGoal::Fast, ReleaseGoal::Medium);
            assert!(cfg.validate().is_ok());
        }
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let cfg = DrillConfig::default().with_band_tolerance(-0.01);
        match cfg.validate() {
            Err(ConfigError::InvalidTolerance { field, .. }) => assert_eq!(field, "band_tolerance"),
            other => panic!("Expected InvalidTolerance, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_thresholds_rejected() {
        let cfg = DrillConfig {
            onset_threshold: 0.0,
            ..DrillConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = DrillConfig::default();
        cfg.thresholds.oscillation_window_ms = f64::NAN;
        match cfg.validate() {
            Err(ConfigError::InvalidThreshold { field, .. }) => {
                assert_eq!(field, "oscillation_window_ms")
            }
            other => panic!("Expected InvalidThreshold, got {:?}", other),
        }

        let mut cfg = DrillConfig::default();
        cfg.thresholds.fast_max_ms = 300.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidThreshold {
                field: "fast_max_ms",
                value: 300.0
            })
        );

        let mut cfg = DrillConfig::default();
        cfg.thresholds.release_medium_min_ms = 900.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidThreshold {
                field: "release_medium_min_ms",
                value: 900.0
            })
        );
        assert!(DrillEngine::new(cfg).is_err());

        // Equal edges are a degenerate but valid window
        let mut cfg = DrillConfig::default();
        cfg.thresholds.fast_max_ms = cfg.thresholds.medium_max_ms;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_required_hold_has_floor() {
        let cfg = DrillConfig::default();
        assert_eq!(cfg.required_hold_ms(), None);
        assert_eq!(cfg.clone().with_hold_required_ms(50).required_hold_ms(), Some(150.0));
        assert_eq!(
            cfg.with_hold_required_ms(10_000).required_hold_ms(),
            Some(10_000.0)
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = DrillConfig::new(60, ApplicationGoal::Medium, ReleaseGoal::Slow);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"medium\""));
        let parsed: DrillConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: DrillConfig =
            serde_json::from_str(r#"{ "target_pct": 50, "release_goal": "slow" }"#).unwrap();
        assert_eq!(parsed.target_pct, 50);
        assert_eq!(parsed.release_goal, ReleaseGoal::Slow);
        assert_eq!(parsed.application_goal, ApplicationGoal::Fast);
        assert_eq!(parsed.thresholds, DrillThresholds::default());
    }
}
