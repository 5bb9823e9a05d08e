// Pass/fail policy for completed reps
//
// Grading is a conjunction of independent checks. Instead of a bare boolean
// the grader returns every failing check as a tagged RepFault, in policy order,
// so feedback can be composed with an exhaustive match.

use serde::{Deserialize, Serialize};

use super::config::{ApplicationGoal, DrillConfig, ReleaseGoal};
use super::metrics::RepMetrics;

/// One failed grading check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fault", rename_all = "snake_case")]
pub enum RepFault {
    /// The band was never entered
    NeverReachedBand,
    /// Time-to-band missed the application goal window
    ApplicationOffGoal { ttb_ms: f64, goal: ApplicationGoal },
    /// Goal satisfied (or ANY) but the absolute ceiling was exceeded
    TimeToBandOverCeiling { ttb_ms: f64, ceiling_ms: f64 },
    Overshoot { overshoot_pct: f64 },
    EarlyCorrection,
    HoldTooShort { hold_ms: f64, required_ms: f64 },
    /// No release duration could be measured
    ReleaseNotMeasured,
    ReleaseOffGoal { release_ms: f64, goal: ReleaseGoal },
    ReleaseBump,
    Oscillation { crossings: usize },
}

impl RepFault {
    /// Short stable identifier used in fixture expectations and logs
    pub fn code(&self) -> &'static str {
        match self {
            RepFault::NeverReachedBand => "never_reached_band",
            RepFault::ApplicationOffGoal { .. } => "application_off_goal",
            RepFault::TimeToBandOverCeiling { .. } => "time_to_band_over_ceiling",
            RepFault::Overshoot { .. } => "overshoot",
            RepFault::EarlyCorrection => "early_correction",
            RepFault::HoldTooShort { .. } => "hold_too_short",
            RepFault::ReleaseNotMeasured => "release_not_measured",
            RepFault::ReleaseOffGoal { .. } => "release_off_goal",
            RepFault::ReleaseBump => "release_bump",
            RepFault::Oscillation { .. } => "oscillation",
        }
    }
}

/// Outcome of grading one rep; passes when no fault was found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepVerdict {
    pub faults: Vec<RepFault>,
}

impl RepVerdict {
    pub fn passed(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn has(&self, code: &str) -> bool {
        self.faults.iter().any(|fault| fault.code() == code)
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.faults.iter().map(RepFault::code).collect()
    }
}

/// Whether `ttb_ms` satisfies the configured application goal
pub fn application_goal_met(cfg: &DrillConfig, ttb_ms: f64) -> bool {
    let t = &cfg.thresholds;
    match cfg.application_goal {
        ApplicationGoal::Fast => ttb_ms <= t.fast_max_ms,
        ApplicationGoal::Medium => t.fast_max_ms < ttb_ms && ttb_ms <= t.medium_max_ms,
        ApplicationGoal::Any => true,
    }
}

/// Whether `release_ms` satisfies the configured release goal
pub fn release_goal_met(cfg: &DrillConfig, release_ms: f64) -> bool {
    let t = &cfg.thresholds;
    match cfg.release_goal {
        ReleaseGoal::Medium => {
            t.release_medium_min_ms <= release_ms && release_ms <= t.release_medium_max_ms
        }
        ReleaseGoal::Slow => release_ms >= t.release_slow_min_ms,
        ReleaseGoal::Any => true,
    }
}

/// Apply the pass/fail policy to one rep's metrics
pub fn grade(metrics: &RepMetrics, cfg: &DrillConfig) -> RepVerdict {
    let t = &cfg.thresholds;
    let mut faults = Vec::new();

    match metrics.ttb_ms {
        None => faults.push(RepFault::NeverReachedBand),
        Some(ttb_ms) => {
            if !application_goal_met(cfg, ttb_ms) {
                faults.push(RepFault::ApplicationOffGoal {
                    ttb_ms,
                    goal: cfg.application_goal,
                });
            } else if ttb_ms > t.ttb_ceiling_ms {
                faults.push(RepFault::TimeToBandOverCeiling {
                    ttb_ms,
                    ceiling_ms: t.ttb_ceiling_ms,
                });
            }
        }
    }

    if metrics.overshoot_pct > t.overshoot_pct * 100.0 {
        faults.push(RepFault::Overshoot {
            overshoot_pct: metrics.overshoot_pct,
        });
    }

    if metrics.early_correction {
        faults.push(RepFault::EarlyCorrection);
    }

    if let Some(required_ms) = cfg.required_hold_ms() {
        if metrics.hold_ms < required_ms {
            faults.push(RepFault::HoldTooShort {
                hold_ms: metrics.hold_ms,
                required_ms,
            });
        }
    }

    match metrics.release_ms {
        None => faults.push(RepFault::ReleaseNotMeasured),
        Some(release_ms) => {
            if !release_goal_met(cfg, release_ms) {
                faults.push(RepFault::ReleaseOffGoal {
                    release_ms,
                    goal: cfg.release_goal,
                });
            }
        }
    }

    if metrics.release_bump {
        faults.push(RepFault::ReleaseBump);
    }

    if metrics.oscillations >= t.oscillation_min_crossings {
        faults.push(RepFault::Oscillation {
            crossings: metrics.oscillations,
        });
    }

    RepVerdict { faults }
}
