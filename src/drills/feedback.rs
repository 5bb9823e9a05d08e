// Feedback composer - turns a graded rep into coaching text
//
// Messages follow the order a driver works through a rep (application, band
// behaviour, release, hold), which differs from the grading checklist order.

use super::config::{ApplicationGoal, DrillConfig, ReleaseGoal};
use super::grading::{grade, RepFault};
use super::metrics::RepMetrics;

/// Text returned when a rep has no faults
pub const GOOD_REP: &str = "Good rep: matches the drill targets.";

/// Separator between individual messages
pub const SEPARATOR: &str = " · ";

/// Compose deterministic feedback for one rep
///
/// # Arguments
/// * `metrics` - Metrics of the completed rep
/// * `cfg` - Drill configuration the rep was graded against
///
/// # Returns
/// Messages joined with `" · "`, or [`GOOD_REP`] when nothing failed.
pub fn compose_feedback(metrics: &RepMetrics, cfg: &DrillConfig) -> String {
    let mut faults = grade(metrics, cfg).faults;
    faults.sort_by_key(feedback_rank);

    let messages: Vec<String> = faults
        .iter()
        .filter_map(|fault| fault_message(fault, cfg))
        .collect();

    if messages.is_empty() {
        GOOD_REP.to_string()
    } else {
        messages.join(SEPARATOR)
    }
}

fn feedback_rank(fault: &RepFault) -> u8 {
    match fault {
        RepFault::NeverReachedBand
        | RepFault::ApplicationOffGoal { .. }
        | RepFault::TimeToBandOverCeiling { .. } => 0,
        RepFault::Overshoot { .. } => 1,
        RepFault::EarlyCorrection => 2,
        RepFault::Oscillation { .. } => 3,
        RepFault::ReleaseNotMeasured | RepFault::ReleaseOffGoal { .. } => 4,
        RepFault::ReleaseBump => 5,
        RepFault::HoldTooShort { .. } => 6,
    }
}

fn fault_message(fault: &RepFault, cfg: &DrillConfig) -> Option<String> {
    let t = &cfg.thresholds;
    let text = match fault {
        RepFault::NeverReachedBand => format!(
            "Never reached the target band. Apply quicker to get there within {:.0} ms.",
            t.ttb_ceiling_ms
        ),
        RepFault::ApplicationOffGoal { ttb_ms, goal } => match goal {
            ApplicationGoal::Fast => format!(
                "Application too slow ({:.0} ms). Goal ≤ {:.0} ms. Push faster initially.",
                ttb_ms, t.fast_max_ms
            ),
            ApplicationGoal::Medium => format!(
                "Application off target ({:.0} ms). Aim for {:.0}–{:.0} ms.",
                ttb_ms, t.fast_max_ms, t.medium_max_ms
            ),
            // ANY never misses its goal, only the ceiling
            ApplicationGoal::Any => return None,
        },
        RepFault::TimeToBandOverCeiling { ttb_ms, ceiling_ms } => format!(
            "Took {:.0} ms to reach the band. Get there within {:.0} ms.",
            ttb_ms, ceiling_ms
        ),
        RepFault::Overshoot { overshoot_pct } => format!(
            "Overshoot +{:.0}%. Ease the initial stab and stop at target.",
            overshoot_pct
        ),
        RepFault::EarlyCorrection => {
            "Early correction detected. Commit to the first hit and avoid dropping below target."
                .to_string()
        }
        RepFault::Oscillation { .. } => {
            "Oscillation detected. Smooth the application and release.".to_string()
        }
        // Only occurs alongside NeverReachedBand, which already explains it
        RepFault::ReleaseNotMeasured => return None,
        RepFault::ReleaseOffGoal { release_ms, goal } => match goal {
            ReleaseGoal::Medium => format!(
                "Release {:.0} ms is off. Aim for {:.0}–{:.0} ms.",
                release_ms, t.release_medium_min_ms, t.release_medium_max_ms
            ),
            ReleaseGoal::Slow => format!(
                "Release {:.0} ms too fast. Aim ≥ {:.0} ms.",
                release_ms, t.release_slow_min_ms
            ),
            ReleaseGoal::Any => return None,
        },
        RepFault::ReleaseBump => {
            "Release bump detected. Avoid re-adding pressure on exit.".to_string()
        }
        RepFault::HoldTooShort {
            hold_ms,
            required_ms,
        } => format!(
            "Hold too short ({:.0} ms). Hold ≥ {:.0} ms inside the band.",
            hold_ms, required_ms
        ),
    };
    Some(text)
}
