// Per-rep metrics and the rep_complete event
//
// Metrics are computed once when a rep finalizes and never mutated after.
// Timing fields that could not be measured are `None` rather than sentinels.

use serde::{Deserialize, Serialize};

use super::grading::RepVerdict;

/// Quantitative description of one completed rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMetrics {
    /// Stream time at which the pedal crossed the onset threshold
    pub onset_ms: f64,
    /// Stream time of the sample that closed the rep
    pub end_ms: f64,
    /// Onset to first in-band sample, `None` if the band was never reached
    pub ttb_ms: Option<f64>,
    /// Highest position seen during the rep, in percent
    pub peak_pct: f64,
    /// `max(0, peak - target)`, in percent
    pub overshoot_pct: f64,
    /// Dipped below target shortly after first entering the band
    pub early_correction: bool,
    /// Band crossings within the oscillation window ending at the last crossing
    pub oscillations: usize,
    /// Last in-band sample to dropping below onset, `None` if never in band
    pub release_ms: Option<f64>,
    /// Pressure was re-added while releasing
    pub release_bump: bool,
    /// First to last in-band sample
    pub hold_ms: f64,
}

impl RepMetrics {
    pub fn reached_band(&self) -> bool {
        self.ttb_ms.is_some()
    }
}

/// Emitted by the drill engine for each completed rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    pub metrics: RepMetrics,
    pub verdict: RepVerdict,
    pub passed: bool,
}

impl RepEvent {
    pub fn new(metrics: RepMetrics, verdict: RepVerdict) -> Self {
        let passed = verdict.passed();
        Self {
            metrics,
            verdict,
            passed,
        }
    }

    /// One-line rep summary, e.g. `Rep 3: PASS · TTB 98 ms · Rel 470 ms`
    pub fn headline(&self, rep_no: u32) -> String {
        format!(
            "Rep {}: {} · TTB {} · Rel {}",
            rep_no,
            if self.passed { "PASS" } else { "FAIL" },
            format_ms(self.metrics.ttb_ms),
            format_ms(self.metrics.release_ms)
        )
    }
}

fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.0} ms", ms),
        None => "n/a".to_string(),
    }
}
