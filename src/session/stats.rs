// Session statistics - running aggregates over completed reps

use serde::{Deserialize, Serialize};

use crate::drills::RepMetrics;

/// Aggregates shown to the driver and handed to the coach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub reps: u32,
    /// Mean time-to-band over reps that reached the band
    pub avg_ttb_ms: Option<f64>,
    /// Mean release over reps with a measured release
    pub avg_release_ms: Option<f64>,
    /// Reps with any overshoot above target
    pub overshoots: u32,
    pub early_corrections: u32,
    pub release_bumps: u32,
    /// Sum of per-rep oscillation counts
    pub oscillations: u64,
    #[serde(skip)]
    pub(crate) ttb_samples: u32,
    #[serde(skip)]
    pub(crate) release_samples: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one rep into the aggregates
    pub fn record(&mut self, metrics: &RepMetrics) {
        self.reps += 1;
        if let Some(ttb) = metrics.ttb_ms {
            self.avg_ttb_ms = Some(running_mean(self.avg_ttb_ms, self.ttb_samples, ttb));
            self.ttb_samples += 1;
        }
        if let Some(release) = metrics.release_ms {
            self.avg_release_ms = Some(running_mean(
                self.avg_release_ms,
                self.release_samples,
                release,
            ));
            self.release_samples += 1;
        }
        if metrics.overshoot_pct > 0.0 {
            self.overshoots += 1;
        }
        if metrics.early_correction {
            self.early_corrections += 1;
        }
        if metrics.release_bump {
            self.release_bumps += 1;
        }
        self.oscillations += metrics.oscillations as u64;
    }

    /// Compact one-line summary, e.g.
    /// `Reps: 3 · Avg TTB: 104 ms · Avg release: 512 ms · Overshoots: 1 · ...`
    pub fn summary_line(&self) -> String {
        let avg = |label: &str, value: Option<f64>| match value {
            Some(ms) => format!("{}: {:.0} ms", label, ms),
            None => format!("{}: n/a", label),
        };
        [
            format!("Reps: {}", self.reps),
            avg("Avg TTB", self.avg_ttb_ms),
            avg("Avg release", self.avg_release_ms),
            format!("Overshoots: {}", self.overshoots),
            format!("Early corrections: {}", self.early_corrections),
            format!("Oscillations: {}", self.oscillations),
            format!("Release bumps: {}", self.release_bumps),
        ]
        .join(" · ")
    }
}

fn running_mean(mean: Option<f64>, count: u32, value: f64) -> f64 {
    match mean {
        Some(mean) => mean + (value - mean) / f64::from(count + 1),
        None => value,
    }
}
