// DrillEngine - per-channel rep detection and grading state machine
//
// Consumes a continuous (t_ms, value) stream with no frame boundaries and emits
// one RepEvent per completed application/release cycle.
//
// Phases: Idle → Apply → InBand → Release → (finalize) → Idle
//
// Cross-cutting per sample, in every phase:
// - band crossings (in-band flag flipped vs. the previous sample)
// - running peak and overshoot accumulator
//
// End of rep: once the value drops below the onset threshold an end candidate
// starts; it must persist for end_hysteresis_ms before the rep finalizes, and
// any sample back at or above onset cancels it.

use serde::{Deserialize, Serialize};

use super::config::DrillConfig;
use super::grading::grade;
use super::metrics::{RepEvent, RepMetrics};
use crate::error::ConfigError;

/// Phase of the live rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// Waiting for the pedal to cross the onset threshold
    #[default]
    Idle,
    /// Pressing towards the band
    Apply,
    /// Inside the target band
    InBand,
    /// Left the band, heading back below onset
    Release,
}

impl RepPhase {
    pub fn is_live(&self) -> bool {
        !matches!(self, RepPhase::Idle)
    }
}

/// Mutable bookkeeping for the rep in progress
///
/// Replaced wholesale with `RepState::default()` when a rep finalizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepState {
    pub phase: RepPhase,
    pub onset_t: Option<f64>,
    pub first_inband_t: Option<f64>,
    pub last_inband_t: Option<f64>,
    pub end_candidate_t: Option<f64>,
    pub peak: f64,
    /// Largest `value - target` seen while above `band_high + overshoot_pct`
    pub overshoot: f64,
    pub early_correction: bool,
    pub release_bump: bool,
    /// Timestamps at which the in-band flag flipped, oldest first
    pub crossings: Vec<f64>,
}

/// Grading engine for one pedal channel
#[derive(Debug, Clone)]
pub struct DrillEngine {
    cfg: DrillConfig,
    rep: RepState,
    /// Previous `(t_ms, value)` of the stream; survives rep boundaries
    last_sample: Option<(f64, f64)>,
    reps_completed: u64,
}

impl DrillEngine {
    /// Create an engine, rejecting invalid configuration up front
    pub fn new(cfg: DrillConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            rep: RepState::default(),
            last_sample: None,
            reps_completed: 0,
        })
    }

    pub fn config(&self) -> &DrillConfig {
        &self.cfg
    }

    pub fn phase(&self) -> RepPhase {
        self.rep.phase
    }

    pub fn rep_state(&self) -> &RepState {
        &self.rep
    }

    pub fn reps_completed(&self) -> u64 {
        self.reps_completed
    }

    /// Drop the live rep and stream history (e.g. after a device change)
    pub fn reset(&mut self) {
        self.rep = RepState::default();
        self.last_sample = None;
    }

    /// Feed one sample; returns the reps completed by it (zero or one)
    ///
    /// Values outside [0, 1] are graded as given. Timestamps are expected to be
    /// non-decreasing; the engine never fails on stream data.
    pub fn update(&mut self, t_ms: f64, value: f64) -> Vec<RepEvent> {
        let mut events = Vec::new();
        let band_low = self.cfg.band_low();
        let band_high = self.cfg.band_high();
        let target = self.cfg.target();
        let in_band = band_low <= value && value <= band_high;
        let prev_value = self.last_sample.map(|(_, v)| v);

        if let Some(prev) = prev_value {
            let was_in_band = band_low <= prev && prev <= band_high;
            if was_in_band != in_band {
                self.rep.crossings.push(t_ms);
            }
        }
        self.last_sample = Some((t_ms, value));

        if value > self.rep.peak {
            self.rep.peak = value;
        }
        if value > band_high + self.cfg.thresholds.overshoot_pct {
            self.rep.overshoot = self.rep.overshoot.max(value - target);
        }

        match self.rep.phase {
            RepPhase::Idle => {
                if value >= self.cfg.onset_threshold {
                    self.rep.phase = RepPhase::Apply;
                    self.rep.onset_t = Some(t_ms);
                    tracing::trace!("[DrillEngine] Onset at {:.1} ms", t_ms);
                }
            }
            RepPhase::Apply => {
                if in_band {
                    self.rep.phase = RepPhase::InBand;
                    self.rep.first_inband_t = Some(t_ms);
                    self.rep.last_inband_t = Some(t_ms);
                    tracing::trace!("[DrillEngine] Band entered at {:.1} ms", t_ms);
                }
            }
            RepPhase::InBand => {
                self.check_early_correction(t_ms, value);
                if in_band {
                    self.rep.last_inband_t = Some(t_ms);
                } else {
                    self.rep.phase = RepPhase::Release;
                    tracing::trace!("[DrillEngine] Band left at {:.1} ms", t_ms);
                }
            }
            RepPhase::Release => {
                if let Some(prev) = prev_value {
                    if value - prev >= self.cfg.thresholds.release_bump_pct {
                        self.rep.release_bump = true;
                    }
                }
            }
        }

        if self.rep.phase.is_live() {
            if value < self.cfg.onset_threshold {
                match self.rep.end_candidate_t {
                    None => self.rep.end_candidate_t = Some(t_ms),
                    Some(since) if t_ms - since >= self.cfg.end_hysteresis_ms => {
                        events.push(self.finalize(t_ms));
                    }
                    Some(_) => {}
                }
            } else {
                self.rep.end_candidate_t = None;
            }
        }

        events
    }

    /// Sticky dip check within the correction window after first band entry
    ///
    /// Only runs while InBand. A dip that leaves the band is still seen here,
    /// on the sample that moves the rep to Release.
    fn check_early_correction(&mut self, t_ms: f64, value: f64) {
        let Some(first) = self.rep.first_inband_t else {
            return;
        };
        let t = &self.cfg.thresholds;
        if t_ms - first <= t.correction_window_ms && value < self.cfg.target() - t.correction_pct {
            self.rep.early_correction = true;
        }
    }

    fn finalize(&mut self, t_ms: f64) -> RepEvent {
        let metrics = self.compute_metrics(t_ms);
        let verdict = grade(&metrics, &self.cfg);
        let event = RepEvent::new(metrics, verdict);
        self.reps_completed += 1;

        tracing::debug!(
            "[DrillEngine] Rep {} complete: passed={} ttb={:?} release={:?} peak={:.1}% overshoot_acc={:.3} faults={:?}",
            self.reps_completed,
            event.passed,
            event.metrics.ttb_ms,
            event.metrics.release_ms,
            event.metrics.peak_pct,
            self.rep.overshoot,
            event.verdict.codes()
        );

        self.rep = RepState::default();
        event
    }

    fn compute_metrics(&self, t_ms: f64) -> RepMetrics {
        let rep = &self.rep;
        let onset_ms = rep.onset_t.unwrap_or(t_ms);

        let ttb_ms = rep.first_inband_t.map(|first| (first - onset_ms).max(0.0));
        let release_ms = match (rep.last_inband_t, rep.end_candidate_t) {
            (Some(last), Some(end)) => Some((end - last).max(0.0)),
            _ => None,
        };
        let hold_ms = match (rep.first_inband_t, rep.last_inband_t) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        };

        let oscillations = match rep.crossings.last() {
            Some(&last) => {
                let window_start = last - self.cfg.thresholds.oscillation_window_ms;
                rep.crossings.iter().filter(|&&t| t >= window_start).count()
            }
            None => 0,
        };

        RepMetrics {
            onset_ms,
            end_ms: t_ms,
            ttb_ms,
            peak_pct: rep.peak * 100.0,
            overshoot_pct: (rep.peak - self.cfg.target()).max(0.0) * 100.0,
            early_correction: rep.early_correction,
            oscillations,
            release_ms,
            release_bump: rep.release_bump,
            hold_ms,
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
