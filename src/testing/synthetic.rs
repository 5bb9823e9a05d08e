//! Deterministic synthetic pedal traces.
//!
//! Builds `(t_ms, value)` streams that look like real reps (press, hold,
//! release, rest) so the drill engine can be exercised without hardware.
//! Optional timestamp jitter comes from a seeded RNG, so a given spec always
//! produces the same trace.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default seed used when a jitter spec omits one.
const DEFAULT_JITTER_SEED: u64 = 0x5A5A_FFF0;

/// Largest trace a synthetic spec may render.
pub const MAX_SYNTHETIC_SAMPLES: usize = 1_000_000;

/// Incremental builder for a sampled trace.
///
/// Every segment starts one step after the current cursor and always ends with a
/// sample exactly at its end time.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    samples: Vec<(f64, f64)>,
    step_ms: f64,
}

impl TraceBuilder {
    pub fn new(step_ms: f64) -> Self {
        Self {
            samples: Vec::new(),
            step_ms: step_ms.max(1e-3),
        }
    }

    /// Timestamp of the last sample (0 for an empty trace).
    pub fn now(&self) -> f64 {
        self.samples.last().map(|&(t, _)| t).unwrap_or(0.0)
    }

    /// Value of the last sample (0 for an empty trace).
    pub fn value(&self) -> f64 {
        self.samples.last().map(|&(_, v)| v).unwrap_or(0.0)
    }

    /// Append one sample at an absolute time.
    pub fn push(mut self, t_ms: f64, value: f64) -> Self {
        self.samples.push((t_ms, value));
        self
    }

    /// Linear segment from the last sample to `(end_ms, end_value)`.
    pub fn ramp_to(mut self, end_ms: f64, end_value: f64) -> Self {
        let start_ms = self.now();
        let start_value = self.value();
        let span = end_ms - start_ms;
        if span <= 0.0 {
            return self.push(end_ms, end_value);
        }
        let steps = (span / self.step_ms).ceil() as usize;
        for k in 1..=steps {
            let t = (start_ms + k as f64 * self.step_ms).min(end_ms);
            let frac = (t - start_ms) / span;
            self.samples
                .push((t, start_value + (end_value - start_value) * frac));
        }
        self
    }

    /// Constant segment up to and including `end_ms`.
    pub fn hold(mut self, end_ms: f64, value: f64) -> Self {
        let start_ms = self.now();
        let mut k = 1usize;
        loop {
            let t = (start_ms + k as f64 * self.step_ms).min(end_ms);
            if t <= start_ms {
                break;
            }
            self.samples.push((t, value));
            if t >= end_ms {
                break;
            }
            k += 1;
        }
        self
    }

    pub fn finish(self) -> Vec<(f64, f64)> {
        self.samples
    }
}

/// Shape of one synthetic rep, in milliseconds relative to its onset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticRep {
    /// Press duration from onset to `peak`
    pub reach_ms: f64,
    /// Position held after the press (unit interval)
    pub peak: f64,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: f64,
    /// Linear release from `peak` to 0
    #[serde(default = "default_release_ms")]
    pub release_ms: f64,
    /// Time spent at rest after the release
    #[serde(default = "default_rest_ms")]
    pub rest_ms: f64,
}

fn default_hold_ms() -> f64 {
    200.0
}

fn default_release_ms() -> f64 {
    500.0
}

fn default_rest_ms() -> f64 {
    400.0
}

/// Seeded timestamp jitter, each sample shifted by `[0, max_ms)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitterSpec {
    pub max_ms: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_JITTER_SEED
}

/// A sequence of synthetic reps sampled at a fixed nominal cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticTrace {
    #[serde(default = "default_step_ms")]
    pub step_ms: f64,
    /// Value written at each rep onset (must reach the onset threshold)
    #[serde(default = "default_onset_value")]
    pub onset_value: f64,
    #[serde(default = "default_lead_in_ms")]
    pub lead_in_ms: f64,
    pub reps: Vec<SyntheticRep>,
    #[serde(default)]
    pub jitter: Option<JitterSpec>,
}

fn default_step_ms() -> f64 {
    10.0
}

fn default_onset_value() -> f64 {
    0.05
}

fn default_lead_in_ms() -> f64 {
    200.0
}

impl SyntheticTrace {
    /// Upper bound on the samples `generate` will produce.
    ///
    /// Fails on non-finite or negative durations and on traces larger than
    /// [`MAX_SYNTHETIC_SAMPLES`], so fixture files cannot force an unbounded
    /// allocation.
    pub fn sample_bound(&self) -> Result<usize, String> {
        let step_ms = self.step_ms.max(1e-3);
        if !step_ms.is_finite() {
            return Err(format!("invalid step_ms {}", self.step_ms));
        }
        let mut total_ms = self.lead_in_ms;
        for (index, rep) in self.reps.iter().enumerate() {
            for (field, value) in [
                ("reach_ms", rep.reach_ms),
                ("hold_ms", rep.hold_ms),
                ("release_ms", rep.release_ms),
                ("rest_ms", rep.rest_ms),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("rep {index}: invalid {field} {value}"));
                }
            }
            total_ms += step_ms + rep.reach_ms + rep.hold_ms + rep.release_ms + rep.rest_ms;
        }
        if !total_ms.is_finite() || total_ms < 0.0 {
            return Err(format!("invalid lead_in_ms {}", self.lead_in_ms));
        }

        // One sample per step plus the off-grid segment ends
        let bound = total_ms / step_ms + 6.0 * self.reps.len() as f64 + 2.0;
        if bound > MAX_SYNTHETIC_SAMPLES as f64 {
            return Err(format!(
                "synthetic trace needs ~{bound:.0} samples, limit is {MAX_SYNTHETIC_SAMPLES}"
            ));
        }
        Ok(bound as usize)
    }

    /// Render the trace into samples.
    pub fn generate(&self) -> Vec<(f64, f64)> {
        let mut builder = TraceBuilder::new(self.step_ms)
            .push(0.0, 0.0)
            .hold(self.lead_in_ms, 0.0);

        for rep in &self.reps {
            let onset = builder.now() + self.step_ms;
            builder = builder
                .push(onset, self.onset_value)
                .ramp_to(onset + rep.reach_ms, rep.peak)
                .hold(onset + rep.reach_ms + rep.hold_ms, rep.peak)
                .ramp_to(onset + rep.reach_ms + rep.hold_ms + rep.release_ms, 0.0);
            let rest_end = builder.now() + rep.rest_ms;
            builder = builder.hold(rest_end, 0.0);
        }

        let mut samples = builder.finish();
        if let Some(jitter) = &self.jitter {
            apply_jitter(&mut samples, jitter, self.step_ms);
        }
        samples
    }
}

/// Shift timestamps forward by a seeded offset of at most half a step.
///
/// Output stays non-decreasing even where segments end off the step grid.
fn apply_jitter(samples: &mut [(f64, f64)], jitter: &JitterSpec, step_ms: f64) {
    let max_ms = jitter.max_ms.min(step_ms * 0.5);
    if max_ms <= 0.0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(jitter.seed);
    let mut prev = f64::NEG_INFINITY;
    for sample in samples.iter_mut() {
        sample.0 = (sample.0 + rng.gen_range(0.0..max_ms)).max(prev);
        prev = sample.0;
    }
}
