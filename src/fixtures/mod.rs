//! Fixture utilities for the deterministic replay harness.
//!
//! This module discovers trace fixtures on disk, loads recorded or synthetic
//! brake traces, parses optional expectation JSON, and replays traces through
//! a fresh `DrillEngine` plus session bookkeeping. It backs the `pedal_cli`
//! binary and the integration tests.
//!
//! Fixture layout under the root directory:
//! - `<name>.json` is the trace: `{ "name", "drill"?, "samples"?, "synthetic"? }`
//! - `<name>.expect.json` is optional: `{ "fixture", "reps": [{ "passed", "faults"? }] }`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::drills::{compose_feedback, DrillConfig, DrillEngine, RepEvent};
use crate::error::{log_trace_error, ConfigError, TraceError};
use crate::session::{local_advice, SessionStats, SessionSummary, StreakTracker};
use crate::testing::SyntheticTrace;

/// Default location for fixture JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const EXPECT_SUFFIX: &str = ".expect.json";

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub trace_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// On-disk trace schema. Recorded `samples` win over a `synthetic` spec.
#[derive(Debug, Clone, Deserialize)]
struct TraceFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    drill: Option<DrillConfig>,
    #[serde(default)]
    samples: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    synthetic: Option<SyntheticTrace>,
}

/// Loaded fixture with its brake samples resolved.
#[derive(Debug, Clone)]
pub struct TraceFixture {
    pub metadata: FixtureMetadata,
    pub drill: DrillConfig,
    /// `(t_ms, brake)` pairs with non-decreasing timestamps
    pub samples: Vec<(f64, f64)>,
    pub expectations: Option<FixtureExpectations>,
}

/// One graded rep in a replay report.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayedRep {
    pub rep_no: u32,
    pub headline: String,
    pub feedback: String,
    #[serde(flatten)]
    pub event: RepEvent,
}

/// Result of replaying one fixture through a fresh engine.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub fixture: String,
    pub sample_count: usize,
    pub rep_count: usize,
    pub reps: Vec<ReplayedRep>,
    pub summary: SessionSummary,
    pub stats: SessionStats,
    pub stats_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

impl ReplayReport {
    pub fn events(&self) -> Vec<RepEvent> {
        self.reps.iter().map(|rep| rep.event.clone()).collect()
    }
}

impl TraceFixture {
    /// Replay the trace from cold state.
    ///
    /// Each call builds its own engine and tracker, so replaying the same
    /// fixture twice yields identical reports.
    pub fn replay(&self, streak_goal: u32) -> std::result::Result<ReplayReport, ConfigError> {
        let mut engine = DrillEngine::new(self.drill.clone())?;
        let mut streak = StreakTracker::new(streak_goal)?;
        let mut stats = SessionStats::new();
        let mut reps = Vec::new();

        for &(t_ms, value) in &self.samples {
            for event in engine.update(t_ms, value) {
                streak.note_rep(event.metrics.end_ms, event.passed);
                stats.record(&event.metrics);
                let rep_no = streak.total_reps();
                reps.push(ReplayedRep {
                    rep_no,
                    headline: event.headline(rep_no),
                    feedback: compose_feedback(&event.metrics, &self.drill),
                    event,
                });
            }
        }

        tracing::info!(
            "[Fixtures] Replayed {}: {} samples, {} reps, best streak {}",
            self.metadata.name,
            self.samples.len(),
            reps.len(),
            streak.best()
        );

        Ok(ReplayReport {
            fixture: self.metadata.name.clone(),
            sample_count: self.samples.len(),
            rep_count: reps.len(),
            reps,
            summary: streak.summary(),
            stats_line: stats.summary_line(),
            advice: local_advice(&stats, &self.drill),
            stats,
        })
    }
}

/// JSON expectation schema for fixture verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub reps: Vec<ExpectedRep>,
}

/// Expected outcome of one rep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedRep {
    pub passed: bool,
    /// Fault codes in grading order; unchecked when absent
    #[serde(default)]
    pub faults: Option<Vec<String>>,
}

/// Actual outcome of one rep as compared against expectations.
#[derive(Debug, Clone, Serialize)]
pub struct ActualRep {
    pub passed: bool,
    pub faults: Vec<String>,
}

impl From<&RepEvent> for ActualRep {
    fn from(event: &RepEvent) -> Self {
        Self {
            passed: event.passed,
            faults: event
                .verdict
                .codes()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl FixtureExpectations {
    pub fn verify(&self, actual: &[RepEvent]) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        for (idx, expected) in self.reps.iter().enumerate() {
            match actual.get(idx) {
                Some(event) => {
                    let got = ActualRep::from(event);
                    let faults_match = expected
                        .faults
                        .as_ref()
                        .map_or(true, |faults| *faults == got.faults);
                    if got.passed != expected.passed || !faults_match {
                        failures.push(ExpectationFailure {
                            index: idx,
                            expected: Some(expected.clone()),
                            actual: Some(got),
                        });
                    }
                }
                None => failures.push(ExpectationFailure {
                    index: idx,
                    expected: Some(expected.clone()),
                    actual: None,
                }),
            }
        }

        for (idx, event) in actual.iter().enumerate().skip(self.reps.len()) {
            failures.push(ExpectationFailure {
                index: idx,
                expected: None,
                actual: Some(ActualRep::from(event)),
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing actual reps with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "index": failure.index,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single rep.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub index: usize,
    /// `None` when the engine produced more reps than expected
    pub expected: Option<ExpectedRep>,
    /// `None` when the engine produced fewer reps than expected
    pub actual: Option<ActualRep>,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_trace = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".json") && !name.ends_with(EXPECT_SUFFIX));
            if is_trace {
                fixtures.push(self.metadata_for_path(&path)?);
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load a trace and its expectations by fixture name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<TraceFixture> {
        let trace_path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&trace_path)?;

        let json = fs::read_to_string(&trace_path)
            .with_context(|| format!("reading fixture {}", trace_path.display()))?;
        let file: TraceFile = serde_json::from_str(&json).map_err(|err| {
            let err = TraceError::Parse {
                fixture: metadata.name.clone(),
                reason: err.to_string(),
            };
            log_trace_error(&err, "FixtureCatalog::load");
            err
        })?;

        let samples = resolve_samples(&metadata.name, &file)?;
        let drill = file.drill.unwrap_or_default();

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        let metadata = FixtureMetadata {
            name: file.name.unwrap_or(metadata.name),
            ..metadata
        };

        Ok(TraceFixture {
            metadata,
            drill,
            samples,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.json"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            let err = TraceError::NotFound {
                fixture: fixture.to_string(),
            };
            log_trace_error(&err, "FixtureCatalog::resolve_fixture_path");
            Err(err).with_context(|| format!("searching {}", self.root.display()))
        }
    }

    fn metadata_for_path(&self, trace_path: &Path) -> Result<FixtureMetadata> {
        let file_name = trace_path
            .file_name()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Invalid fixture name for {}", trace_path.display()))?;
        let name = file_name.trim_end_matches(".json").to_string();
        let expect_path = trace_path.with_file_name(format!("{name}{EXPECT_SUFFIX}"));
        Ok(FixtureMetadata {
            name,
            trace_path: trace_path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

fn resolve_samples(name: &str, file: &TraceFile) -> std::result::Result<Vec<(f64, f64)>, TraceError> {
    let samples = match (&file.samples, &file.synthetic) {
        (Some(samples), _) => samples.clone(),
        (None, Some(synthetic)) => {
            if let Err(reason) = synthetic.sample_bound() {
                let err = TraceError::Parse {
                    fixture: name.to_string(),
                    reason,
                };
                log_trace_error(&err, "FixtureCatalog::load");
                return Err(err);
            }
            synthetic.generate()
        }
        (None, None) => Vec::new(),
    };
    validate_samples(name, &samples).map_err(|err| {
        log_trace_error(&err, "FixtureCatalog::load");
        err
    })?;
    Ok(samples)
}

/// Reject traces the engine cannot replay meaningfully.
///
/// Timestamps must be finite and non-decreasing; values only need to be finite.
pub fn validate_samples(name: &str, samples: &[(f64, f64)]) -> std::result::Result<(), TraceError> {
    if samples.is_empty() {
        return Err(TraceError::Empty {
            fixture: name.to_string(),
        });
    }

    let mut prev = f64::NEG_INFINITY;
    for (index, &(t_ms, value)) in samples.iter().enumerate() {
        if !t_ms.is_finite() || !value.is_finite() {
            return Err(TraceError::Parse {
                fixture: name.to_string(),
                reason: format!("non-finite sample at index {index}"),
            });
        }
        if t_ms < prev {
            return Err(TraceError::NonMonotonic {
                fixture: name.to_string(),
                index,
            });
        }
        prev = t_ms;
    }
    Ok(())
}
