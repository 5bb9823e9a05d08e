// Pedal Trainer Core - brake and throttle drill grading
// Normalizes raw pedal axes, smooths them, and grades repeated brake
// applications against a target band with per-rep feedback.

// Module declarations
pub mod config;
pub mod drills;
pub mod error;
pub mod fixtures;
pub mod session;
pub mod signal;
pub mod testing;

// Re-exports for convenience
pub use config::AppConfig;
pub use drills::{
    compose_feedback, ApplicationGoal, DrillConfig, DrillEngine, ReleaseGoal, RepEvent,
    RepFault, RepMetrics, RepVerdict,
};
pub use error::{ConfigError, ErrorCode, TraceError};
pub use session::{SessionStats, SessionSummary, StreakTracker};
pub use signal::{normalize, AxisName, AxisSource, NormalizationConfig, PedalPipeline, Smoother};

use std::sync::Once;

static LOGGING: Once = Once::new();

/// Install a `tracing` subscriber writing to stderr
///
/// Safe to call more than once; only the first call takes effect. Library
/// `log` records are bridged through the same subscriber.
pub fn init_logging(verbose: bool) {
    LOGGING.call_once(|| {
        let level = if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        let result = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        if let Err(err) = result {
            eprintln!("Logging already initialized: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }

    #[test]
    fn test_end_to_end_brake_channel() {
        let mut engine = DrillEngine::new(DrillConfig::default()).unwrap();
        let mut tracker = StreakTracker::new(1).unwrap();
        let samples = testing::TraceBuilder::new(10.0)
            .push(0.0, 0.03)
            .ramp_to(90.0, 0.70)
            .push(100.0, 0.8)
            .hold(300.0, 0.8)
            .ramp_to(800.0, 0.0)
            .hold(1100.0, 0.0)
            .finish();
        for (t, b) in samples {
            for event in engine.update(t, b) {
                tracker.note_rep(event.metrics.end_ms, event.passed);
            }
        }
        assert!(tracker.complete());
    }
}
