// Drills module - rep detection, grading and feedback for pedal drills
//
// A DrillEngine consumes one channel's normalized (t_ms, value) stream and
// emits a RepEvent per completed rep. Grading and feedback are pure functions
// of the rep metrics and the drill configuration.

pub mod config;
pub mod engine;
pub mod feedback;
pub mod grading;
pub mod metrics;

pub use config::{ApplicationGoal, DrillConfig, DrillThresholds, ReleaseGoal};
pub use engine::{DrillEngine, RepPhase, RepState};
pub use feedback::compose_feedback;
pub use grading::{application_goal_met, grade, release_goal_met, RepFault, RepVerdict};
pub use metrics::{RepEvent, RepMetrics};
