// Session module - state that spans many reps
//
// Streak counting, running statistics and the offline coach. Hosts feed every
// RepEvent into these after the engine emits it.

pub mod coach;
pub mod stats;
pub mod streak;

pub use coach::local_advice;
pub use stats::SessionStats;
pub use streak::{SessionSummary, StreakTracker, DEFAULT_STREAK_GOAL};
