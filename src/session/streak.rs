// StreakTracker - consecutive-pass counting for a drill session

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of consecutive clean reps that completes a session
pub const DEFAULT_STREAK_GOAL: u32 = 10;

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reps: u32,
    pub best_streak: u32,
    /// Whether the best streak ever reached the goal
    pub completed_goal: bool,
    pub duration_ms: f64,
}

/// Tracks the current and best run of passing reps
#[derive(Debug, Clone, PartialEq)]
pub struct StreakTracker {
    goal: u32,
    current: u32,
    best: u32,
    total_reps: u32,
    start_ms: Option<f64>,
    end_ms: Option<f64>,
}

impl StreakTracker {
    /// Create a tracker; a goal of zero is rejected
    pub fn new(goal: u32) -> Result<Self, ConfigError> {
        if goal == 0 {
            return Err(ConfigError::InvalidGoal { goal });
        }
        Ok(Self {
            goal,
            current: 0,
            best: 0,
            total_reps: 0,
            start_ms: None,
            end_ms: None,
        })
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    /// Record one graded rep at stream time `t_ms`
    pub fn note_rep(&mut self, t_ms: f64, passed: bool) {
        if self.start_ms.is_none() {
            self.start_ms = Some(t_ms);
        }
        self.total_reps += 1;
        if passed {
            self.current += 1;
            self.best = self.best.max(self.current);
        } else {
            self.current = 0;
        }
        self.end_ms = Some(t_ms);
    }

    /// True while the current run is at or above the goal
    pub fn complete(&self) -> bool {
        self.current >= self.goal
    }

    pub fn summary(&self) -> SessionSummary {
        let duration_ms = match (self.start_ms, self.end_ms) {
            (Some(start), Some(end)) => (end - start).max(0.0),
            _ => 0.0,
        };
        SessionSummary {
            reps: self.total_reps,
            best_streak: self.best,
            completed_goal: self.best >= self.goal,
            duration_ms,
        }
    }
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self {
            goal: DEFAULT_STREAK_GOAL,
            current: 0,
            best: 0,
            total_reps: 0,
            start_ms: None,
            end_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_goal_rejected() {
        assert_eq!(
            StreakTracker::new(0),
            Err(ConfigError::InvalidGoal { goal: 0 })
        );
    }

    #[test]
    fn test_empty_summary() {
        let tracker = StreakTracker::new(3).unwrap();
        assert_eq!(
            tracker.summary(),
            SessionSummary {
                reps: 0,
                best_streak: 0,
                completed_goal: false,
                duration_ms: 0.0,
            }
        );
        assert!(!tracker.complete());
    }

    #[test]
    fn test_fail_resets_current_but_not_best() {
        let mut tracker = StreakTracker::new(3).unwrap();
        for (i, passed) in [true, true, false, true].into_iter().enumerate() {
            tracker.note_rep(1_000.0 + i as f64 * 1_000.0, passed);
        }
        assert_eq!(tracker.current(), 1);
        assert_eq!(tracker.best(), 2);
        assert!(!tracker.complete());

        let summary = tracker.summary();
        assert_eq!(summary.reps, 4);
        assert_eq!(summary.best_streak, 2);
        assert!(!summary.completed_goal);
        assert_eq!(summary.duration_ms, 3_000.0);
    }

    #[test]
    fn test_goal_completion() {
        let mut tracker = StreakTracker::new(2).unwrap();
        tracker.note_rep(0.0, true);
        assert!(!tracker.complete());
        tracker.note_rep(10.0, true);
        assert!(tracker.complete());
        tracker.note_rep(20.0, false);
        assert!(!tracker.complete());
        // Best streak already reached the goal
        assert!(tracker.summary().completed_goal);
    }

    #[test]
    fn test_best_equals_longest_pass_run() {
        let pattern = [
            true, false, true, true, true, false, true, true, false, false, true,
        ];
        let mut tracker = StreakTracker::default();
        let mut best_seen = 0;
        for (i, passed) in pattern.into_iter().enumerate() {
            tracker.note_rep(i as f64, passed);
            assert!(tracker.best() >= best_seen, "best streak went down");
            best_seen = tracker.best();
        }

        let longest = pattern
            .split(|p| !p)
            .map(|run| run.len() as u32)
            .max()
            .unwrap_or(0);
        assert_eq!(tracker.best(), longest);
        assert_eq!(tracker.goal(), DEFAULT_STREAK_GOAL);
    }

    #[test]
    fn test_duration_never_negative() {
        let mut tracker = StreakTracker::new(1).unwrap();
        tracker.note_rep(500.0, true);
        tracker.note_rep(100.0, true);
        assert_eq!(tracker.summary().duration_ms, 0.0);
    }
}
