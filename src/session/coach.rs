// Local coach - heuristic between-set advice from session statistics
//
// Works entirely offline. At most three tips are given, followed by a
// suggested next drill.

use super::stats::SessionStats;
use crate::drills::{DrillConfig, ReleaseGoal};

const MAX_TIPS: usize = 3;

/// Average time-to-band above which a quicker ramp is suggested
const SLOW_RAMP_MS: f64 = 200.0;

/// Advice text for the session so far, `None` before the first rep
pub fn local_advice(stats: &SessionStats, cfg: &DrillConfig) -> Option<String> {
    if stats.reps == 0 {
        return None;
    }

    let t = &cfg.thresholds;
    let mut tips = vec!["• Breathe, then commit to the first hit. No early dips.".to_string()];

    if stats.avg_ttb_ms.is_some_and(|ttb| ttb > SLOW_RAMP_MS) {
        tips.push("• Quicker initial ramp: squeeze to target in ≤150 ms.".to_string());
    }
    if stats.overshoots > 0 {
        tips.push("• Ease the stab: stop at the band, don't punch through.".to_string());
    }
    if stats.early_corrections > 0 {
        tips.push(format!(
            "• Hold pressure for {:.0} ms after entry to avoid corrections.",
            t.correction_window_ms
        ));
    }
    if let Some(release) = stats.avg_release_ms {
        match cfg.release_goal {
            ReleaseGoal::Medium
                if !(t.release_medium_min_ms..=t.release_medium_max_ms).contains(&release) =>
            {
                tips.push("• Aim to bleed off in ~500 ms for a medium release.".to_string());
            }
            ReleaseGoal::Slow if release < t.release_slow_min_ms => {
                tips.push("• Slow your release: count to roughly 0.8 to 1.0 s.".to_string());
            }
            _ => {}
        }
    }
    tips.truncate(MAX_TIPS);

    let next = match cfg.release_goal {
        ReleaseGoal::Slow => "• Next drill: 50% · MEDIUM to band · SLOW release · 10 clean reps",
        _ => "• Next drill: target 80% · FAST to band · MEDIUM release · 10 clean reps",
    };

    tracing::debug!("[Coach] {} tips for {} reps", tips.len(), stats.reps);
    Some(format!("Coach (local):\n{}\n{}", tips.join("\n"), next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drills::ApplicationGoal;

    fn stats() -> SessionStats {
        SessionStats {
            reps: 5,
            avg_ttb_ms: Some(110.0),
            avg_release_ms: Some(500.0),
            ..SessionStats::default()
        }
    }

    #[test]
    fn test_no_reps_no_advice() {
        assert_eq!(local_advice(&SessionStats::new(), &DrillConfig::default()), None);
    }

    #[test]
    fn test_clean_session_gets_commit_tip_only() {
        let text = local_advice(&stats(), &DrillConfig::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Coach (local):");
        assert!(lines[1].contains("commit to the first hit"));
        assert!(lines[2].starts_with("• Next drill: target 80%"));
    }

    #[test]
    fn test_tips_capped_at_three() {
        let s = SessionStats {
            avg_ttb_ms: Some(260.0),
            overshoots: 2,
            early_corrections: 1,
            avg_release_ms: Some(150.0),
            ..stats()
        };
        let text = local_advice(&s, &DrillConfig::default()).unwrap();
        let tips = text.lines().filter(|l| l.starts_with("• ") && !l.contains("Next drill")).count();
        assert_eq!(tips, MAX_TIPS);
        assert!(text.contains("Quicker initial ramp"));
        assert!(text.contains("Ease the stab"));
        assert!(!text.contains("Hold pressure"));
    }

    #[test]
    fn test_slow_release_goal_suggests_slow_drill() {
        let cfg = DrillConfig::new(50, ApplicationGoal::Medium, ReleaseGoal::Slow);
        let s = SessionStats {
            avg_release_ms: Some(600.0),
            ..stats()
        };
        let text = local_advice(&s, &cfg).unwrap();
        assert!(text.contains("Slow your release"));
        assert!(text.ends_with("• Next drill: 50% · MEDIUM to band · SLOW release · 10 clean reps"));
    }
}
