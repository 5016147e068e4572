//! Gamification scoring (spec.md §4.7). Deterministic given the produced
//! block list, the day's placement facts, and whatever the storage layer
//! hands back about the user's previous plan.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{Block, GamificationSnapshot, Level, Profile};

use crate::scheduler::PlacementFacts;

/// What the facade reads back from storage about the user's most recent
/// prior plan, needed to compute the streak (spec.md §4.7).
#[derive(Debug, Clone, Copy)]
pub struct PriorPlanState {
    pub had_deep_work: bool,
    pub created_on: NaiveDate,
    pub streak: u32,
}

fn has_deep_diver_pattern(blocks: &[Block], threshold: f64) -> bool {
    let mut needed = ['D', 'B', 'D', 'B', 'D'].iter();
    let mut want = needed.next();
    for block in blocks {
        let tag = if block.is_break {
            'B'
        } else if block.cognitive_load >= threshold {
            'D'
        } else {
            'L'
        };
        if let Some(&w) = want {
            if tag == w {
                want = needed.next();
            }
        }
        if want.is_none() {
            return true;
        }
    }
    want.is_none()
}

/// Compute the updated gamification snapshot for one produced plan.
pub fn derive_gamification(
    blocks: &[Block],
    facts: &PlacementFacts,
    config: &EngineConfig,
    profile: &Profile,
    prior: Option<PriorPlanState>,
    prior_xp: i64,
    today: NaiveDate,
) -> GamificationSnapshot {
    let task_blocks = blocks.iter().filter(|b| !b.is_break).count() as i64;
    let deep_blocks = blocks
        .iter()
        .filter(|b| !b.is_break && b.cognitive_load >= config.deep_work_load_threshold)
        .count() as i64;
    let completed_breaks = blocks.iter().filter(|b| b.is_break).count() as i64;

    let mut xp = prior_xp + 5 * task_blocks + 10 * deep_blocks + 2 * completed_breaks;
    if facts.truncated {
        xp -= 5;
    }
    let xp = xp.max(0);
    let level = Level::from_xp(xp);

    let streak = match prior {
        Some(p) if p.had_deep_work && p.created_on == today - chrono::Duration::days(1) => p.streak + 1,
        _ => u32::from(facts.any_deep_work),
    };

    let unique_tasks: BTreeSet<&str> = blocks
        .iter()
        .filter(|b| !b.is_break)
        .map(|b| b.task_title.as_str())
        .collect();

    let mut badges = BTreeSet::new();
    if has_deep_diver_pattern(blocks, config.deep_work_load_threshold) {
        badges.insert("Deep Diver".to_string());
    }
    if completed_breaks >= 2 && unique_tasks.len() >= 3 {
        badges.insert("Balanced".to_string());
    }
    if profile.stress_level >= 4 && !facts.truncated {
        badges.insert("Stress-Proof".to_string());
    }

    GamificationSnapshot {
        xp,
        level,
        streak,
        badges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogscheduler_domain::{Chronotype, Role};

    fn block(title: &str, is_break: bool, load: f64) -> Block {
        Block {
            task_title: title.to_string(),
            start_time: "09:00".to_string(),
            end_time: "09:25".to_string(),
            cognitive_load: load,
            energy_at_start: 0.8,
            fatigue_at_start: 0.1,
            is_break,
            explanation: String::new(),
        }
    }

    fn profile(stress_level: i32) -> Profile {
        Profile {
            name: "Ada".to_string(),
            role: Role::Student,
            chronotype: Chronotype::Normal,
            wake_time: "07:00".to_string(),
            sleep_time: "23:00".to_string(),
            sleep_hours: 7.5,
            stress_level,
            daily_commitments: vec![],
            break_preferences: vec![],
            lectures_today: 0,
            meetings_today: 0,
        }
    }

    #[test]
    fn xp_accumulates_per_block_kind() {
        let config = EngineConfig::default();
        let blocks = vec![
            block("A", false, 8.0),
            block("Break", true, 0.0),
            block("B", false, 3.0),
        ];
        let facts = PlacementFacts {
            any_deep_work: true,
            ..Default::default()
        };
        let snapshot = derive_gamification(
            &blocks,
            &facts,
            &config,
            &profile(2),
            None,
            0,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        );
        assert_eq!(snapshot.xp, 5 + 10 + 2 + 5);
        assert_eq!(snapshot.streak, 1);
    }

    #[test]
    fn truncation_applies_xp_penalty() {
        let config = EngineConfig::default();
        let blocks = vec![block("A", false, 3.0)];
        let facts = PlacementFacts {
            truncated: true,
            ..Default::default()
        };
        let snapshot = derive_gamification(
            &blocks,
            &facts,
            &config,
            &profile(2),
            None,
            0,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        );
        assert_eq!(snapshot.xp, 0);
    }

    #[test]
    fn streak_increments_on_consecutive_deep_work_days() {
        let config = EngineConfig::default();
        let blocks = vec![block("A", false, 8.0)];
        let facts = PlacementFacts {
            any_deep_work: true,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let prior = PriorPlanState {
            had_deep_work: true,
            created_on: today - chrono::Duration::days(1),
            streak: 4,
        };
        let snapshot = derive_gamification(&blocks, &facts, &config, &profile(2), Some(prior), 100, today);
        assert_eq!(snapshot.streak, 5);
    }

    #[test]
    fn stress_proof_badge_requires_no_truncation() {
        let config = EngineConfig::default();
        let blocks = vec![block("A", false, 3.0)];
        let facts = PlacementFacts::default();
        let snapshot = derive_gamification(
            &blocks,
            &facts,
            &config,
            &profile(4),
            None,
            0,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        );
        assert!(snapshot.badges.contains("Stress-Proof"));
    }
}
