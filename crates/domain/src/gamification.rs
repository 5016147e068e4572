//! Gamification snapshot (spec.md §3, §4.7).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Level thresholds from spec.md §4.7: 0 → Student, 200 → Scholar,
/// 600 → Genius, 1200 → Mastermind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Student,
    Scholar,
    Genius,
    Mastermind,
}

impl Level {
    pub fn from_xp(xp: i64) -> Level {
        if xp >= 1200 {
            Level::Mastermind
        } else if xp >= 600 {
            Level::Genius
        } else if xp >= 200 {
            Level::Scholar
        } else {
            Level::Student
        }
    }
}

/// Derived, deterministic per-plan gamification state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationSnapshot {
    pub xp: i64,
    pub level: Level,
    pub streak: u32,
    pub badges: BTreeSet<String>,
}
