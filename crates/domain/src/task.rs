//! Task and quantum models (spec.md §3 "Task", "Quantum").

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A requested unit of work, as supplied by the caller or produced by the
/// free-text parser.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Task {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Free-form, e.g. "math", "programming", "reading". No closed enum
    /// (spec.md §9): unrecognized categories fall back to weight 1.0.
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 1.0, max = 10.0))]
    pub difficulty: f64,
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    #[validate(range(min = 0.0, max = 10.0))]
    pub cognitive_load: Option<f64>,
}

/// A task split into a schedulable unit. Quanta of the same task share
/// `title`/`category`/`cognitive_load`; `sequence_index` preserves the
/// task's internal ordering across the final plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantum {
    pub title: String,
    pub category: String,
    pub cognitive_load: f64,
    pub duration_minutes: u32,
    pub sequence_index: u32,
    /// Secondary sort key carried from the owning task so Step A's ordering
    /// survives quantum splitting.
    pub difficulty: f64,
    /// Stable input-order tiebreaker from the owning task.
    pub input_order: usize,
    /// Set when the owning task's load exceeded `max_load_under_stress`
    /// under the stress cap (spec.md §4.5 Step B) — tagged, never dropped.
    pub overcap: bool,
}
