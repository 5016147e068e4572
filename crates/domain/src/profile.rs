//! Profile model (spec.md §3 "Profile").

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role the user primarily schedules around. Free-standing enum rather than
/// a free-form string because it drives no branching logic today but is
/// validated input (spec.md §3 lists a closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Professional,
    Researcher,
}

/// Diurnal preference driving the peak of the energy curve (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronotype {
    Early,
    Normal,
    Late,
}

/// User profile. Immutable for the duration of one scheduling call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub role: Role,
    pub chronotype: Chronotype,
    /// `HH:MM`
    pub wake_time: String,
    /// `HH:MM`
    pub sleep_time: String,
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: f64,
    #[validate(range(min = 1, max = 5))]
    pub stress_level: i32,
    /// Ordered `"HH:MM-HH:MM label"` strings.
    #[serde(default)]
    pub daily_commitments: Vec<String>,
    /// Ordered `"HH:MM-HH:MM"` strings.
    #[serde(default)]
    pub break_preferences: Vec<String>,
    #[validate(range(min = 0))]
    pub lectures_today: i32,
    #[validate(range(min = 0))]
    pub meetings_today: i32,
}

/// Partial profile overrides accepted on `schedule`/`chat` calls: the
/// engine merges these onto the persisted profile for the duration of one
/// call without writing them back (spec.md §6 "schedule(tasks,
/// profile-overrides)").
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileOverride {
    pub chronotype: Option<Chronotype>,
    pub wake_time: Option<String>,
    pub sleep_time: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 1, max = 5))]
    pub stress_level: Option<i32>,
    pub daily_commitments: Option<Vec<String>>,
    pub break_preferences: Option<Vec<String>>,
    pub lectures_today: Option<i32>,
    pub meetings_today: Option<i32>,
}

impl Profile {
    /// Apply a per-call override on top of the persisted profile, returning
    /// a new value. Fields absent from the override pass through unchanged.
    pub fn merged_with(&self, over: &ProfileOverride) -> Profile {
        let mut merged = self.clone();
        if let Some(v) = over.chronotype {
            merged.chronotype = v;
        }
        if let Some(v) = &over.wake_time {
            merged.wake_time = v.clone();
        }
        if let Some(v) = &over.sleep_time {
            merged.sleep_time = v.clone();
        }
        if let Some(v) = over.sleep_hours {
            merged.sleep_hours = v;
        }
        if let Some(v) = over.stress_level {
            merged.stress_level = v;
        }
        if let Some(v) = &over.daily_commitments {
            merged.daily_commitments = v.clone();
        }
        if let Some(v) = &over.break_preferences {
            merged.break_preferences = v.clone();
        }
        if let Some(v) = over.lectures_today {
            merged.lectures_today = v;
        }
        if let Some(v) = over.meetings_today {
            merged.meetings_today = v;
        }
        merged
    }
}
