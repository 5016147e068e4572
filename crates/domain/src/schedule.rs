//! RPC request/response shapes for the `schedule` and `chat` operations
//! (spec.md §6).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::block::{EnergyCurve, FatigueCurve};
use crate::gamification::GamificationSnapshot;
use crate::profile::ProfileOverride;
use crate::{Block, Task};

/// `schedule(tasks, profile-overrides)`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleRequest {
    #[validate(length(min = 0), nested)]
    pub tasks: Vec<Task>,
    /// `HH:MM`
    pub available_from: String,
    /// `HH:MM`
    pub available_to: String,
    #[serde(default)]
    #[validate(nested)]
    pub profile_overrides: ProfileOverride,
}

/// `chat(message)` / `converse(message)`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    /// `HH:MM`
    pub available_from: String,
    /// `HH:MM`
    pub available_to: String,
    #[serde(default)]
    #[validate(nested)]
    pub profile_overrides: ProfileOverride,
}

/// Shared response shape for both `schedule` and `chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub schedule: Vec<Block>,
    pub energy_curve: EnergyCurve,
    pub fatigue_curve: FatigueCurve,
    pub warnings: Vec<String>,
    pub gamification: GamificationSnapshot,
    pub parsed_tasks: Vec<Task>,
    /// False when the engine ran to completion but the storage write failed;
    /// the plan itself is still returned (spec.md §7 recovery policy).
    pub persisted: bool,
}

/// Persisted shape of a schedule row's `schedule_data` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSchedule {
    pub blocks: Vec<Block>,
    pub energy_curve: EnergyCurve,
    pub fatigue_curve: FatigueCurve,
    pub warnings: Vec<String>,
    pub gamification: GamificationSnapshot,
}
