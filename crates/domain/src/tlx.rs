//! NASA-TLX feedback models (spec.md §3 "TLX entry", §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inbound feedback for one completed block.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TlxFeedbackRequest {
    pub block_index: i32,
    #[validate(range(min = 1, max = 7))]
    pub mental_demand: i32,
    #[validate(range(min = 1, max = 7))]
    pub effort: i32,
}

/// A stored TLX entry in the user's append-only log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlxEntry {
    pub block_index: i32,
    pub mental_demand: i32,
    pub effort: i32,
    pub timestamp: DateTime<Utc>,
}

/// The three fatigue weights the recalibrator may nudge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UpdatedWeights {
    pub fatigue_consec_weight: f64,
    pub fatigue_total_weight: f64,
    pub fatigue_force_break: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TlxFeedbackResponse {
    pub status: String,
    pub tlx_entries: i64,
    pub updated_weights: UpdatedWeights,
}
