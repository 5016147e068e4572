//! Output block and curve models (spec.md §3 "Block", "EnergyCurve/FatigueCurve").

use serde::{Deserialize, Serialize};

/// One scheduled interval in the final plan: either a work quantum (or a
/// merged run of them) or a break / commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub task_title: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    /// 0 for break blocks.
    pub cognitive_load: f64,
    pub energy_at_start: f64,
    pub fatigue_at_start: f64,
    pub is_break: bool,
    pub explanation: String,
}

/// One sample of an energy or fatigue curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// `HH:MM`
    pub time: String,
    pub value: f64,
}

pub type EnergyCurve = Vec<CurvePoint>;
pub type FatigueCurve = Vec<CurvePoint>;
