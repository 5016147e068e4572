//! Fatigue accumulator (spec.md §4.3).
//!
//! A stateful scan over the blocks placed so far. Placement decisions
//! consume this state and feed it back, so it is bundled with the
//! placement builder rather than modeled as a free-standing pure function
//! (spec.md §9 "Coupling between fatigue and placement").

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{Block, FatigueCurve};

use crate::clock::{Interval, Minutes, parse_hhmm};
use crate::energy::sample_curve;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FatigueState {
    /// Consecutive minutes of deep work, reset by any break or sub-threshold block.
    pub consec_deep_min: u32,
    /// Cumulative deep-work minutes across the whole day.
    pub total_deep_min: u32,
    /// Scalar fatigue in `[0, 1]`.
    pub f: f64,
}

impl FatigueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an appended work quantum.
    pub fn record_work(&mut self, duration_min: u32, cognitive_load: f64, config: &EngineConfig) {
        if cognitive_load >= config.deep_work_load_threshold {
            self.consec_deep_min += duration_min;
            self.total_deep_min += duration_min;
        } else {
            self.consec_deep_min = 0;
        }
        self.recompute(config);
    }

    /// Record an appended break (forced or preferred).
    pub fn record_break(&mut self, duration_min: u32, config: &EngineConfig) {
        self.consec_deep_min = 0;
        let recovery = config.break_recovery_factor
            * (duration_min as f64 / config.long_break_duration.max(1) as f64).min(1.0);
        self.f = (self.f * (1.0 - recovery)).max(0.0);
    }

    fn recompute(&mut self, config: &EngineConfig) {
        let consec_term = config.fatigue_consec_weight
            * (self.consec_deep_min as f64 / config.consec_threshold_min.max(1) as f64);
        let total_term = config.fatigue_total_weight
            * (self.total_deep_min as f64 / config.total_deep_threshold_min.max(1) as f64);
        self.f = (consec_term + total_term).clamp(0.0, 1.0);
    }

    /// The force-break predicate (spec.md §4.3).
    pub fn should_force_break(&self, config: &EngineConfig) -> bool {
        self.f >= config.fatigue_force_break
            || self.consec_deep_min >= config.short_break_trigger_min
    }

    /// Which break length a forced break should take (spec.md Step D.3).
    pub fn forced_break_duration(&self, config: &EngineConfig) -> u32 {
        if self.total_deep_min >= config.total_deep_threshold_min {
            config.long_break_duration
        } else {
            config.short_break_duration
        }
    }
}

/// Step-function fatigue value at `t`: the `fatigue_at_start` of the last
/// block whose start time is at or before `t`, 0 before the first block.
fn fatigue_value_at(blocks: &[Block], t: Minutes) -> f64 {
    let mut value = 0.0;
    for block in blocks {
        let start = parse_hhmm(&block.start_time).expect("block start_time is always HH:MM");
        if start <= t {
            value = block.fatigue_at_start;
        } else {
            break;
        }
    }
    value
}

/// Sample the fatigue curve across `window` by replaying the already-placed
/// blocks' recorded `fatigue_at_start` values (spec.md §3 "FatigueCurve").
pub fn sample_fatigue_curve(blocks: &[Block], window: Interval, cadence_minutes: u32) -> FatigueCurve {
    sample_curve(window, cadence_minutes, |t| fatigue_value_at(blocks, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_work_accumulates_both_counters() {
        let config = EngineConfig::default();
        let mut state = FatigueState::new();
        state.record_work(25, 8.0, &config);
        assert_eq!(state.consec_deep_min, 25);
        assert_eq!(state.total_deep_min, 25);
        assert!(state.f > 0.0);
    }

    #[test]
    fn light_block_resets_consecutive_but_not_total() {
        let config = EngineConfig::default();
        let mut state = FatigueState::new();
        state.record_work(25, 8.0, &config);
        state.record_work(25, 2.0, &config);
        assert_eq!(state.consec_deep_min, 0);
        assert_eq!(state.total_deep_min, 25);
    }

    #[test]
    fn break_resets_consecutive_and_reduces_fatigue() {
        let config = EngineConfig::default();
        let mut state = FatigueState::new();
        for _ in 0..4 {
            state.record_work(25, 8.0, &config);
        }
        let before = state.f;
        state.record_break(config.long_break_duration, &config);
        assert_eq!(state.consec_deep_min, 0);
        assert!(state.f < before);
    }

    #[test]
    fn force_break_triggers_on_consecutive_threshold_even_with_low_f() {
        let config = EngineConfig::default();
        let mut state = FatigueState::new();
        state.consec_deep_min = config.short_break_trigger_min;
        state.f = 0.1;
        assert!(state.should_force_break(&config));
    }

    #[test]
    fn long_break_chosen_once_total_deep_threshold_reached() {
        let config = EngineConfig::default();
        let mut state = FatigueState::new();
        state.total_deep_min = config.total_deep_threshold_min;
        assert_eq!(
            state.forced_break_duration(&config),
            config.long_break_duration
        );
    }

    fn block(start: &str, end: &str, fatigue_at_start: f64) -> Block {
        Block {
            task_title: "Task".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            cognitive_load: 8.0,
            energy_at_start: 0.8,
            fatigue_at_start,
            is_break: false,
            explanation: String::new(),
        }
    }

    #[test]
    fn fatigue_curve_holds_last_blocks_value_between_samples() {
        let blocks = vec![block("09:00", "09:25", 0.1), block("09:25", "09:50", 0.3)];
        let window = Interval::new(9 * 60, 10 * 60);
        let curve = sample_fatigue_curve(&blocks, window, 15);
        assert_eq!(curve.first().unwrap().value, 0.1);
        assert!(curve.iter().any(|p| p.time == "09:30" && p.value == 0.3));
        assert_eq!(curve.last().unwrap().value, 0.3);
    }

    #[test]
    fn fatigue_curve_is_zero_before_first_block() {
        let blocks = vec![block("10:00", "10:25", 0.4)];
        let window = Interval::new(9 * 60, 10 * 60 + 30);
        let curve = sample_fatigue_curve(&blocks, window, 15);
        assert_eq!(curve.first().unwrap().value, 0.0);
    }
}
