//! Tunable scheduling-engine configuration (spec.md §6 "Configuration keys").
//!
//! `EngineConfig` is a plain value, not a singleton: the engine consumes a
//! merged snapshot built from the process-wide default plus a user's
//! persisted JSON override patch, per spec.md §9 ("Per-user mutable config").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A partial PUT body: `{key: value}` pairs addressing a subset of
/// [`EngineConfig`]'s fields. Stored verbatim per-user so overrides survive
/// independently of the process-wide default.
pub type EngineConfigOverride = HashMap<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for config key {0}: {1}")]
    InvalidValue(String, String),
}

/// Per-call snapshot of every tunable weight and threshold the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sleep_baseline: f64,
    pub fatigue_consec_weight: f64,
    pub fatigue_total_weight: f64,
    pub consec_threshold_min: u32,
    pub total_deep_threshold_min: u32,
    pub short_break_trigger_min: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub fatigue_force_break: f64,
    pub stress_cap_threshold: i32,
    pub max_load_under_stress: f64,
    pub lecture_penalty_per: f64,
    pub break_recovery_factor: f64,
    pub quantum_min: u32,
    pub deep_work_load_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sleep_baseline: 7.5,
            fatigue_consec_weight: 0.4,
            fatigue_total_weight: 0.3,
            consec_threshold_min: 90,
            total_deep_threshold_min: 180,
            short_break_trigger_min: 90,
            short_break_duration: 10,
            long_break_duration: 15,
            fatigue_force_break: 0.75,
            stress_cap_threshold: 4,
            max_load_under_stress: 6.0,
            lecture_penalty_per: 0.05,
            break_recovery_factor: 0.4,
            quantum_min: 25,
            deep_work_load_threshold: 6.0,
        }
    }
}

impl EngineConfig {
    /// Every key accepted by `PUT /config`. Anything else is rejected with
    /// [`EngineConfigError::UnknownKey`] and leaves `self` untouched.
    pub const KEYS: &'static [&'static str] = &[
        "sleep_baseline",
        "fatigue_consec_weight",
        "fatigue_total_weight",
        "consec_threshold_min",
        "total_deep_threshold_min",
        "short_break_trigger_min",
        "short_break_duration",
        "long_break_duration",
        "fatigue_force_break",
        "stress_cap_threshold",
        "max_load_under_stress",
        "lecture_penalty_per",
        "break_recovery_factor",
        "quantum_min",
        "deep_work_load_threshold",
    ];

    /// Apply a per-user override patch on top of this (process-wide default)
    /// config, without mutating either input.
    pub fn with_override(&self, patch: &EngineConfigOverride) -> Result<Self, EngineConfigError> {
        let mut merged = *self;
        merged.apply_patch(patch)?;
        Ok(merged)
    }

    /// Validate and apply a patch in place. On error, `self` is left
    /// unchanged (validation happens before any field is written).
    pub fn apply_patch(&mut self, patch: &EngineConfigOverride) -> Result<(), EngineConfigError> {
        for key in patch.keys() {
            if !Self::KEYS.contains(&key.as_str()) {
                return Err(EngineConfigError::UnknownKey(key.clone()));
            }
        }

        let mut value = serde_json::to_value(*self).expect("EngineConfig always serializes");
        let obj = value
            .as_object_mut()
            .expect("EngineConfig always serializes to a JSON object");
        for (key, v) in patch {
            obj.insert(key.clone(), v.clone());
        }

        *self = serde_json::from_value(value)
            .map_err(|e| EngineConfigError::InvalidValue("(patch)".to_string(), e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_key_is_rejected_and_config_is_unchanged() {
        let base = EngineConfig::default();
        let mut patch = EngineConfigOverride::new();
        patch.insert("bogus_key".to_string(), json!(99));

        let err = base.with_override(&patch).unwrap_err();
        assert!(matches!(err, EngineConfigError::UnknownKey(k) if k == "bogus_key"));
    }

    #[test]
    fn known_key_overrides_only_that_field() {
        let base = EngineConfig::default();
        let mut patch = EngineConfigOverride::new();
        patch.insert("quantum_min".to_string(), json!(20));

        let merged = base.with_override(&patch).unwrap();
        assert_eq!(merged.quantum_min, 20);
        assert_eq!(merged.sleep_baseline, base.sleep_baseline);
    }
}
