//! Warning synthesis (spec.md §4.6). Turns placement facts into at most six
//! ordered, human-readable cautions.

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::Profile;

use crate::scheduler::PlacementFacts;

const MAX_WARNINGS: usize = 6;

/// Derive the ordered warning list for one produced plan.
pub fn derive_warnings(profile: &Profile, config: &EngineConfig, facts: &PlacementFacts) -> Vec<String> {
    let mut warnings = Vec::new();

    if profile.sleep_hours < 5.0 {
        warnings.push("Sleep under 5 hours — burnout risk today.".to_string());
    }

    if profile.stress_level == 5 && facts.any_deep_work {
        warnings.push(
            "Stress is maxed out and deep work is scheduled — consider deferring non-essential tasks."
                .to_string(),
        );
    }

    if facts.requested_total_min > facts.free_total_min {
        warnings.push("Requested work exceeds free time today; the plan was truncated.".to_string());
    }

    if facts.max_uninterrupted_deep_min > config.short_break_trigger_min {
        warnings.push(
            "Deep work ran longer than the break trigger without an intervening break.".to_string(),
        );
    }

    if facts.any_overcap_load {
        warnings.push(format!(
            "A task's cognitive load exceeds {:.1} under the current stress cap; it was scheduled anyway.",
            config.max_load_under_stress
        ));
    }

    if profile.break_preferences.is_empty() && facts.total_deep_min > 120 {
        warnings.push("No breaks were requested despite more than two hours of deep work.".to_string());
    }

    warnings.truncate(MAX_WARNINGS);
    warnings
}
