//! Cognitive-load estimator (spec.md §4.1).

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::Task;

/// Default per-category weight multipliers. Domain categories that lean on
/// working memory (math, programming, science) weigh more; lighter review
/// work weighs less. Unknown categories fall back to 1.0 (spec.md §9 — there
/// is no closed enum for categories).
pub fn category_weight(category: &str) -> f64 {
    match category.to_ascii_lowercase().as_str() {
        "math" => 1.3,
        "programming" => 1.25,
        "science" => 1.2,
        "reading" => 0.8,
        "review" => 0.7,
        _ => 1.0,
    }
}

/// Resolve a task's effective cognitive load.
///
/// Uses the supplied `cognitive_load` verbatim (clamped) when present;
/// otherwise derives it from difficulty, category weight, and the day's
/// lecture load (spec.md §4.1: `lectures_today × lecture_penalty_per`).
pub fn estimate_load(task: &Task, lectures_today: i32, config: &EngineConfig) -> f64 {
    if let Some(load) = task.cognitive_load {
        return load.clamp(0.0, 10.0);
    }

    let weight = category_weight(&task.category);
    let raw = task.difficulty * weight + (lectures_today as f64) * config.lecture_penalty_per;
    raw.clamp(0.0, 10.0)
}
