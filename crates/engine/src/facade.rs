//! Engine façade (spec.md §2 module 10). The single entry point storage and
//! transport adapters call: merges config, runs placement, derives curves,
//! warnings, and gamification, all as one pure computation from
//! `(profile, config, tasks)` (spec.md §5).

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{Block, EnergyCurve, EngineError, FatigueCurve, GamificationSnapshot, Profile, Task};
use tokio_util::sync::CancellationToken;

use crate::clock::{Interval, parse_hhmm};
use crate::energy::sample_energy_curve;
use crate::fatigue::sample_fatigue_curve;
use crate::gamification::{PriorPlanState, derive_gamification};
use crate::scheduler::schedule;
use crate::warnings::derive_warnings;

/// Sampling cadence for both curves (spec.md §3 "EnergyCurve/FatigueCurve").
pub const CURVE_CADENCE_MINUTES: u32 = 15;

/// Everything the façade needs besides the profile/config/tasks triple:
/// gamification history and cooperative cancellation/deadline controls.
pub struct EngineRequest<'a> {
    pub profile: &'a Profile,
    pub config: &'a EngineConfig,
    pub tasks: &'a [Task],
    pub available_from: &'a str,
    pub available_to: &'a str,
    pub prior_plan: Option<PriorPlanState>,
    pub prior_xp: i64,
    pub today: NaiveDate,
    pub deadline: Duration,
    pub cancel: CancellationToken,
}

/// The full output of one scheduling call (spec.md §6 `schedule` response,
/// minus `parsed_tasks` and `persisted` which the caller already knows).
#[derive(Debug, Clone)]
pub struct EnginePlan {
    pub schedule: Vec<Block>,
    pub energy_curve: EnergyCurve,
    pub fatigue_curve: FatigueCurve,
    pub warnings: Vec<String>,
    pub gamification: GamificationSnapshot,
}

/// Run the full pipeline: parsed tasks → plan → warnings → gamification.
pub fn run(request: EngineRequest<'_>) -> Result<EnginePlan, EngineError> {
    let window = Interval::new(
        parse_hhmm(request.available_from)?,
        parse_hhmm(request.available_to)?,
    );

    let deadline_instant = Instant::now() + request.deadline;
    let (blocks, facts) = schedule(
        request.profile,
        request.config,
        request.tasks,
        window,
        &request.cancel,
        Some(deadline_instant),
    )?;

    let mut warnings = derive_warnings(request.profile, request.config, &facts);
    if facts.deadline_exceeded {
        warnings.insert(
            0,
            "Scheduling exceeded its time budget; returning the best plan found so far.".to_string(),
        );
        warnings.truncate(6);
    }

    let energy_curve = sample_energy_curve(window, CURVE_CADENCE_MINUTES, request.profile, request.config);
    let fatigue_curve = sample_fatigue_curve(&blocks, window, CURVE_CADENCE_MINUTES);

    let gamification = derive_gamification(
        &blocks,
        &facts,
        request.config,
        request.profile,
        request.prior_plan,
        request.prior_xp,
        request.today,
    );

    Ok(EnginePlan {
        schedule: blocks,
        energy_curve,
        fatigue_curve,
        warnings,
        gamification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogscheduler_domain::{Chronotype, Role};

    fn profile() -> Profile {
        Profile {
            name: "Ada".to_string(),
            role: Role::Student,
            chronotype: Chronotype::Normal,
            wake_time: "07:00".to_string(),
            sleep_time: "23:00".to_string(),
            sleep_hours: 7.0,
            stress_level: 2,
            daily_commitments: vec![],
            break_preferences: vec!["13:00-14:00".to_string()],
            lectures_today: 0,
            meetings_today: 0,
        }
    }

    fn task(title: &str, category: &str, difficulty: f64, duration: u32, load: Option<f64>) -> Task {
        Task {
            title: title.to_string(),
            category: category.to_string(),
            difficulty,
            duration_minutes: duration,
            cognitive_load: load,
        }
    }

    #[test]
    fn full_pipeline_produces_consistent_plan() {
        let config = EngineConfig::default();
        let p = profile();
        let tasks = vec![
            task("Graph Theory", "math", 8.0, 120, Some(8.2)),
            task("ML Assignment", "programming", 7.0, 90, Some(7.5)),
            task("Chem Review", "science", 4.0, 45, Some(3.0)),
        ];
        let plan = run(EngineRequest {
            profile: &p,
            config: &config,
            tasks: &tasks,
            available_from: "09:00",
            available_to: "22:00",
            prior_plan: None,
            prior_xp: 0,
            today: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            deadline: Duration::from_secs(2),
            cancel: CancellationToken::new(),
        })
        .unwrap();

        assert!(!plan.schedule.is_empty());
        assert_eq!(plan.energy_curve.first().unwrap().time, "09:00");
        assert_eq!(plan.energy_curve.last().unwrap().time, "22:00");
        assert_eq!(plan.fatigue_curve.first().unwrap().time, "09:00");
        assert!(plan.gamification.xp > 0);
    }

    #[test]
    fn invalid_window_surfaces_as_engine_error() {
        let config = EngineConfig::default();
        let p = profile();
        let result = run(EngineRequest {
            profile: &p,
            config: &config,
            tasks: &[],
            available_from: "12:00",
            available_to: "09:00",
            prior_plan: None,
            prior_xp: 0,
            today: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            deadline: Duration::from_secs(2),
            cancel: CancellationToken::new(),
        });
        assert!(matches!(result, Err(EngineError::InvalidWindow(_))));
    }
}
