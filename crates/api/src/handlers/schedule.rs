//! `schedule` and `chat`/`converse` (spec.md §6). Both share one pipeline:
//! load profile/config/weights, run the engine off the async executor, then
//! persist the result without ever invalidating a plan the engine already
//! produced (spec.md §7 recovery policy).

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, extract::State};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::{
    Block, ChatRequest, DomainError, PersistedSchedule, ProfileOverride, ScheduleRequest,
    ScheduleResponse, Task, UpdatedWeights,
};
use cogscheduler_engine::facade::{EngineRequest, run};
use cogscheduler_engine::gamification::PriorPlanState;
use cogscheduler_engine::parse_fallback::parse_free_text;

use crate::AppState;
use crate::middleware::auth::AuthUser;

const DEFAULT_WEIGHTS: UpdatedWeights = UpdatedWeights {
    fatigue_consec_weight: 0.4,
    fatigue_total_weight: 0.3,
    fatigue_force_break: 0.75,
};

fn had_deep_work(blocks: &[Block], threshold: f64) -> bool {
    blocks
        .iter()
        .any(|b| !b.is_break && b.cognitive_load >= threshold)
}

pub async fn schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;

    let response = run_pipeline(
        &state,
        user_id,
        req.tasks,
        req.available_from,
        req.available_to,
        &req.profile_overrides,
    )
    .await?;

    Ok(Json(response))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ScheduleResponse>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;

    let tasks = parse_free_text(&req.message);

    let response = run_pipeline(
        &state,
        user_id,
        tasks,
        req.available_from,
        req.available_to,
        &req.profile_overrides,
    )
    .await?;

    Ok(Json(response))
}

async fn run_pipeline(
    state: &Arc<AppState>,
    user_id: uuid::Uuid,
    tasks: Vec<Task>,
    available_from: String,
    available_to: String,
    profile_overrides: &ProfileOverride,
) -> Result<ScheduleResponse, DomainError> {
    let stored_profile = state
        .profile_repo
        .get(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound("profile not set".to_string()))?;
    let profile = stored_profile.merged_with(profile_overrides);

    let config = merged_config(state, user_id).await?;

    let prior_row = state
        .schedule_repo
        .get_latest(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;
    let (prior_plan, prior_xp) = match &prior_row {
        Some(row) => (
            Some(PriorPlanState {
                had_deep_work: had_deep_work(&row.schedule_data.0.blocks, config.deep_work_load_threshold),
                created_on: row.created_at.date_naive(),
                streak: row.schedule_data.0.gamification.streak,
            }),
            row.schedule_data.0.gamification.xp,
        ),
        None => (None, 0),
    };

    let today = Utc::now().date_naive();
    let deadline = Duration::from_millis(state.config.schedule_deadline_ms);
    let tasks_for_engine = tasks.clone();

    let plan = tokio::task::spawn_blocking(move || {
        run(EngineRequest {
            profile: &profile,
            config: &config,
            tasks: &tasks_for_engine,
            available_from: &available_from,
            available_to: &available_to,
            prior_plan,
            prior_xp,
            today,
            deadline,
            cancel: CancellationToken::new(),
        })
    })
    .await
    .map_err(|e| DomainError::Internal(anyhow::anyhow!("scheduling task panicked: {e}")))??;

    let persisted_schedule = PersistedSchedule {
        blocks: plan.schedule.clone(),
        energy_curve: plan.energy_curve.clone(),
        fatigue_curve: plan.fatigue_curve.clone(),
        warnings: plan.warnings.clone(),
        gamification: plan.gamification.clone(),
    };

    let persisted = match state.schedule_repo.insert(user_id, &persisted_schedule).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to persist schedule; returning plan anyway");
            false
        }
    };

    Ok(ScheduleResponse {
        schedule: plan.schedule,
        energy_curve: plan.energy_curve,
        fatigue_curve: plan.fatigue_curve,
        warnings: plan.warnings,
        gamification: plan.gamification,
        parsed_tasks: tasks,
        persisted,
    })
}

async fn merged_config(state: &Arc<AppState>, user_id: uuid::Uuid) -> Result<EngineConfig, DomainError> {
    let overrides = state
        .config_override_repo
        .get(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;
    let mut config = state.engine_config.with_override(&overrides)?;

    let weights = state.weights_cache.entry(
        user_id,
        state
            .engine_weights_repo
            .get(user_id, DEFAULT_WEIGHTS)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?,
    );
    let weights = *weights.read().await;
    config.fatigue_consec_weight = weights.fatigue_consec_weight;
    config.fatigue_total_weight = weights.fatigue_total_weight;
    config.fatigue_force_break = weights.fatigue_force_break;

    Ok(config)
}
