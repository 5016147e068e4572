//! `tlx-feedback` (spec.md §4.8, §6).

use std::sync::Arc;

use axum::{Json, extract::State};
use validator::Validate;

use cogscheduler_domain::{DomainError, TlxFeedbackRequest, TlxFeedbackResponse, UpdatedWeights};
use cogscheduler_engine::recalibrate::{recalibrate, should_recalibrate};

use crate::AppState;
use crate::middleware::auth::AuthUser;

const RECALIBRATION_WINDOW: i64 = 6;

const DEFAULT_WEIGHTS: UpdatedWeights = UpdatedWeights {
    fatigue_consec_weight: 0.4,
    fatigue_total_weight: 0.3,
    fatigue_force_break: 0.75,
};

pub async fn tlx_feedback(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<TlxFeedbackRequest>,
) -> Result<Json<TlxFeedbackResponse>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;

    let entry_count = state
        .tlx_repo
        .append(user_id, req.block_index, req.mental_demand, req.effort)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let lock = state.weights_cache.entry(
        user_id,
        state
            .engine_weights_repo
            .get(user_id, DEFAULT_WEIGHTS)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?,
    );

    let updated_weights = if should_recalibrate(entry_count as usize) {
        let mut guard = lock.write().await;
        let entries = state
            .tlx_repo
            .recent(user_id, RECALIBRATION_WINDOW)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let next = recalibrate(&entries, *guard);
        *guard = next;

        state
            .engine_weights_repo
            .upsert(user_id, next)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        tracing::info!(user_id = %user_id, entry_count, "Recalibrated fatigue weights");
        next
    } else {
        *lock.read().await
    };

    Ok(Json(TlxFeedbackResponse {
        status: "ok".to_string(),
        tlx_entries: entry_count,
        updated_weights,
    }))
}
