//! `config` GET/PUT (spec.md §9 "Per-user mutable config").

use std::sync::Arc;

use axum::{Json, extract::State};

use cogscheduler_config::EngineConfig;
use cogscheduler_domain::DomainError;

use crate::AppState;
use crate::middleware::auth::AuthUser;

/// The process-wide default merged with this user's stored override patch.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<EngineConfig>, DomainError> {
    let overrides = state
        .config_override_repo
        .get(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let merged = state.engine_config.with_override(&overrides)?;
    Ok(Json(merged))
}

/// Persist a partial override patch and return the resulting merged config.
pub async fn put_config(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(patch): Json<cogscheduler_config::EngineConfigOverride>,
) -> Result<Json<EngineConfig>, DomainError> {
    // Validate before persisting: an unknown key must neither stick nor
    // leave a stale merged config in place.
    let merged = state.engine_config.with_override(&patch)?;

    state
        .config_override_repo
        .upsert(user_id, &patch)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    tracing::info!(user_id = %user_id, "Config override updated");

    Ok(Json(merged))
}
