//! CogScheduler backend server library.

pub mod cache;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use cogscheduler_config::{AppConfig, EngineConfig};
use cogscheduler_domain::{HealthResponse, ReadyResponse};
use cogscheduler_storage::{
    ConfigOverrideRepository, EngineWeightsRepository, ProfileRepository, ScheduleRepository,
    TlxRepository, UserRepository, check_connection,
};

use crate::cache::engine_weights_cache::EngineWeightsCache;
use handlers::auth::{get_me, login};
use handlers::calendar::export_calendar;
use handlers::config::{get_config, put_config};
use handlers::profile::{get_profile, put_profile};
use handlers::schedule::{chat, schedule};
use handlers::tlx::tlx_feedback;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_repo: UserRepository,
    pub profile_repo: ProfileRepository,
    pub schedule_repo: ScheduleRepository,
    pub tlx_repo: TlxRepository,
    pub engine_weights_repo: EngineWeightsRepository,
    pub config_override_repo: ConfigOverrideRepository,
    /// Process-wide default config (spec.md §9); merged per-call with a
    /// user's stored override patch.
    pub engine_config: EngineConfig,
    pub weights_cache: EngineWeightsCache,
    pub config: AppConfig,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ready", get(ready))
        .route("/v1/auth/login", post(login))
        .route("/v1/users/me", get(get_me))
        .route("/v1/schedule", post(schedule))
        .route("/v1/chat", post(chat))
        .route("/v1/tlx-feedback", post(tlx_feedback))
        .route("/v1/config", get(get_config).put(put_config))
        .route("/v1/profile", get(get_profile).put(put_profile))
        .route("/v1/calendar/export", get(export_calendar))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness check (spec.md §6 `health`).
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "cognitive-scheduler".to_string(),
    })
}

/// Readiness check endpoint.
async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let db_status = match check_connection(&state.pool).await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(ReadyResponse {
        status: if db_status == "connected" {
            "ok"
        } else {
            "degraded"
        }
        .to_string(),
        database: db_status.to_string(),
    })
}
