//! `calendar/export` (spec.md §6, ICS/RFC 5545 export).

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use cogscheduler_domain::DomainError;
use cogscheduler_engine::calendar::blocks_to_ics;

use crate::AppState;
use crate::middleware::auth::AuthUser;

pub async fn export_calendar(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, DomainError> {
    let row = state
        .schedule_repo
        .get_latest(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound("no schedule to export".to_string()))?;

    let ics = blocks_to_ics(&row.schedule_data.0.blocks, row.created_at.date_naive());

    if !row.calendar_synced {
        state
            .schedule_repo
            .mark_calendar_synced(row.id)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
    }

    Ok((
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics,
    )
        .into_response())
}
