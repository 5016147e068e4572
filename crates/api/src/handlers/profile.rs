//! `profile` GET/PUT (SPEC_FULL §4).

use std::sync::Arc;

use axum::{Json, extract::State};
use validator::Validate;

use cogscheduler_domain::{DomainError, Profile};

use crate::AppState;
use crate::middleware::auth::AuthUser;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Profile>, DomainError> {
    let profile = state
        .profile_repo
        .get(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound("profile not set".to_string()))?;

    Ok(Json(profile))
}

pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, DomainError> {
    profile
        .validate()
        .map_err(DomainError::from_validation_errors)?;

    state
        .profile_repo
        .upsert(user_id, &profile)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    tracing::info!(user_id = %user_id, "Profile updated");

    Ok(Json(profile))
}
