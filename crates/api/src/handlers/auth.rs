//! Session issuance for an already-verified external identity (domain's
//! `auth.rs` doc comment: OAuth verification itself lives outside this
//! service).

use std::sync::Arc;

use axum::{Json, extract::State};
use jsonwebtoken::{EncodingKey, Header, encode};

use cogscheduler_domain::{AuthResponse, Claims, DomainError, LoginRequest, UserAccount};

use crate::AppState;
use crate::middleware::auth::AuthUser;

const TOKEN_TTL_SECS: u64 = 3600;

/// Exchange an already-verified external identity for an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, DomainError> {
    if req.external_id.trim().is_empty() {
        return Err(DomainError::Validation(
            "external_id cannot be empty".to_string(),
        ));
    }

    let user = state
        .user_repo
        .find_or_create(&req.external_id, req.email.as_deref(), req.name.as_deref())
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = Claims {
        sub: user.id.to_string(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        DomainError::Internal(anyhow::anyhow!("Failed to generate access token: {}", e))
    })?;

    tracing::info!(user_id = %user.id, "Access token issued");

    Ok(Json(AuthResponse {
        access_token: token,
        user_id: user.id,
        expires_in: TOKEN_TTL_SECS,
    }))
}

/// Return the authenticated caller's account record.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserAccount>, DomainError> {
    let user = state
        .user_repo
        .get_by_id(user_id)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound(format!("user {user_id} not found")))?;

    Ok(Json(UserAccount {
        id: user.id,
        external_id: user.external_id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    }))
}
