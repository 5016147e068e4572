//! Domain types for the CogScheduler backend.

pub mod auth;
pub mod block;
pub mod errors;
pub mod gamification;
pub mod profile;
pub mod schedule;
pub mod task;
pub mod tlx;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use auth::*;
pub use block::*;
pub use errors::*;
pub use gamification::*;
pub use profile::*;
pub use schedule::*;
pub use task::*;
pub use tlx::*;

/// User entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Health check response (spec.md §6 `health`).
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub database: String,
}
