//! Auth types.
//!
//! OAuth verification itself is an external collaborator (spec.md §1); the
//! backend trusts an already-verified external identity and only owns
//! session issuance from that point on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login request carrying an already-verified external identity.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Auth response with access token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user_id: Uuid,
    pub expires_in: u64,
}

/// Account record returned by `/v1/users/me`.
#[derive(Debug, Serialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: u64,    // expiration timestamp
    pub iat: u64,    // issued at
}
