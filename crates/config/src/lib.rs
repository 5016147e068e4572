//! Configuration module for the CogScheduler backend.

pub mod engine;

use serde::Deserialize;
use std::env;
use thiserror::Error;

pub use engine::{EngineConfig, EngineConfigOverride};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// JWT secret for token signing
    pub jwt_secret: String,
    /// Address to bind the server to
    pub bind_address: String,
    /// Base URL for API (used in generated links such as calendar exports)
    pub base_url: String,
    /// Soft per-call scheduling deadline, in milliseconds.
    pub schedule_deadline_ms: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env_var("DATABASE_URL")?,
            jwt_secret: env_var("JWT_SECRET")?,
            bind_address: env_var_or("BIND_ADDRESS", "0.0.0.0:8080"),
            base_url: env_var_or("BASE_URL", "http://localhost:8080"),
            schedule_deadline_ms: env_var_or("SCHEDULE_DEADLINE_MS", "2000")
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue(
                        "SCHEDULE_DEADLINE_MS".to_string(),
                        "must be an integer".to_string(),
                    )
                })?,
        })
    }
}

fn env_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
