//! CogScheduler backend server.

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cogscheduler_api::cache::engine_weights_cache::EngineWeightsCache;
use cogscheduler_api::{AppState, build_router};
use cogscheduler_config::{AppConfig, EngineConfig};
use cogscheduler_storage::{
    ConfigOverrideRepository, EngineWeightsRepository, ProfileRepository, ScheduleRepository,
    TlxRepository, UserRepository, create_pool, run_migrations,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CogScheduler backend server...");

    let config = AppConfig::from_env()?;
    tracing::info!("Binding to {}", config.bind_address);

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let state = Arc::new(AppState {
        pool: pool.clone(),
        user_repo: UserRepository::new(pool.clone()),
        profile_repo: ProfileRepository::new(pool.clone()),
        schedule_repo: ScheduleRepository::new(pool.clone()),
        tlx_repo: TlxRepository::new(pool.clone()),
        engine_weights_repo: EngineWeightsRepository::new(pool.clone()),
        config_override_repo: ConfigOverrideRepository::new(pool.clone()),
        engine_config: EngineConfig::default(),
        weights_cache: EngineWeightsCache::new(),
        config: config.clone(),
    });

    let app: Router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
