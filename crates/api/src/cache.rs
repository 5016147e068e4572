//! Process-wide in-memory caches shared across handlers via `AppState`.

pub mod engine_weights_cache;
