//! Axum middleware and extractors.

pub mod auth;
