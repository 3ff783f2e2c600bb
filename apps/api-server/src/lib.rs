//! # Khata API
//!
//! JSON REST API for the Khata business backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Khata API Server                              │
//! │                                                                         │
//! │  SPA client ──► /api/* ──► TraceLayer ──► handlers ──► khata-db        │
//! │                                              │             │            │
//! │                                              ▼             ▼            │
//! │                                          ApiError       SQLite          │
//! │                                       {"error": ...}                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::AppConfig`]. Environment variables:
//! - `KHATA_HOST` / `KHATA_PORT` - bind address (default: 0.0.0.0:5000)
//! - `KHATA_DATABASE_PATH` - SQLite file (default: khata.db)
//! - `KHATA_MAX_CONNECTIONS` - pool size (default: 5)
//! - `KHATA_LOG_FILTER` - tracing filter when `RUST_LOG` is unset

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use khata_db::Database;
use tower_http::trace::TraceLayer;

pub use crate::config::AppConfig;
pub use crate::error::{ApiError, ApiResult};

/// Shared application state.
pub struct AppState {
    pub db: Database,
}

pub type SharedState = Arc<AppState>;

/// Builds the application router.
pub fn app(db: Database) -> Router {
    let state = Arc::new(AppState { db });

    Router::new()
        .nest("/api", handlers::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
