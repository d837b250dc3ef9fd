//! mcat-ui library interface
//!
//! Serves the catalog that mcat-ix wrote: song listing and CRUD, audio
//! streaming with byte ranges, thumbnail static files, and a minimal
//! HTML library page.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::services::ServeDir;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database connection pool
    pub db: SqlitePool,
    /// Directory holding the thumbnails mcat-ix wrote
    pub thumbnail_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, thumbnail_dir: PathBuf) -> Self {
        Self {
            db,
            thumbnail_dir,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let thumbs = ServeDir::new(&state.thumbnail_dir);

    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .nest("/api", api::song_routes())
        .merge(api::health_routes())
        // Thumbnails as static files
        .nest_service("/thumbs", thumbs)
        .with_state(state)
}
