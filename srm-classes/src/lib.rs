//! srm-classes library - class composition service
//!
//! Creates, edits, removes and reads school classes: a (standard, section,
//! academic year) grouping with per-subject teacher assignments and a student
//! roster. Writes are all-or-nothing.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod composer;
pub mod db;
pub mod error;
pub mod models;
pub mod projection;
pub mod request;

pub use composer::{ClassComposer, ComposerConfig};
pub use db::{Directory, SqliteDirectory};
pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Class write/read service
    pub composer: Arc<ClassComposer>,
    /// Student/teacher records
    pub directory: Arc<SqliteDirectory>,
}

impl AppState {
    /// Create new application state over an initialized pool
    pub fn new(db: SqlitePool, config: ComposerConfig) -> Self {
        let directory = Arc::new(SqliteDirectory::new(db.clone()));
        let composer = Arc::new(ClassComposer::new(
            db.clone(),
            directory.clone(),
            config,
        ));

        Self {
            db,
            composer,
            directory,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::class_routes())
        .merge(api::directory_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
