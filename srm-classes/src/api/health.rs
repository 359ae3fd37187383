//! Health, banner and subject catalog endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use srm_common::subjects::{catalog, SubjectInfo};

use super::DataResponse;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub database: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database probe failed");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "srm-classes".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

/// GET /
pub async fn service_banner() -> &'static str {
    "School records manager: class composition service"
}

/// GET /subjects
pub async fn list_subjects() -> Json<DataResponse<Vec<SubjectInfo>>> {
    Json(DataResponse::counted(catalog()))
}

/// Build health and catalog routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_banner))
        .route("/health", get(health))
        .route("/subjects", get(list_subjects))
}
