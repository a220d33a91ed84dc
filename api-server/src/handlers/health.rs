//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use studata_core::constants::{APP_NAME, APP_VERSION};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    records: usize,
    timestamp: i64,
}

/// Plain liveness message
pub async fn index() -> String {
    format!("{APP_NAME} prediction and explanation API is running.")
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        environment: state.config.environment.clone(),
        records: state.service.record_count(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
