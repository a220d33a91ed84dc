//! Model info handler

use axum::{extract::State, Json};
use studata_core::ModelInfo;

use crate::AppState;

/// Layout, classes and training metadata of the loaded pipeline
pub async fn info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.service.model_info())
}
