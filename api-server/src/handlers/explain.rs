//! Explanation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use studata_core::FeatureContribution;

use crate::{AppResult, AppState};

/// Cached global ranking, top entries only
pub async fn global(State(state): State<AppState>) -> Json<Vec<FeatureContribution>> {
    Json(state.service.global_explanation().to_vec())
}

/// Top features behind the prediction for one student
pub async fn local(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Vec<FeatureContribution>>> {
    let service = state.service.clone();
    let explanation = tokio::task::spawn_blocking(move || service.local_explanation(id)).await??;

    tracing::debug!(
        "Explained student {} (predicted {})",
        id,
        explanation.prediction
    );
    Ok(Json(explanation.contributions))
}
