//! Prediction handler

use axum::{body::Bytes, extract::State, Json};

use crate::models::PredictRequest;
use crate::{AppError, AppResult, AppState};

/// Predict one row object or an array of row objects.
///
/// Columns a row omits are filled with the schema defaults. Responds with
/// one label per row, in request order.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<Vec<String>>> {
    let request = parse_body(&body)?;
    let rows = request.into_rows();
    let count = rows.len();

    let service = state.service.clone();
    let labels = tokio::task::spawn_blocking(move || service.predict(&rows)).await??;

    tracing::debug!("Predicted {} row(s)", count);
    Ok(Json(labels))
}

fn parse_body(body: &[u8]) -> AppResult<PredictRequest> {
    let no_input = || AppError::ValidationError("No input data provided".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_input());
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON body: {e}")))?;
    if value.is_null() {
        return Err(no_input());
    }

    let request: PredictRequest = serde_json::from_value(value).map_err(|_| {
        AppError::ValidationError(
            "Expected an object or an array of objects with number, string or null values"
                .to_string(),
        )
    })?;
    if request.is_empty() {
        return Err(no_input());
    }
    Ok(request)
}
