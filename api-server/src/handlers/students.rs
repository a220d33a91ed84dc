//! Student handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use studata_core::RiskLevel;

use crate::models::{StudentDetail, StudentList, StudentsQuery, DEFAULT_STUDENT_LIMIT};
use crate::{AppError, AppResult, AppState};

/// List cached predictions, optionally filtered by risk level
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StudentsQuery>,
) -> AppResult<Json<StudentList>> {
    let risk = match query.risk.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(RiskLevel::parse(raw).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown risk level '{raw}'"))
        })?),
    };
    let limit = query.limit.unwrap_or(DEFAULT_STUDENT_LIMIT);

    let total = state.service.students(None, risk).len();
    let students = state.service.students(Some(limit), risk);
    Ok(Json(StudentList { total, students }))
}

/// Cached prediction and local explanation for one student
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<StudentDetail>> {
    let summary = state.service.student(id)?;

    let service = state.service.clone();
    let explanation = tokio::task::spawn_blocking(move || service.local_explanation(id)).await??;

    Ok(Json(StudentDetail::new(summary, explanation)))
}
