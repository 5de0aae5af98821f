use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::server::AppState;
use crate::server::dto::{HistoricalAssignmentUpdate, HistoryParams, TerminateRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::AssignmentCandidate;

/// Create-or-update entry point: version 1 for a new business key, the
/// next version otherwise. Business-rule advisories ride along as
/// warnings.
pub async fn create_or_update_assignment(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<AssignmentCandidate>,
) -> impl IntoResponse {
    let (assignment, warnings) = state.assignments.create_or_update(candidate)?;
    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_warnings(assignment, warnings)),
    ))
}

pub async fn get_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let assignment = state
        .store
        .get_assignment(id)?
        .or_not_found("Assignment not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(assignment)))
}

pub async fn assignment_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    let history =
        state
            .assignments
            .history(params.person_id, params.unit_id, params.job_title_id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(history)))
}

/// In-place edit of a historical version; current versions go through the
/// create-or-update entry point.
pub async fn update_historical_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<HistoricalAssignmentUpdate>,
) -> impl IntoResponse {
    let mut assignment = state
        .store
        .get_assignment(id)?
        .or_not_found("Assignment not found")?;

    assignment.percentage = req.percentage;
    assignment.is_ad_interim = req.is_ad_interim;
    assignment.is_unit_boss = req.is_unit_boss;
    assignment.notes = req.notes;
    assignment.flags = req.flags;
    assignment.valid_from = req.valid_from;
    assignment.valid_to = req.valid_to;

    let updated = state.assignments.update_historical(&assignment)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(updated)))
}

pub async fn terminate_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<TerminateRequest>,
) -> impl IntoResponse {
    let assignment = state.assignments.terminate(id, req.termination_date)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(assignment)))
}

pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let (deleted, warning) = state.assignments.delete(id)?;
    if !deleted {
        return Err(ApiError::not_found("Assignment not found"));
    }
    let warnings = warning.into_iter().collect();
    Ok::<_, ApiError>(Json(ApiResponse::success_with_warnings(
        json!({ "deleted": true }),
        warnings,
    )))
}
