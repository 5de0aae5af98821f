use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::JobTitleRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::JobTitle;

pub async fn list_job_titles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let job_titles = state.store.list_job_titles()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(job_titles)))
}

pub async fn create_job_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JobTitleRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Job title name cannot be empty"));
    }

    let job_title = JobTitle {
        id: 0,
        name: req.name,
        short_name: req.short_name,
        created_at: Utc::now(),
    };
    let id = state.store.create_job_title(&job_title)?;
    let job_title = state
        .store
        .get_job_title(id)?
        .or_not_found("Job title not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(job_title))))
}

pub async fn get_job_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let job_title = state
        .store
        .get_job_title(id)?
        .or_not_found("Job title not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(job_title)))
}

pub async fn update_job_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<JobTitleRequest>,
) -> impl IntoResponse {
    let mut job_title = state
        .store
        .get_job_title(id)?
        .or_not_found("Job title not found")?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Job title name cannot be empty"));
    }
    job_title.name = req.name;
    job_title.short_name = req.short_name;
    state.store.update_job_title(&job_title)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(job_title)))
}

pub async fn delete_job_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !state.store.delete_job_title(id)? {
        return Err(ApiError::not_found("Job title not found"));
    }
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
