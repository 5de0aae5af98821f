use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::CompanyRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::Company;

fn company_from_request(id: i64, req: CompanyRequest) -> Company {
    Company {
        id,
        name: req.name,
        website: req.website,
        email: req.email,
        phone: req.phone,
        is_active: req.is_active,
        created_at: Utc::now(),
    }
}

pub async fn list_companies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let companies = state.store.list_companies()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(companies)))
}

pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompanyRequest>,
) -> impl IntoResponse {
    let company = company_from_request(0, req);
    let errors = company.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let id = state.store.create_company(&company)?;
    let company = state.store.get_company(id)?.or_not_found("Company not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(company))))
}

pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let company = state.store.get_company(id)?.or_not_found("Company not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(company)))
}

pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CompanyRequest>,
) -> impl IntoResponse {
    let existing = state.store.get_company(id)?.or_not_found("Company not found")?;

    let mut company = company_from_request(id, req);
    company.created_at = existing.created_at;
    let errors = company.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.store.update_company(&company)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(company)))
}

pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !state.store.delete_company(id)? {
        return Err(ApiError::not_found("Company not found"));
    }
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
