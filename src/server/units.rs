use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{UnitRequest, UnitTypeRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::{Unit, UnitType};

// Unit types

pub async fn list_unit_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let unit_types = state.store.list_unit_types()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(unit_types)))
}

fn check_theme_reference(state: &AppState, theme_id: Option<i64>) -> Result<(), ApiError> {
    if let Some(theme_id) = theme_id {
        if state.store.get_theme(theme_id)?.is_none() {
            return Err(ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: format!("theme {theme_id} does not exist"),
                field_errors: Vec::new(),
            });
        }
    }
    Ok(())
}

pub async fn create_unit_type(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnitTypeRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Unit type name cannot be empty"));
    }
    check_theme_reference(&state, req.theme_id)?;

    let unit_type = UnitType {
        id: 0,
        name: req.name,
        theme_id: req.theme_id,
        created_at: Utc::now(),
    };
    let id = state.store.create_unit_type(&unit_type)?;
    let unit_type = state
        .store
        .get_unit_type(id)?
        .or_not_found("Unit type not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(unit_type))))
}

pub async fn get_unit_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let unit_type = state
        .store
        .get_unit_type(id)?
        .or_not_found("Unit type not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(unit_type)))
}

pub async fn update_unit_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UnitTypeRequest>,
) -> impl IntoResponse {
    let mut unit_type = state
        .store
        .get_unit_type(id)?
        .or_not_found("Unit type not found")?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Unit type name cannot be empty"));
    }
    check_theme_reference(&state, req.theme_id)?;

    unit_type.name = req.name;
    unit_type.theme_id = req.theme_id;
    state.store.update_unit_type(&unit_type)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(unit_type)))
}

pub async fn delete_unit_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !state.store.delete_unit_type(id)? {
        return Err(ApiError::not_found("Unit type not found"));
    }
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

// Units

fn unit_from_request(id: i64, req: UnitRequest) -> Unit {
    Unit {
        id,
        name: req.name,
        short_name: req.short_name,
        unit_type_id: req.unit_type_id,
        parent_unit_id: req.parent_unit_id,
        company_id: req.company_id,
        created_at: Utc::now(),
    }
}

fn check_unit_references(state: &AppState, unit: &Unit) -> Result<(), ApiError> {
    let mut missing = Vec::new();
    if state.store.get_unit_type(unit.unit_type_id)?.is_none() {
        missing.push(format!("unit type {} does not exist", unit.unit_type_id));
    }
    if let Some(parent_id) = unit.parent_unit_id {
        if state.store.get_unit(parent_id)?.is_none() {
            missing.push(format!("parent unit {parent_id} does not exist"));
        }
    }
    if let Some(company_id) = unit.company_id {
        if state.store.get_company(company_id)?.is_none() {
            missing.push(format!("company {company_id} does not exist"));
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: missing.join("; "),
            field_errors: Vec::new(),
        })
    }
}

pub async fn list_units(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let units = state.store.list_units()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(units)))
}

pub async fn create_unit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnitRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Unit name cannot be empty"));
    }
    let unit = unit_from_request(0, req);
    check_unit_references(&state, &unit)?;

    let id = state.store.create_unit(&unit)?;
    let unit = state.store.get_unit(id)?.or_not_found("Unit not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(unit))))
}

pub async fn get_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let unit = state.store.get_unit(id)?.or_not_found("Unit not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(unit)))
}

pub async fn update_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UnitRequest>,
) -> impl IntoResponse {
    let existing = state.store.get_unit(id)?.or_not_found("Unit not found")?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Unit name cannot be empty"));
    }
    let mut unit = unit_from_request(id, req);
    unit.created_at = existing.created_at;
    check_unit_references(&state, &unit)?;

    state.store.update_unit(&unit)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(unit)))
}

pub async fn delete_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !state.store.delete_unit(id)? {
        return Err(ApiError::not_found("Unit not found"));
    }
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// Everyone currently assigned to a unit.
pub async fn list_unit_assignments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.store.get_unit(id)?.or_not_found("Unit not found")?;
    let assignments = state.store.list_current_assignments_for_unit(id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(assignments)))
}
