use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::PersonRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::Person;

fn person_from_request(id: i64, req: PersonRequest) -> Person {
    Person {
        id,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        phone: req.phone,
        is_active: req.is_active,
        created_at: Utc::now(),
    }
}

pub async fn list_persons(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let persons = state.store.list_persons()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(persons)))
}

pub async fn create_person(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PersonRequest>,
) -> impl IntoResponse {
    let person = person_from_request(0, req);
    let errors = person.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let id = state.store.create_person(&person)?;
    let person = state.store.get_person(id)?.or_not_found("Person not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(person))))
}

pub async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let person = state.store.get_person(id)?.or_not_found("Person not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(person)))
}

pub async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<PersonRequest>,
) -> impl IntoResponse {
    let existing = state.store.get_person(id)?.or_not_found("Person not found")?;

    let mut person = person_from_request(id, req);
    person.created_at = existing.created_at;
    let errors = person.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.store.update_person(&person)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(person)))
}

pub async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !state.store.delete_person(id)? {
        return Err(ApiError::not_found("Person not found"));
    }
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// A person's active assignments, one row per current version.
pub async fn list_person_assignments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.store.get_person(id)?.or_not_found("Person not found")?;
    let assignments = state.store.list_current_assignments_for_person(id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(assignments)))
}
