use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{CloneThemeRequest, ThemeRequest};
use crate::server::response::{ApiError, ApiResponse};
use crate::types::UnitTypeTheme;

fn theme_from_request(id: i64, req: ThemeRequest) -> UnitTypeTheme {
    let now = Utc::now();
    UnitTypeTheme {
        id,
        name: req.name,
        css_class_suffix: req.css_class_suffix,
        display_label: req.display_label,
        icon: req.icon,
        primary_color: req.primary_color,
        secondary_color: req.secondary_color,
        text_color: req.text_color,
        border_color: req.border_color,
        hover_shadow_color: req.hover_shadow_color,
        border_width: req.border_width,
        border_style: req.border_style,
        hover_shadow_intensity: req.hover_shadow_intensity,
        high_contrast_mode: req.high_contrast_mode,
        is_default: req.is_default,
        is_active: req.is_active,
        datetime_updated: now,
        created_at: now,
    }
}

pub async fn list_themes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let themes = state.themes.list()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(themes)))
}

pub async fn create_theme(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ThemeRequest>,
) -> impl IntoResponse {
    let (theme, warnings) = state.themes.create(theme_from_request(0, req))?;
    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_warnings(theme, warnings)),
    ))
}

pub async fn get_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let theme = state.themes.get(id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(theme)))
}

/// The guaranteed-usable default theme; tagged with whether it came from
/// the store or the emergency fallback.
pub async fn get_default_theme(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(state.themes.get_default_theme()))
}

pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ThemeRequest>,
) -> impl IntoResponse {
    let (theme, warnings) = state.themes.update(theme_from_request(id, req))?;
    Ok::<_, ApiError>(Json(ApiResponse::success_with_warnings(theme, warnings)))
}

pub async fn delete_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.themes.delete(id)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn clone_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CloneThemeRequest>,
) -> impl IntoResponse {
    let theme = state.themes.clone_theme(id, &req.name)?;
    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(theme))))
}

pub async fn list_theme_unit_types(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.themes.get(id)?;
    let unit_types = state.themes.get_unit_types_using_theme(id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(unit_types)))
}
