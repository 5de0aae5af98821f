use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::server::AppState;
use crate::server::response::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct StylesheetParams {
    #[serde(default)]
    pub minify: bool,
}

/// Serves the generated stylesheet for all active themes as `text/css`.
pub async fn themes_css(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StylesheetParams>,
) -> impl IntoResponse {
    let css = if params.minify {
        state.themes.generate_dynamic_css_minified()?
    } else {
        state.themes.generate_dynamic_css()?
    };

    Ok::<_, ApiError>((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        css,
    ))
}
