use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};

use super::{assignments, companies, job_titles, persons, stylesheet, themes, units};
use crate::assignments::AssignmentService;
use crate::css::CssCache;
use crate::store::Store;
use crate::themes::ThemeService;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub assignments: AssignmentService,
    pub themes: ThemeService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_cache(store, Arc::new(CssCache::new()))
    }

    /// The cache is injectable so tests can control the TTL.
    pub fn with_cache(store: Arc<dyn Store>, cache: Arc<CssCache>) -> Self {
        Self {
            assignments: AssignmentService::new(store.clone()),
            themes: ThemeService::new(store.clone(), cache),
            store,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{id}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/persons",
            get(persons::list_persons).post(persons::create_person),
        )
        .route(
            "/persons/{id}",
            get(persons::get_person)
                .put(persons::update_person)
                .delete(persons::delete_person),
        )
        .route("/persons/{id}/assignments", get(persons::list_person_assignments))
        .route(
            "/unit-types",
            get(units::list_unit_types).post(units::create_unit_type),
        )
        .route(
            "/unit-types/{id}",
            get(units::get_unit_type)
                .put(units::update_unit_type)
                .delete(units::delete_unit_type),
        )
        .route("/units", get(units::list_units).post(units::create_unit))
        .route(
            "/units/{id}",
            get(units::get_unit)
                .put(units::update_unit)
                .delete(units::delete_unit),
        )
        .route("/units/{id}/assignments", get(units::list_unit_assignments))
        .route(
            "/job-titles",
            get(job_titles::list_job_titles).post(job_titles::create_job_title),
        )
        .route(
            "/job-titles/{id}",
            get(job_titles::get_job_title)
                .put(job_titles::update_job_title)
                .delete(job_titles::delete_job_title),
        )
        .route(
            "/assignments",
            post(assignments::create_or_update_assignment),
        )
        .route("/assignments/history", get(assignments::assignment_history))
        .route(
            "/assignments/{id}",
            get(assignments::get_assignment)
                .put(assignments::update_historical_assignment)
                .delete(assignments::delete_assignment),
        )
        .route(
            "/assignments/{id}/terminate",
            post(assignments::terminate_assignment),
        )
        .route(
            "/themes",
            get(themes::list_themes).post(themes::create_theme),
        )
        .route("/themes/default", get(themes::get_default_theme))
        .route(
            "/themes/{id}",
            get(themes::get_theme)
                .put(themes::update_theme)
                .delete(themes::delete_theme),
        )
        .route("/themes/{id}/clone", post(themes::clone_theme))
        .route("/themes/{id}/unit-types", get(themes::list_theme_unit_types));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .route("/css/themes.css", get(stylesheet::themes_css))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
