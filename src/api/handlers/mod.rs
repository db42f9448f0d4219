use std::sync::MutexGuard;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::Deserialize;

use super::SharedApp;
use crate::app::{App, Effect, Event, Region};
use crate::catalog::{Catalog, CatalogState};
use crate::filter::Filter;
use crate::models::*;
use crate::storage::KeyValueStore;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn lock(state: &SharedApp) -> ApiResult<MutexGuard<'_, App<std::sync::Arc<dyn KeyValueStore>>>> {
    state.lock().map_err(|_| internal_error("application state lock poisoned"))
}

/// The loaded catalog, or 503 while it is loading or after it failed.
fn loaded(state: &CatalogState) -> ApiResult<&Catalog> {
    match state {
        CatalogState::Loaded(catalog) => Ok(catalog),
        CatalogState::Loading => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Catalog is still loading".to_string(),
        )),
        CatalogState::Failed(_) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Catalog failed to load".to_string(),
        )),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Page and fragments
// ============================================================

pub async fn index(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    Ok(Html(lock(&state)?.render_page()))
}

pub async fn catalog_fragment(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    Ok(Html(lock(&state)?.render_region(Region::Catalog)))
}

pub async fn schedule_fragment(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    Ok(Html(lock(&state)?.render_region(Region::Schedule)))
}

/// Applies one event and responds with the regions it touched.
fn dispatch_html(state: &SharedApp, event: Event) -> ApiResult<Html<String>> {
    let mut app = lock(state)?;
    app.dispatch_and_render(event)
        .map(Html)
        .map_err(internal_error)
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    pub department: String,
}

pub async fn select_department(
    State(state): State<SharedApp>,
    Form(form): Form<FilterForm>,
) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::SelectDepartment(Filter::parse(&form.department)))
}

pub async fn toggle_course(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::ToggleCourse(id))
}

pub async fn remove_course(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::RemoveCourse(id))
}

#[derive(Debug, Deserialize)]
pub struct ClearForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

/// Clearing requires the page's confirmation step to have passed `confirm=true`.
pub async fn confirm_clear(
    State(state): State<SharedApp>,
    Form(form): Form<ClearForm>,
) -> ApiResult<Html<String>> {
    if form.confirm.as_deref() != Some("true") {
        tracing::warn!("Validation error: clear schedule without confirmation");
        return Err((
            StatusCode::BAD_REQUEST,
            "Clearing the schedule requires confirmation".to_string(),
        ));
    }
    dispatch_html(&state, Event::ClearSchedule)
}

pub async fn open_panel(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::OpenPanel)
}

pub async fn close_panel(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::ClosePanel)
}

pub async fn toggle_panel(State(state): State<SharedApp>) -> ApiResult<Html<String>> {
    dispatch_html(&state, Event::TogglePanel)
}

// ============================================================
// Catalog (JSON)
// ============================================================

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    pub department: Option<String>,
}

pub async fn list_courses(
    State(state): State<SharedApp>,
    Query(query): Query<ListCoursesQuery>,
) -> ApiResult<Json<Vec<Course>>> {
    let app = lock(&state)?;
    let catalog = loaded(app.catalog())?;
    let filter = query
        .department
        .as_deref()
        .map(Filter::parse)
        .unwrap_or_default();

    let courses = catalog
        .courses()
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<Json<Course>> {
    let app = lock(&state)?;
    let course = loaded(app.catalog())?.get(&id).cloned();
    course
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Course not found".to_string()))
}

pub async fn list_departments(State(state): State<SharedApp>) -> ApiResult<Json<Vec<String>>> {
    let app = lock(&state)?;
    let departments = loaded(app.catalog())?.departments().to_vec();
    Ok(Json(departments))
}

// ============================================================
// Schedule (JSON)
// ============================================================

fn dispatch_json(state: &SharedApp, event: Event) -> ApiResult<(Effect, ScheduleSummary)> {
    let mut app = lock(state)?;
    let effect = app.dispatch(event).map_err(internal_error)?;
    Ok((effect, app.schedule().summary()))
}

pub async fn get_schedule(State(state): State<SharedApp>) -> ApiResult<Json<ScheduleSummary>> {
    Ok(Json(lock(&state)?.schedule().summary()))
}

pub async fn add_to_schedule(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<ScheduleSummary>)> {
    {
        let app = lock(&state)?;
        loaded(app.catalog())?;
    }
    match dispatch_json(&state, Event::AddCourse(id))? {
        (Effect::NotInCatalog, _) => Err((StatusCode::NOT_FOUND, "Course not found".to_string())),
        (Effect::Added { changed: true }, summary) => Ok((StatusCode::CREATED, Json(summary))),
        (_, summary) => Ok((StatusCode::OK, Json(summary))),
    }
}

pub async fn toggle_in_schedule(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScheduleSummary>> {
    dispatch_json(&state, Event::ToggleCourse(id)).map(|(_, summary)| Json(summary))
}

pub async fn remove_from_schedule(
    State(state): State<SharedApp>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScheduleSummary>> {
    dispatch_json(&state, Event::RemoveCourse(id)).map(|(_, summary)| Json(summary))
}

pub async fn clear_schedule(State(state): State<SharedApp>) -> ApiResult<Json<ScheduleSummary>> {
    dispatch_json(&state, Event::ClearSchedule).map(|(_, summary)| Json(summary))
}
