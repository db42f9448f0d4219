mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::App;
use crate::catalog::{Catalog, CatalogSource, CatalogState};
use crate::storage::KeyValueStore;

/// The application shared by all requests. The mutex serializes every event,
/// so handlers see the same one-at-a-time ordering a single UI thread would.
pub type SharedApp = Arc<Mutex<App<Arc<dyn KeyValueStore>>>>;

pub fn shared(app: App<Arc<dyn KeyValueStore>>) -> SharedApp {
    Arc::new(Mutex::new(app))
}

/// Fetches the catalog off the request path. Pages render the loading state
/// until the fetch resolves; the lock is only taken to store the result.
pub fn spawn_catalog_load(state: SharedApp, source: CatalogSource) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let loaded = CatalogState::from_result(Catalog::load(&source).await);
        match state.lock() {
            Ok(mut app) => app.set_catalog(loaded),
            Err(_) => tracing::error!("Application state lock poisoned; catalog discarded"),
        }
    })
}

pub fn create_router(state: SharedApp) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        // Catalog
        .route("/courses", get(handlers::list_courses))
        .route("/courses/{id}", get(handlers::get_course))
        .route("/departments", get(handlers::list_departments))
        // Schedule
        .route("/schedule", get(handlers::get_schedule))
        .route("/schedule", delete(handlers::clear_schedule))
        .route("/schedule/{id}", post(handlers::add_to_schedule))
        .route("/schedule/{id}", delete(handlers::remove_from_schedule))
        .route("/schedule/{id}/toggle", post(handlers::toggle_in_schedule));

    let page = Router::new()
        .route("/", get(handlers::index))
        .route("/fragments/catalog", get(handlers::catalog_fragment))
        .route("/fragments/schedule", get(handlers::schedule_fragment))
        .route("/filter", post(handlers::select_department))
        .route("/schedule/toggle/{id}", post(handlers::toggle_course))
        .route("/schedule/remove/{id}", post(handlers::remove_course))
        .route("/schedule/clear", post(handlers::confirm_clear))
        .route("/panel/open", post(handlers::open_panel))
        .route("/panel/close", post(handlers::close_panel))
        .route("/panel/toggle", post(handlers::toggle_panel));

    page.nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
