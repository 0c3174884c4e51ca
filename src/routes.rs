//! Router assembly for both deployment variants.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Variant;
use crate::handlers::{self, AppState};
use crate::intake_handler;

/// Builds the full application for the configured variant.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    tracing::info!("Serving static files from {}", static_dir.display());

    let entity_routes = match state.config.variant {
        Variant::Fleet => fleet_routes(),
        Variant::Intake => intake_routes(),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .merge(entity_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn fleet_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route("/clients/new", get(handlers::new_client))
        .route(
            "/drivers",
            get(handlers::list_drivers).post(handlers::create_driver),
        )
        .route("/drivers/new", get(handlers::new_driver))
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route("/vehicles/new", get(handlers::new_vehicle))
        .route("/trips", get(handlers::list_trips).post(handlers::create_trip))
        .route("/trips/new", get(handlers::new_trip))
        .route("/trips/export", get(handlers::export_trips))
}

fn intake_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/clients",
            get(intake_handler::list_clients)
                .post(intake_handler::create_client)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/clients/new", get(intake_handler::new_client))
        .route("/clients/:client_id", get(intake_handler::client_detail))
}
