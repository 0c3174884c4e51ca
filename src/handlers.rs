use crate::config::Config;
use crate::db::Database;
use crate::db_storage::FleetStore;
use crate::errors::AppError;
use crate::export;
use crate::models::*;
use crate::views;
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store file; each request opens its own connection from it.
    pub db: Database,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "nemt-records",
            "variant": state.config.variant.as_str(),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(views::index(state.config.variant))
}

/// Raw `key=value` pairs of an urlencoded body, in submission order.
type FormPairs = Vec<(String, String)>;

/// Decodes form pairs into `T`, keeping the last value of a repeated key.
fn decode_form<T: DeserializeOwned>(pairs: FormPairs) -> Result<T, AppError> {
    let mut fields: FormPairs = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(field) => field.1 = value,
            None => fields.push((key, value)),
        }
    }

    let encoded = serde_urlencoded::to_string(&fields)
        .map_err(|e| AppError::BadRequest(format!("Failed to read form body: {}", e)))?;
    serde_urlencoded::from_str(&encoded)
        .map_err(|e| AppError::BadRequest(format!("Failed to deserialize form body: {}", e)))
}

// ---- Clients ----

/// GET /clients
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let clients = store.list_clients().await?;
    store.close().await?;

    tracing::debug!("Listing {} clients", clients.len());
    Ok(Html(views::clients_page(&clients)))
}

/// GET /clients/new
pub async fn new_client() -> Html<String> {
    Html(views::client_form())
}

/// POST /clients
///
/// Missing `first_name` or `last_name` is rejected with 400 before any storage
/// access; every other field defaults to an empty string.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<Redirect, AppError> {
    let client: NewClient = decode_form(form?.0)?;

    let mut store = FleetStore::open(&state.db).await?;
    let client_id = store.create_client(&client).await?;
    store.close().await?;

    tracing::info!("Created client {}", client_id);
    Ok(Redirect::to("/clients"))
}

// ---- Drivers ----

/// GET /drivers
pub async fn list_drivers(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let drivers = store.list_drivers().await?;
    store.close().await?;

    tracing::debug!("Listing {} drivers", drivers.len());
    Ok(Html(views::drivers_page(&drivers)))
}

/// GET /drivers/new
pub async fn new_driver() -> Html<String> {
    Html(views::driver_form())
}

/// POST /drivers
pub async fn create_driver(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<Redirect, AppError> {
    let driver: NewDriver = decode_form(form?.0)?;

    let mut store = FleetStore::open(&state.db).await?;
    let driver_id = store.create_driver(&driver).await?;
    store.close().await?;

    tracing::info!(
        "Created driver {} (assigned vehicle: {:?})",
        driver_id,
        driver.assigned_vehicle_id
    );
    Ok(Redirect::to("/drivers"))
}

// ---- Vehicles ----

/// GET /vehicles
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let vehicles = store.list_vehicles().await?;
    store.close().await?;

    tracing::debug!("Listing {} vehicles", vehicles.len());
    Ok(Html(views::vehicles_page(&vehicles)))
}

/// GET /vehicles/new
pub async fn new_vehicle() -> Html<String> {
    Html(views::vehicle_form())
}

/// POST /vehicles
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<Redirect, AppError> {
    let vehicle: NewVehicle = decode_form(form?.0)?;

    let mut store = FleetStore::open(&state.db).await?;
    let vehicle_id = store.create_vehicle(&vehicle).await?;
    store.close().await?;

    tracing::info!("Created vehicle {}", vehicle_id);
    Ok(Redirect::to("/vehicles"))
}

// ---- Trips ----

/// GET /trips
///
/// Client, driver and vehicle columns come from a join at read time.
pub async fn list_trips(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let trips = store.list_trips().await?;
    store.close().await?;

    tracing::debug!("Listing {} trips", trips.len());
    Ok(Html(views::trips_page(&trips)))
}

/// GET /trips/export
///
/// Client trip log as a dated CSV attachment. An empty log still carries the
/// header row.
pub async fn export_trips(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let rows = store.trip_log().await?;
    store.close().await?;

    let body = export::trip_log_csv(&rows)?;
    let filename = export::trip_log_filename(chrono::Utc::now().date_naive());

    tracing::info!("Exported {} trips to {}", rows.len(), filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /trips/new
pub async fn new_trip(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut store = FleetStore::open(&state.db).await?;
    let clients = store.client_options().await?;
    let drivers = store.driver_options().await?;
    let vehicles = store.vehicle_options().await?;
    store.close().await?;

    Ok(Html(views::trip_form(&clients, &drivers, &vehicles)))
}

/// POST /trips
///
/// `round_trip` is stored as 1 only for the value "1"; blank mileage is 0 and
/// non-numeric mileage is a 400. Referenced ids are stored without lookup.
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<Redirect, AppError> {
    let trip: NewTrip = decode_form(form?.0)?;

    let mut store = FleetStore::open(&state.db).await?;
    let trip_id = store.create_trip(&trip).await?;
    store.close().await?;

    tracing::info!(
        "Created trip {} (client {}, driver {}, vehicle {})",
        trip_id,
        trip.client_id,
        trip.driver_id,
        trip.vehicle_id
    );
    Ok(Redirect::to("/trips"))
}
