//! HTTP routes for driver management.
//!
//! # Responsibility
//! - Expose `/api/driver` endpoints over `DriverService`.
//! - Validate request bodies before any core call.
//! - Translate absence to 404 and core failures to 500.
//!
//! # Invariants
//! - Store calls never run on the async executor threads.
//! - Every response body is JSON with a `message` field.

use crate::error::ApiError;
use crate::validation::{validate_create, validate_update, DriverValidationError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use driver_core::{
    BaseService, DriverCreateDto, DriverDto, DriverId, DriverService, RepoResult,
    SqliteDriverRepository,
};
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Drivers created per `insert-random` call.
pub const INSERT_RANDOM_COUNT: usize = 10;
pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

pub type SharedDriverService = Arc<DriverService<SqliteDriverRepository>>;

#[derive(Clone)]
struct AppState {
    service: SharedDriverService,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    page_number: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct NameParams {
    name: Option<String>,
}

/// Builds the driver API router.
pub fn router(service: SharedDriverService) -> Router {
    Router::new()
        .route("/api/driver", post(create_driver).get(get_all_drivers))
        .route("/api/driver/insert-random", post(insert_random_drivers))
        .route("/api/driver/alphabetized", get(get_drivers_alphabetized))
        .route("/api/driver/alphabetize-name", get(alphabetize_name))
        .route(
            "/api/driver/{id}",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
        .with_state(AppState { service })
}

/// Location of a single driver resource.
pub fn driver_location(id: DriverId) -> String {
    format!("/api/driver/{id}")
}

async fn insert_random_drivers(State(state): State<AppState>) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while inserting random drivers";
    let count = call_service(&state, FAILURE, |service| {
        service.insert_random(INSERT_RANDOM_COUNT)
    })
    .await?;

    info!("event=http_insert_random module=api status=ok count={count}");
    Ok(Json(json!({
        "message": format!("{count} random drivers inserted successfully"),
    }))
    .into_response())
}

async fn create_driver(
    State(state): State<AppState>,
    payload: Result<Json<DriverCreateDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while creating the driver";
    let Json(dto) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    validate_create(&dto).map_err(validation_error)?;

    let created = dto.clone();
    let id = call_service(&state, FAILURE, move |service| service.create(&created)).await?;

    info!("event=http_create_driver module=api status=ok id={id}");
    let driver = DriverDto {
        id,
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        phone_number: dto.phone_number,
    };
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, driver_location(id))],
        Json(json!({
            "message": "Driver created successfully",
            "id": id,
            "driver": driver,
        })),
    )
        .into_response())
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while retrieving the driver";
    let driver = call_service(&state, FAILURE, move |service| service.get_by_id(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Driver not found".to_string()))?;

    info!("event=http_get_driver module=api status=ok id={id}");
    Ok(Json(json!({
        "message": "Driver retrieved successfully",
        "driver": driver,
    }))
    .into_response())
}

async fn get_all_drivers(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while retrieving the drivers";
    let page_number = params.page_number.unwrap_or(DEFAULT_PAGE_NUMBER);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let drivers = call_service(&state, FAILURE, move |service| {
        service.get_all(page_number, page_size)
    })
    .await?;

    info!(
        "event=http_get_all_drivers module=api status=ok page_number={page_number} page_size={page_size} count={}",
        drivers.len()
    );
    Ok(Json(json!({
        "message": "Drivers retrieved successfully",
        "drivers": drivers,
    }))
    .into_response())
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
    payload: Result<Json<DriverDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while updating the driver";
    let Json(dto) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    validate_update(&dto).map_err(validation_error)?;

    call_service(&state, FAILURE, move |service| service.update(id, &dto)).await?;

    info!("event=http_update_driver module=api status=ok id={id}");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while deleting the driver";
    call_service(&state, FAILURE, move |service| service.delete(id)).await?;

    info!("event=http_delete_driver module=api status=ok id={id}");
    Ok(Json(json!({ "message": "Driver deleted successfully" })).into_response())
}

async fn get_drivers_alphabetized(State(state): State<AppState>) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while retrieving and alphabetizing the drivers";
    let drivers = call_service(&state, FAILURE, |service| service.list_alphabetized()).await?;

    info!(
        "event=http_get_drivers_alphabetized module=api status=ok count={}",
        drivers.len()
    );
    Ok(Json(json!({
        "message": "Drivers retrieved and alphabetized successfully",
        "drivers": drivers,
    }))
    .into_response())
}

async fn alphabetize_name(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "An error occurred while alphabetizing the name";
    let name = params.name.unwrap_or_default();
    let alphabetized =
        call_service(&state, FAILURE, move |service| Ok(service.alphabetize_name(&name))).await?;

    info!("event=http_alphabetize_name module=api status=ok");
    Ok(Json(json!({
        "message": "Name alphabetized successfully",
        "alphabetizedName": alphabetized,
    }))
    .into_response())
}

/// Runs a blocking service call on the blocking pool.
///
/// A store failure becomes `ApiError::Storage`; a panicked or cancelled
/// task becomes `ApiError::Unexpected`.
async fn call_service<T, F>(state: &AppState, failure: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&DriverService<SqliteDriverRepository>) -> RepoResult<T> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|err| ApiError::Unexpected {
            message: failure,
            details: err.to_string(),
        })?
        .map_err(|source| ApiError::Storage {
            message: failure,
            source,
        })
}

fn validation_error(errors: Vec<DriverValidationError>) -> ApiError {
    ApiError::Validation(errors.iter().map(ToString::to_string).collect())
}
