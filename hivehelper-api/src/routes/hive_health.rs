/// Hive health endpoints
///
/// Sensor readings are attached to any existing hive; they are not scoped to
/// the hive's owner. Readings get their timestamp from the server.
///
/// # Endpoints
///
/// - `GET /health` - Every reading, grouped by hive ID
/// - `GET /health/:hive_id` - Readings of one hive, oldest first
/// - `POST /health` - Record a reading
/// - `PUT /health/:health_id` - Update supplied readings
/// - `DELETE /health/:health_id` - Delete a reading
///
/// Update and delete of an unknown reading succeed without effect.

use crate::{
    app::AppState,
    error::{ApiResult, ServiceResultExt},
    extract::{number_or_string, ApiJson, ApiPath},
    routes::MessageResponse,
};
use axum::{extract::State, Json};
use hivehelper_shared::{
    models::health_record::UpdateHealthRecord,
    services::health_records::{self, HealthListing, NewHealthRecord},
};
use serde::Deserialize;

const RETRIEVE_FAILED: &str = "Failed to retrieve health records. Please try again later.";

/// Create body
#[derive(Debug, Deserialize)]
pub struct CreateHealthRequest {
    #[serde(default, deserialize_with = "number_or_string")]
    pub hive_id: Option<i64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub activity_level: Option<f64>,
}

/// Update body
#[derive(Debug, Deserialize)]
pub struct UpdateHealthRequest {
    #[serde(default, deserialize_with = "number_or_string")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub activity_level: Option<f64>,
}

pub async fn list_all_health_records(State(state): State<AppState>) -> ApiResult<Json<HealthListing>> {
    let listing = health_records::list_health_records(state.store.as_ref(), None)
        .await
        .or_fail(RETRIEVE_FAILED)?;

    Ok(Json(listing))
}

pub async fn list_hive_health_records(
    State(state): State<AppState>,
    ApiPath(hive_id): ApiPath<i64>,
) -> ApiResult<Json<HealthListing>> {
    let listing = health_records::list_health_records(state.store.as_ref(), Some(hive_id))
        .await
        .or_fail(RETRIEVE_FAILED)?;

    Ok(Json(listing))
}

/// Records a reading
///
/// # Errors
///
/// - 400 if any field is missing
/// - 404 if the hive does not exist
pub async fn create_health_record(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateHealthRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let input = NewHealthRecord {
        hive_id: req.hive_id,
        temperature: req.temperature,
        humidity: req.humidity,
        activity_level: req.activity_level,
    };

    health_records::create_health_record(state.store.as_ref(), input)
        .await
        .or_fail("Failed to create health record. Please try again later.")?;

    Ok(Json(MessageResponse::new("Health record creation successful.")))
}

pub async fn update_health_record(
    State(state): State<AppState>,
    ApiPath(health_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateHealthRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let changes = UpdateHealthRecord {
        temperature: req.temperature,
        humidity: req.humidity,
        activity_level: req.activity_level,
    };

    health_records::update_health_record(state.store.as_ref(), health_id, changes)
        .await
        .or_fail("Failed to update health record. Please try again later.")?;

    Ok(Json(MessageResponse::new("Health record update successful.")))
}

pub async fn delete_health_record(
    State(state): State<AppState>,
    ApiPath(health_id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    health_records::delete_health_record(state.store.as_ref(), health_id)
        .await
        .or_fail("Failed to delete health record. Please try again later.")?;

    Ok(Json(MessageResponse::new("Health record deletion successful.")))
}
