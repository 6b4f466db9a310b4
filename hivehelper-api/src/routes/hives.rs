/// Hive endpoints
///
/// All routes require a session. Mutations are limited to hives owned by the
/// session's beekeeper; ownership is checked against the store on every call.
///
/// # Endpoints
///
/// - `POST /hive` - Create a hive
/// - `GET /hive?location=&hive_name=&beekeeper_id=` - List hives (filters are ANDed)
/// - `PATCH /hive/:hive_id` - Update supplied fields of an owned hive
/// - `DELETE /hive/:hive_id` - Delete an owned hive with its readings and tasks

use crate::{
    app::AppState,
    error::{ApiResult, ServiceResultExt},
    extract::{number_or_string, ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use hivehelper_shared::{
    auth::middleware::SessionContext,
    models::hive::{Hive, HiveFilter, UpdateHive},
    services::hives::{self, NewHive},
};
use serde::Deserialize;
use validator::Validate;

/// Create and update body
///
/// Every field is optional at this layer; creation requires `hive_name`.
#[derive(Debug, Deserialize, Validate)]
pub struct HiveRequest {
    #[validate(length(max = 255, message = "Hive name must be at most 255 characters."))]
    pub hive_name: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters."))]
    pub location: Option<String>,

    #[validate(length(max = 255, message = "Hive type must be at most 255 characters."))]
    pub hive_type: Option<String>,
}

/// List filters
#[derive(Debug, Default, Deserialize)]
pub struct HiveQuery {
    pub location: Option<String>,
    pub hive_name: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub beekeeper_id: Option<i64>,
}

pub async fn create_hive(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<HiveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let input = NewHive {
        hive_name: req.hive_name,
        location: req.location,
        hive_type: req.hive_type,
    };

    hives::create_hive(state.store.as_ref(), session.beekeeper_id, input)
        .await
        .or_fail("Failed to create hive. Please try again later.")?;

    Ok(Json(MessageResponse::new("Hive creation successful.")))
}

pub async fn list_hives(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<HiveQuery>,
) -> ApiResult<Json<Vec<Hive>>> {
    let filter = HiveFilter {
        location: query.location,
        hive_name: query.hive_name,
        beekeeper_id: query.beekeeper_id,
    };

    let hives = hives::list_hives(state.store.as_ref(), filter)
        .await
        .or_fail("Failed to retrieve hives. Please try again later.")?;

    Ok(Json(hives))
}

/// Partial update of an owned hive
///
/// # Errors
///
/// - 400 if no field is supplied
/// - 404 if the hive does not exist or belongs to another beekeeper
/// - 409 if the new name is already used by another of the owner's hives
pub async fn update_hive(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    ApiPath(hive_id): ApiPath<i64>,
    ApiJson(req): ApiJson<HiveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let changes = UpdateHive {
        hive_name: req.hive_name,
        location: req.location,
        hive_type: req.hive_type,
    };

    hives::update_hive(state.store.as_ref(), hive_id, session.beekeeper_id, changes)
        .await
        .or_fail("Failed to update hive. Please try again later.")?;

    Ok(Json(MessageResponse::new("Hive update successful.")))
}

pub async fn delete_hive(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    ApiPath(hive_id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    hives::delete_hive(state.store.as_ref(), hive_id, session.beekeeper_id)
        .await
        .or_fail("Failed to delete hive. Please try again later.")?;

    Ok(Json(MessageResponse::new("Hive deletion successful.")))
}
