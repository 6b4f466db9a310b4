/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`. Every error renders as
/// `{"error": "<message>"}` with the matching status code.
///
/// Service failures are converted with [`ServiceResultExt::or_fail`], which
/// supplies the client-facing message used when the failure is internal; the
/// internal detail itself only goes to the log.
///
/// # Example
///
/// ```no_run
/// use hivehelper_api::error::{ApiResult, ServiceResultExt};
/// use hivehelper_shared::services::tasks::list_tasks;
/// use hivehelper_shared::store::memory::MemoryStore;
/// use axum::Json;
///
/// async fn handler(store: &MemoryStore) -> ApiResult<Json<serde_json::Value>> {
///     let tasks = list_tasks(store, None)
///         .await
///         .or_fail("Failed to retrieve tasks. Please try again later.")?;
///     Ok(Json(serde_json::json!({ "count": tasks.len() })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hivehelper_shared::{
    auth::{
        middleware::{AuthError, UNAUTHORIZED},
        session::SessionError,
    },
    error::{ServiceError, ServiceResult},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message for internal failures without a more specific one
const INTERNAL_ERROR: &str = "Internal server error.";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email or hive name
    Conflict(String),

    /// Payload too large (413)
    PayloadTooLarge(String),

    /// Internal server error (500)
    ///
    /// `message` is shown to the client, `detail` is only logged.
    InternalError { message: String, detail: String },
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    /// Internal error with the generic client message
    pub fn internal(detail: impl fmt::Display) -> Self {
        ApiError::InternalError {
            message: INTERNAL_ERROR.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Maps a service failure, using `failure` as the client message for
    /// internal errors
    pub fn from_service(err: ServiceError, failure: &str) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::PasswordHash(_) | ServiceError::Store(_) => ApiError::InternalError {
                message: failure.to_string(),
                detail: err.to_string(),
            },
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::InternalError { detail, .. } => write!(f, "Internal error: {}", detail),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalError { message, detail } => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %detail, "{}", message);
                message
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Conversion of service results into API results
pub trait ServiceResultExt<T> {
    /// Maps the error with [`ApiError::from_service`]
    fn or_fail(self, failure: &str) -> ApiResult<T>;
}

impl<T> ServiceResultExt<T> for ServiceResult<T> {
    fn or_fail(self, failure: &str) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_service(err, failure))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, INTERNAL_ERROR)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSession => ApiError::Unauthorized(UNAUTHORIZED.to_string()),
            AuthError::StoreUnavailable(msg) => ApiError::internal(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Request body too large.".to_string());
        }
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Field-level validation failures, joined into one sorted message
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}.", field))
                })
            })
            .collect();
        messages.sort();
        messages.dedup();

        ApiError::BadRequest(messages.join(" "))
    }
}
