/// Business rules per operation
///
/// Each function validates its input, performs the ownership or existence
/// check the operation needs against the store, then issues a single write
/// or read. Store failures are mapped onto [`ServiceError`] here so the HTTP
/// layer only translates variants to status codes.
///
/// Services are generic over the narrowest repository trait they use, with
/// `?Sized` so that `&dyn Store` can be passed directly.
///
/// # Modules
///
/// - `auth`: Registration and credential checks
/// - `hives`: Owner-scoped hive CRUD
/// - `health_records`: Sensor readings per hive
/// - `tasks`: Global maintenance tasks

pub mod auth;
pub mod health_records;
pub mod hives;
pub mod tasks;

use crate::error::{ServiceError, ServiceResult};

/// Message for partial updates that carry no field
pub const EMPTY_UPDATE: &str = "At least one parameter must be provided for update.";

/// Message for a hive reference that resolves to nothing
pub const HIVE_NOT_FOUND: &str = "Hive not found.";

/// Message for NaN or infinite sensor readings
pub const NON_FINITE_READING: &str = "Readings must be finite numbers.";

/// Drops empty strings; a blank form field counts as not supplied
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Returns the value or the "missing parameters" failure
pub(crate) fn required<T>(value: Option<T>) -> ServiceResult<T> {
    value.ok_or_else(ServiceError::missing_parameters)
}

/// Rejects NaN and infinities; they cannot be stored and read back faithfully
pub(crate) fn finite(value: Option<f64>) -> ServiceResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ServiceError::Validation(NON_FINITE_READING.to_string())),
        value => Ok(value),
    }
}
