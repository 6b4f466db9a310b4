/// Error types shared by the store and service layers
///
/// Two levels exist:
///
/// - [`StoreError`]: raised by repository implementations. Driver errors are
///   classified so that constraint violations can be told apart from real
///   persistence failures.
/// - [`ServiceError`]: the taxonomy seen by callers of the `services` module.
///   Every variant maps to exactly one HTTP status in the API crate.
///
/// # Example
///
/// ```
/// use hivehelper_shared::error::{ServiceError, StoreError};
///
/// let err = ServiceError::from(StoreError::UniqueViolation("hives_beekeeper_name_key".into()));
/// assert!(matches!(err, ServiceError::Store(_)));
/// ```

use crate::auth::password::PasswordError;

/// Result alias for repository calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Persistence failures reported by a [`crate::store::Store`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (constraint name attached)
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A FOREIGN KEY constraint rejected the write (constraint name attached)
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other driver or connection failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Returns true if this is a UNIQUE violation on the given constraint
    pub fn is_unique_violation_on(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation(name) if name == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation(constraint);
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation(constraint);
                }
                _ => {}
            }
        }

        StoreError::Database(err)
    }
}

/// Failure of a service operation
///
/// Messages of the client-facing variants are shown to users verbatim.
/// `PasswordHash` and `Store` carry internal detail and must only be logged.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Email unknown or password wrong (deliberately indistinguishable)
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity absent or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Password hashing or verification failed
    #[error("password operation failed: {0}")]
    PasswordHash(#[from] PasswordError),

    /// Underlying persistence failure
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Shorthand for the common "required field missing" failure
    pub fn missing_parameters() -> Self {
        ServiceError::Validation("Missing required parameters.".to_string())
    }
}
