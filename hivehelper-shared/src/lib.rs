//! # HiveHelper Shared Library
//!
//! This crate contains the domain layer of HiveHelper: persistence models,
//! repository traits with their PostgreSQL and in-memory implementations,
//! the business rules for beekeepers, hives, health records and tasks, and
//! the authentication primitives used by the API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session store and session guard helpers
//! - `db`: Connection pool and migrations
//! - `error`: Store and service error types
//! - `models`: Database models and their SQL operations
//! - `services`: Validation, ownership checks and error mapping per operation
//! - `store`: Repository traits and store implementations

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the HiveHelper shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
