/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `ping`: Liveness and store connectivity
/// - `auth`: Registration, login and logout
/// - `hives`: Hive CRUD scoped to the session's beekeeper
/// - `hive_health`: Sensor readings per hive
/// - `tasks`: Maintenance tasks, visible to every beekeeper

pub mod auth;
pub mod hive_health;
pub mod hives;
pub mod ping;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Body of successful mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
