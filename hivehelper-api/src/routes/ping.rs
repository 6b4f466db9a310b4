/// Liveness endpoint
///
/// # Endpoint
///
/// ```text
/// GET /ping
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": 200,
///   "status": "Pong!",
///   "additional_information": "I took 0.412 ms to handle your request!",
///   "store": "connected"
/// }
/// ```
///
/// Always answers 200 while the process is up; a failing store is reported
/// as `"disconnected"` rather than as an error.

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Ping response
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub code: u16,
    pub status: String,
    pub additional_information: String,
    pub store: String,
}

pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let started = Instant::now();

    let store = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "Store ping failed");
            "disconnected"
        }
    };

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    Json(PingResponse {
        code: 200,
        status: "Pong!".to_string(),
        additional_information: format!("I took {elapsed_ms:.3} ms to handle your request!"),
        store: store.to_string(),
    })
}
