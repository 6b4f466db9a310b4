/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use hivehelper_api::{app::{build_router, AppState}, config::Config};
/// use hivehelper_shared::auth::session::MemorySessionStore;
/// use hivehelper_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let sessions = Arc::new(MemorySessionStore::new(config.session.capacity));
/// let state = AppState::new(Arc::new(MemoryStore::new()), sessions, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{Redirect, Response},
    routing::{get, patch, post, put},
    Router,
};
use hivehelper_shared::{
    auth::{middleware::session_guard, session::SessionStore},
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Maximum accepted request body (bytes)
pub const BODY_LIMIT: usize = 1024;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Beekeepers, hives, health records and tasks
    pub store: Arc<dyn Store>,

    /// Server-side sessions
    pub sessions: Arc<dyn SessionStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: Arc<dyn SessionStore>, config: Config) -> Self {
        Self {
            store,
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET    /ping                 liveness and store connectivity (public)
/// GET    /                     redirect to /home (public)
/// POST   /register             create an account (public)
/// POST   /login                start a session (public)
/// GET    /tasks                list tasks, ?hive_id= (public)
/// GET    /logout               end the session
/// POST   /hive                 create a hive
/// GET    /hive                 list hives, ?location=&hive_name=&beekeeper_id=
/// PATCH  /hive/:hive_id        update an owned hive
/// DELETE /hive/:hive_id        delete an owned hive
/// GET    /health               all readings grouped by hive
/// GET    /health/:hive_id      readings of one hive
/// POST   /health               record a reading
/// PUT    /health/:health_id    update a reading
/// DELETE /health/:health_id    delete a reading
/// POST   /tasks                schedule a task
/// PUT    /tasks/:task_id       update a task
/// DELETE /tasks/:task_id       delete a task
/// ```
///
/// Every route below `/logout` in the table requires a session cookie.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Body size limit
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Session guard (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/ping", get(routes::ping::ping))
        .route("/", get(|| async { Redirect::to("/home") }))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/tasks", get(routes::tasks::list_tasks));

    let guarded_routes = Router::new()
        .route("/logout", get(routes::auth::logout))
        .route(
            "/hive",
            get(routes::hives::list_hives).post(routes::hives::create_hive),
        )
        .route(
            "/hive/:hive_id",
            patch(routes::hives::update_hive).delete(routes::hives::delete_hive),
        )
        .route(
            "/health",
            get(routes::hive_health::list_all_health_records)
                .post(routes::hive_health::create_health_record),
        )
        .route(
            "/health/:id",
            get(routes::hive_health::list_hive_health_records)
                .put(routes::hive_health::update_health_record)
                .delete(routes::hive_health::delete_health_record),
        )
        .route("/tasks", post(routes::tasks::create_task))
        .route(
            "/tasks/:task_id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), session_layer));

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials are required for the session cookie
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session guard for protected routes
///
/// Inserts a `SessionContext` into the request extensions; requests without a
/// live session get 401.
async fn session_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = state.config.session.cookie_name.clone();
    Ok(session_guard(state.sessions.clone(), cookie_name, req, next).await?)
}
