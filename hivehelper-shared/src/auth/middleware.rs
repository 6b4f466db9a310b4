/// Session guard helpers for Axum
///
/// The guard resolves the session cookie of a request against a
/// [`SessionStore`] and produces a [`SessionContext`] that handlers read from
/// request extensions. Requests without a live session are rejected with
/// [`AuthError`].
///
/// # Cookie Format
///
/// ```text
/// Set-Cookie: hivehelper.sid=<token>; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600
/// ```
///
/// # Example
///
/// ```no_run
/// use axum::{Extension, Router, routing::get, middleware};
/// use hivehelper_shared::auth::middleware::{session_guard, SessionContext};
/// use hivehelper_shared::auth::session::{MemorySessionStore, SessionStore};
/// use std::sync::Arc;
///
/// async fn whoami(Extension(session): Extension<SessionContext>) -> String {
///     format!("Hello, {}!", session.name)
/// }
///
/// let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(100));
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .route_layer(middleware::from_fn(move |req: axum::extract::Request, next: middleware::Next| {
///         session_guard(sessions.clone(), "hivehelper.sid".to_string(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::session::{SessionConfig, SessionError, SessionStore};

/// Identity of the beekeeper behind a guarded request
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Raw session token from the cookie
    pub token: String,

    /// Authenticated beekeeper
    pub beekeeper_id: i64,

    /// Beekeeper display name
    pub name: String,
}

/// Client message for requests without a live session
pub const UNAUTHORIZED: &str = "Unauthorized. Please log in.";

/// Error type for the session guard
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie, or the session is unknown or expired
    MissingSession,

    /// The session store failed
    StoreUnavailable(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": UNAUTHORIZED })),
            )
                .into_response(),
            AuthError::StoreUnavailable(msg) => {
                tracing::error!("Session store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::StoreUnavailable(err.to_string())
    }
}

/// Extracts the session token from the `Cookie` headers
pub fn session_token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Builds the `Set-Cookie` value that installs a session
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, token, config.ttl().num_seconds()
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Resolves the session of a request
///
/// The store is consulted on every call; nothing is cached between requests.
///
/// # Errors
///
/// - `AuthError::MissingSession` if there is no cookie or no live session
/// - `AuthError::StoreUnavailable` if the store fails
pub async fn authenticate_request(
    sessions: &dyn SessionStore,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<SessionContext, AuthError> {
    let token = session_token_from_headers(headers, cookie_name).ok_or(AuthError::MissingSession)?;

    let session = sessions
        .get(&token)
        .await?
        .ok_or(AuthError::MissingSession)?;

    Ok(SessionContext {
        token,
        beekeeper_id: session.beekeeper_id,
        name: session.name,
    })
}

/// Session guard middleware
///
/// Passes the request through with a [`SessionContext`] extension when a
/// live session is present, otherwise answers 401.
pub async fn session_guard(
    sessions: Arc<dyn SessionStore>,
    cookie_name: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = authenticate_request(sessions.as_ref(), req.headers(), &cookie_name).await?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
