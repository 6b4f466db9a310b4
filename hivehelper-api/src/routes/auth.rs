/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create a beekeeper account
/// - `POST /login` - Verify credentials and start a session (cookie)
/// - `GET /logout` - End the session and redirect to `/login`
///
/// Sessions live server-side; the cookie only carries an opaque token. A new
/// login replaces any session the client already had.

use crate::{
    app::AppState,
    error::{ApiResult, ServiceResultExt},
    extract::ApiJson,
    routes::MessageResponse,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use hivehelper_shared::{
    auth::{
        middleware::{expired_session_cookie, session_cookie, session_token_from_headers, SessionContext},
        session::{generate_session_token, Session},
    },
    services::auth::{self, Credentials, Registration},
};
use serde::Deserialize;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters."))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Email must be at most 255 characters."))]
    pub email: Option<String>,

    #[validate(length(max = 64, message = "Phone number must be at most 64 characters."))]
    pub phone_number: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters."))]
    pub address: Option<String>,

    #[validate(length(max = 255, message = "Password must be at most 255 characters."))]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(max = 255, message = "Email must be at most 255 characters."))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Password must be at most 255 characters."))]
    pub password: Option<String>,
}

/// Register handler
///
/// # Errors
///
/// - 400 if name, email or password is missing
/// - 409 if the email is already registered
/// - 500 on hashing or store failure
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let registration = Registration {
        name: req.name,
        email: req.email,
        phone_number: req.phone_number,
        address: req.address,
        password: req.password,
    };

    auth::register(state.store.as_ref(), registration, &state.config.password)
        .await
        .or_fail("Registration failed. Please try again later.")?;

    Ok(Json(MessageResponse::new("Registration successful.")))
}

/// Login handler
///
/// # Errors
///
/// - 400 if email or password is missing
/// - 401 if the email is unknown or the password is wrong (same message)
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let beekeeper = auth::authenticate(
        state.store.as_ref(),
        Credentials {
            email: req.email,
            password: req.password,
        },
    )
    .await
    .or_fail("Login failed. Please try again later.")?;

    let config = &state.config.session;
    if let Some(previous) = session_token_from_headers(&headers, &config.cookie_name) {
        state.sessions.destroy(&previous).await?;
    }

    let token = generate_session_token();
    state
        .sessions
        .set(
            &token,
            Session::new(beekeeper.beekeeper_id, beekeeper.name.clone(), config.ttl()),
        )
        .await?;

    tracing::info!(beekeeper_id = beekeeper.beekeeper_id, "Beekeeper logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(config, &token))],
        Json(MessageResponse::new("Login successful.")),
    ))
}

/// Logout handler
///
/// Destroys the session, clears the cookie and redirects to `/login`.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<impl IntoResponse> {
    state.sessions.destroy(&session.token).await?;

    tracing::info!(beekeeper_id = session.beekeeper_id, "Beekeeper logged out");

    Ok((
        [(header::SET_COOKIE, expired_session_cookie(&state.config.session))],
        Redirect::to("/login"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.name.is_none());
    }

    #[test]
    fn test_register_request_length_limits() {
        let req = RegisterRequest {
            name: Some("n".repeat(256)),
            email: Some("a@x.com".to_string()),
            phone_number: None,
            address: None,
            password: Some("pw".to_string()),
        };
        assert!(req.validate().is_err());
    }
}
