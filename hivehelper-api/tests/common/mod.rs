//! Common test utilities for integration tests
//!
//! Every test gets a fresh router over an in-memory store and session store,
//! with Argon2 parameters cheap enough to hash in milliseconds.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use hivehelper_api::{
    app::{build_router, AppState},
    config::Config,
};
use hivehelper_shared::{
    auth::{password::PasswordParams, session::MemorySessionStore},
    store::memory::MemoryStore,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

/// Response as seen by a test
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `error` field of an error body
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// `message` field of a success body
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Builds a context after adjusting the default test configuration
    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        config.password = PasswordParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            output_len: 32,
        };
        adjust(&mut config);

        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessionStore::new(config.session.capacity));
        let app = build_router(AppState::new(store.clone(), sessions.clone(), config.clone()));

        Self {
            app,
            store,
            sessions,
            config,
        }
    }

    /// Sends a request; `cookie` is a `name=value` pair
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/register",
            None,
            Some(json!({
                "name": name,
                "email": email,
                "phone_number": "555-0100",
                "address": "1 Apiary Lane",
                "password": password,
            })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning the session cookie pair
    pub async fn sign_up(&self, name: &str, email: &str) -> String {
        let response = self.register(name, email, "pw1").await;
        assert_eq!(response.status, StatusCode::OK, "register failed: {}", response.body);

        let response = self.login(email, "pw1").await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);

        session_cookie(&response.headers).expect("login sets a session cookie")
    }

    /// Creates a hive and returns its ID
    pub async fn create_hive(&self, cookie: &str, hive_name: &str, location: &str) -> i64 {
        let response = self
            .send(
                "POST",
                "/hive",
                Some(cookie),
                Some(json!({ "hive_name": hive_name, "location": location, "hive_type": "Langstroth" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create hive failed: {}", response.body);

        let listed = self
            .send("GET", &format!("/hive?hive_name={hive_name}"), Some(cookie), None)
            .await;
        listed.body.as_array().unwrap().last().unwrap()["hive_id"]
            .as_i64()
            .unwrap()
    }
}

/// Extracts `name=value` of the session cookie from `Set-Cookie`
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|pair| pair.trim().to_string())
}
