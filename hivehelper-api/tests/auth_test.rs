//! HTTP tests for registration, login, logout and the session guard

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{session_cookie, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let ctx = TestContext::new();

    let response = ctx.register("Alice", "a@x.com", "pw1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Registration successful.");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();

    assert_eq!(ctx.register("Alice", "a@x.com", "pw1").await.status, StatusCode::OK);

    let response = ctx.register("Another Alice", "a@x.com", "pw2").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error(), "User with the same email already exists.");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let ctx = TestContext::new();

    for body in [
        json!({ "email": "a@x.com", "password": "pw1" }),
        json!({ "name": "Alice", "password": "pw1" }),
        json!({ "name": "Alice", "email": "a@x.com" }),
        json!({ "name": "", "email": "a@x.com", "password": "pw1" }),
    ] {
        let response = ctx.send("POST", "/register", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error(), "Missing required parameters.");
    }
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let ctx = TestContext::new();
    ctx.register("Alice", "a@x.com", "pw1").await;

    let response = ctx.login("a@x.com", "pw1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Login successful.");

    let set_cookie = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("hivehelper.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("Alice", "a@x.com", "pw1").await;

    let wrong_password = ctx.login("a@x.com", "wrong").await;
    let unknown_email = ctx.login("nobody@x.com", "pw1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.error(), "Invalid credentials.");
    assert!(wrong_password.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_missing_fields() {
    let ctx = TestContext::new();

    let response = ctx
        .send("POST", "/login", None, Some(json!({ "email": "a@x.com" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guarded_routes_require_session() {
    let ctx = TestContext::new();

    for (method, uri) in [
        ("GET", "/hive"),
        ("POST", "/hive"),
        ("PATCH", "/hive/1"),
        ("DELETE", "/hive/1"),
        ("GET", "/health"),
        ("GET", "/health/1"),
        ("POST", "/health"),
        ("PUT", "/health/1"),
        ("DELETE", "/health/1"),
        ("POST", "/tasks"),
        ("PUT", "/tasks/1"),
        ("DELETE", "/tasks/1"),
        ("GET", "/logout"),
    ] {
        let response = ctx.send(method, uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response.error(), "Unauthorized. Please log in.");
    }

    let forged = ctx.send("GET", "/hive", Some("hivehelper.sid=forged"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_destroys_session_and_redirects() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("Alice", "a@x.com").await;

    assert_eq!(ctx.send("GET", "/hive", Some(&cookie), None).await.status, StatusCode::OK);

    let response = ctx.send("GET", "/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.headers.get(header::LOCATION).unwrap(), "/login");
    let cleared = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = ctx.send("GET", "/hive", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_relogin_replaces_previous_session() {
    let ctx = TestContext::new();
    let first = ctx.sign_up("Alice", "a@x.com").await;

    let response = ctx
        .send(
            "POST",
            "/login",
            Some(&first),
            Some(json!({ "email": "a@x.com", "password": "pw1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let second = session_cookie(&response.headers).unwrap();
    assert_ne!(first, second);

    assert_eq!(ctx.send("GET", "/hive", Some(&first), None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.send("GET", "/hive", Some(&second), None).await.status, StatusCode::OK);
    assert_eq!(ctx.sessions.len().await, 1);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = ctx.send_request(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.error().is_empty());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/register",
            None,
            Some(json!({ "name": "A", "email": "a@x.com", "password": "p".repeat(2048) })),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error(), "Request body too large.");
}

#[tokio::test]
async fn test_login_with_out_of_range_ttl_still_issues_session() {
    let ctx = TestContext::with_config(|config| {
        config.session.ttl_seconds = 9_000_000_000_000_000;
    });

    ctx.register("Alice", "a@x.com", "pw1").await;
    let response = ctx.login("a@x.com", "pw1").await;
    assert_eq!(response.status, StatusCode::OK);

    let cookie = session_cookie(&response.headers).unwrap();
    let response = ctx.send("GET", "/hive", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
}
