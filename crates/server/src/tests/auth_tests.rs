// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::json;

use super::{PASSWORD, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_login_whoami_logout_round() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;
    assert_eq!(app.transport().sent().len(), 1);

    let (status, me) = app.send("GET", "/auth/whoami", Some(&session), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "hr@acme.example");
    assert_eq!(me["role"], "employer");
    assert_eq!(me["organization_name"], "Acme Corp");

    let (status, _) = app.send("POST", "/auth/logout", Some(&session), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.send("GET", "/auth/whoami", Some(&session), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
}

#[tokio::test]
async fn test_missing_or_malformed_bearer_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/auth/whoami", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing Authorization header");

    let (status, _) = app
        .send("GET", "/auth/whoami", Some(&"f".repeat(64)), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.sign_in_employer().await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "hr@acme.example", "password": "not it 123" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
}

#[tokio::test]
async fn test_signup_validation_and_conflict() {
    let app = TestApp::new();
    app.sign_in_employer().await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "hr@acme.example",
                "display_name": "Again",
                "password": PASSWORD,
                "role": "employer",
                "organization_name": "Acme Corp",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (status, body) = app
        .send(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "email": "new@acme.example",
                "display_name": "Weak",
                "password": "short1",
                "role": "employee",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}
