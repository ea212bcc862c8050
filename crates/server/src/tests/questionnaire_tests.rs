// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::{Value, json};

use super::TestApp;

#[tokio::test]
async fn test_questionnaire_by_link_through_completion() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;
    app.create_case(&session).await;
    let uri = format!("/questionnaire/{}", app.last_email_token());

    let (status, view) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["invitation"]["status"], "opened");
    assert_eq!(view["subject"]["job_title"], "Software Engineer");
    assert_eq!(view["subject"]["employer_name"], "Acme Corp");
    assert_eq!(view["response"], Value::Null);

    let (status, saved) = app
        .send(
            "POST",
            &uri,
            None,
            Some(json!({
                "employee_first_name": "Jane",
                "employee_last_name": "Doe",
                "current_section": "personal_info",
                "completion_percentage": 90,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["completion_percentage"], 5);
    assert_eq!(saved["current_section"], "personal_info");
    assert_eq!(saved["is_complete"], false);

    let (status, done) = app
        .send(
            "POST",
            &uri,
            None,
            Some(json!({ "certification_accepted": true, "is_complete": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["is_complete"], true);

    let (status, body) = app
        .send("POST", &uri, None, Some(json!({ "gender": "female" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_completed");

    let (status, body) = app
        .send("POST", "/invitations/1/resend", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_completed");
}

#[tokio::test]
async fn test_unknown_link_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .send("GET", &format!("/questionnaire/{}", "a".repeat(64)), None, None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_unknown_section_is_rejected() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;
    app.create_case(&session).await;
    let uri = format!("/questionnaire/{}", app.last_email_token());

    let (status, body) = app
        .send("POST", &uri, None, Some(json!({ "current_section": "hobbies" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn test_employee_questionnaire_for_invitee_only() {
    let app = TestApp::new();
    let employer = app.sign_in_employer().await;
    let created = app.create_case(&employer).await;
    let invitation_id = created["invitation"]["invitation_id"].as_i64().unwrap();
    let uri = format!("/employee/questionnaire/{invitation_id}");
    let jane = app.sign_in("Jane@Example.com", "employee", None).await;
    let joe = app.sign_in("joe@example.com", "employee", None).await;

    let (status, _) = app.send("GET", &uri, Some(&joe), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, view) = app.send("GET", &uri, Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["invitation"]["status"], "opened");

    let (status, saved) = app
        .send(
            "POST",
            &uri,
            Some(&jane),
            Some(json!({ "phone_number": "+1 555 0100", "current_section": "contact_info" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["answers"], json!({ "phone_number": "+1 555 0100" }));

    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
