// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::json;

use super::TestApp;

#[tokio::test]
async fn test_create_case_sends_invitation_without_exposing_token() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;

    let body = app.create_case(&session).await;

    assert_eq!(body["subject"], json!({ "kind": "case", "id": 1 }));
    assert_eq!(body["email_delivered"], true);
    assert_eq!(body["invitation"]["status"], "sent");
    assert_eq!(body["invitation"]["subject_email"], "jane@example.com");
    assert_eq!(body["invitation"]["reminder_count"], 0);
    let token = app.last_email_token();
    assert!(!body.to_string().contains(&token));
}

#[tokio::test]
async fn test_employee_cannot_create_case() {
    let app = TestApp::new();
    let session = app.sign_in("jane@example.com", "employee", None).await;

    let (status, body) = app
        .send(
            "POST",
            "/cases",
            Some(&session),
            Some(json!({
                "employee_name": "Jane Doe",
                "employee_email": "jane@example.com",
                "job_title": "Software Engineer",
                "case_type": "new_employment",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");
}

#[tokio::test]
async fn test_petition_invitation_list_and_resend() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;
    let (status, created) = app
        .send(
            "POST",
            "/petitions",
            Some(&session),
            Some(json!({
                "employee_name": "Jane Doe",
                "employee_email": "jane@example.com",
                "job_title": "Software Engineer",
                "petition_type": "transfer",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let petition_id = created["subject"]["id"].as_i64().unwrap();

    let (status, second) = app
        .send(
            "POST",
            "/invitations",
            Some(&session),
            Some(json!({
                "petition_id": petition_id,
                "email": "sam@example.com",
                "name": "Sam Doe",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = second["invitation"]["invitation_id"].as_i64().unwrap();

    let (status, listed) = app
        .send(
            "GET",
            &format!("/invitations?petition_id={petition_id}"),
            Some(&session),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let invitations = listed["invitations"].as_array().unwrap();
    assert_eq!(invitations.len(), 2);
    assert_eq!(invitations[0]["invitation_id"], second_id);

    let (status, resent) = app
        .send(
            "POST",
            &format!("/invitations/{second_id}/resend"),
            Some(&session),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resent["email_delivered"], true);
    assert_eq!(resent["invitation"]["reminder_count"], 1);
    assert_eq!(app.transport().sent().len(), 4);
}

#[tokio::test]
async fn test_other_employer_is_forbidden() {
    let app = TestApp::new();
    let owner = app.sign_in_employer().await;
    app.create_case(&owner).await;
    let rival = app
        .sign_in("hr@globex.example", "employer", Some("Globex"))
        .await;

    let (status, _) = app
        .send("GET", "/invitations?case_id=1", Some(&rival), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("POST", "/invitations/1/resend", Some(&rival), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_listing_needs_exactly_one_subject() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;

    let (status, body) = app.send("GET", "/invitations", Some(&session), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn test_resend_unknown_invitation_is_not_found() {
    let app = TestApp::new();
    let session = app.sign_in_employer().await;

    let (status, body) = app
        .send("POST", "/invitations/77/resend", Some(&session), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}
