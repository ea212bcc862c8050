// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for saving questionnaire progress.

use intake_domain::{InvitationStatus, SectionId};
use serde_json::json;

use crate::tests::helpers::{
    AFTER_EXPIRY, DURING, LATER, answers, create_case_with_invitation, create_engine,
};
use crate::{ApiError, SaveProgressRequest};

#[tokio::test]
async fn test_two_personal_fields_are_five_percent() {
    let engine = create_engine();
    let (_, subject, outcome) = create_case_with_invitation(&engine).await;

    let response = engine
        .save_progress(
            outcome.invitation.invitation_id,
            Some(SectionId::PersonalInfo),
            answers(json!({ "employee_first_name": "Jane", "employee_last_name": "Doe" })),
            false,
            DURING,
        )
        .await
        .unwrap();

    assert_eq!(response.completion_percentage, 5);
    assert_eq!(response.current_section, SectionId::PersonalInfo);
    assert_eq!(response.subject, subject);
    assert!(!response.is_complete);
}

#[tokio::test]
async fn test_saves_merge_and_recompute_from_all_answers() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;
    let id = outcome.invitation.invitation_id;

    engine
        .save_progress(
            id,
            Some(SectionId::PersonalInfo),
            answers(json!({ "employee_first_name": "Jane", "gender": "" })),
            false,
            DURING,
        )
        .await
        .unwrap();
    let response = engine
        .save_progress(
            id,
            None,
            answers(json!({ "phone_number": "+1 555 0100", "favourite_colour": "teal" })),
            false,
            LATER,
        )
        .await
        .unwrap();

    assert_eq!(
        response.answers,
        answers(json!({
            "employee_first_name": "Jane",
            "gender": "",
            "phone_number": "+1 555 0100",
            "favourite_colour": "teal",
        }))
    );
    // Two schema fields answered: the blank and the unknown key do not count.
    assert_eq!(response.completion_percentage, 5);
    assert_eq!(response.current_section, SectionId::PersonalInfo);
    assert_eq!(response.updated_at, LATER);
}

#[tokio::test]
async fn test_final_submission_completes_both_records() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;
    let id = outcome.invitation.invitation_id;
    engine
        .fetch_by_token(&outcome.invitation.token, DURING)
        .await
        .unwrap();

    let response = engine
        .save_progress(
            id,
            Some(SectionId::AdditionalInfo),
            answers(json!({ "certification_accepted": true })),
            true,
            LATER,
        )
        .await
        .unwrap();

    assert!(response.is_complete);
    let invitation = engine.get_invitation(id).await.unwrap();
    assert_eq!(invitation.status, InvitationStatus::Completed);
    assert_eq!(invitation.completed_at, Some(LATER));

    let fetched = engine
        .fetch_by_token(&outcome.invitation.token, LATER)
        .await
        .unwrap();
    assert_eq!(fetched.invitation.status, InvitationStatus::Completed);
    assert!(fetched.response.unwrap().is_complete);
}

#[tokio::test]
async fn test_completion_without_prior_open_is_allowed() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;

    engine
        .save_progress(
            outcome.invitation.invitation_id,
            None,
            answers(json!({ "criminal_history": false })),
            true,
            DURING,
        )
        .await
        .unwrap();

    let invitation = engine
        .get_invitation(outcome.invitation.invitation_id)
        .await
        .unwrap();
    assert_eq!(invitation.status, InvitationStatus::Completed);
}

#[tokio::test]
async fn test_edits_after_completion_are_rejected() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;
    let id = outcome.invitation.invitation_id;
    let final_fields = answers(json!({ "certification_accepted": true }));
    let completed = engine
        .save_progress(id, None, final_fields.clone(), true, DURING)
        .await
        .unwrap();

    let edit = engine
        .save_progress(
            id,
            None,
            answers(json!({ "certification_accepted": false })),
            false,
            LATER,
        )
        .await;
    assert_eq!(edit, Err(ApiError::AlreadyCompleted { invitation_id: id }));

    // Replaying the final submission is idempotent.
    let replay = engine
        .save_progress(id, None, final_fields, true, LATER)
        .await
        .unwrap();
    assert_eq!(replay, completed);
}

#[tokio::test]
async fn test_save_after_expiry_is_rejected_and_recorded() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;
    let id = outcome.invitation.invitation_id;

    let result = engine
        .save_progress(
            id,
            None,
            answers(json!({ "employee_first_name": "Jane" })),
            false,
            AFTER_EXPIRY,
        )
        .await;

    assert_eq!(result, Err(ApiError::InvitationExpired { invitation_id: id }));
    assert_eq!(
        engine.get_invitation(id).await.unwrap().status,
        InvitationStatus::Expired
    );
    let store_response = engine
        .persistence()
        .lock()
        .await
        .get_response_by_invitation(id)
        .unwrap();
    assert!(store_response.is_none());
}

#[tokio::test]
async fn test_save_for_unknown_invitation_is_not_found() {
    let engine = create_engine();

    let result = engine
        .save_progress(404, None, answers(json!({})), false, DURING)
        .await;

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_request_body_splits_control_keys_from_answers() {
    let request = SaveProgressRequest::from_body(answers(json!({
        "employee_first_name": "Jane",
        "current_section": "contact_info",
        "completion_percentage": 99,
        "is_complete": true,
    })))
    .unwrap();

    assert_eq!(request.current_section, Some(SectionId::ContactInfo));
    assert!(request.is_complete);
    assert_eq!(request.fields, answers(json!({ "employee_first_name": "Jane" })));
}

#[test]
fn test_request_body_rejects_unknown_section_and_bad_flag() {
    let bad_section = SaveProgressRequest::from_body(answers(json!({
        "current_section": "hobbies",
    })));
    assert!(matches!(
        bad_section,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "current_section"
    ));

    let bad_flag = SaveProgressRequest::from_body(answers(json!({ "is_complete": "yes" })));
    assert!(matches!(
        bad_flag,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "is_complete"
    ));
}

#[tokio::test]
async fn test_link_handlers_never_expose_the_token() {
    let engine = create_engine();
    let (_, _, outcome) = create_case_with_invitation(&engine).await;
    let token = outcome.invitation.token.clone();

    let view = crate::get_questionnaire(&engine, &token, DURING).await.unwrap();
    let saved = crate::save_questionnaire(
        &engine,
        &token,
        answers(json!({ "employee_first_name": "Jane", "completion_percentage": 100 })),
        LATER,
    )
    .await
    .unwrap();

    assert_eq!(saved.completion_percentage, 2);
    let serialized = format!(
        "{}{}",
        serde_json::to_string(&view).unwrap(),
        serde_json::to_string(&saved).unwrap()
    );
    assert!(!serialized.contains(&token));
    assert!(!format!("{:?}", outcome.invitation).contains(&token));
}
