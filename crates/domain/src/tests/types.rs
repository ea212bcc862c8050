// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AccountRole, DomainError, Invitation, InvitationStatus, SubjectKind, SubjectRef};
use time::OffsetDateTime;
use time::macros::datetime;

fn create_test_invitation(status: InvitationStatus) -> Invitation {
    let created_at: OffsetDateTime = datetime!(2026-01-01 12:00:00 UTC);
    Invitation {
        invitation_id: 1,
        token: "a".repeat(64),
        subject: SubjectRef::Case(10),
        subject_email: String::from("jane@example.com"),
        invitee_name: String::from("Jane Doe"),
        status,
        created_at,
        sent_at: None,
        opened_at: None,
        completed_at: None,
        expires_at: datetime!(2026-01-31 12:00:00 UTC),
        reminder_count: 0,
        last_reminder_sent_at: None,
    }
}

#[test]
fn test_subject_ref_from_columns() {
    assert_eq!(SubjectRef::from_columns(Some(3), None), Ok(SubjectRef::Case(3)));
    assert_eq!(
        SubjectRef::from_columns(None, Some(4)),
        Ok(SubjectRef::Petition(4))
    );
    assert!(matches!(
        SubjectRef::from_columns(Some(3), Some(4)),
        Err(DomainError::InvalidSubject(_))
    ));
    assert!(matches!(
        SubjectRef::from_columns(None, None),
        Err(DomainError::InvalidSubject(_))
    ));
}

#[test]
fn test_subject_ref_accessors() {
    let case: SubjectRef = SubjectRef::Case(3);
    assert_eq!(case.kind(), SubjectKind::Case);
    assert_eq!(case.case_id(), Some(3));
    assert_eq!(case.petition_id(), None);
    assert_eq!(case.to_string(), "case:3");

    let petition: SubjectRef = SubjectRef::Petition(9);
    assert_eq!(petition.id(), 9);
    assert_eq!(petition.case_id(), None);
    assert_eq!(petition.to_string(), "petition:9");
}

#[test]
fn test_subject_ref_serializes_as_tagged_union() {
    let json: String = serde_json::to_string(&SubjectRef::Petition(9)).unwrap();
    assert_eq!(json, r#"{"kind":"petition","id":9}"#);
}

#[test]
fn test_effective_status_applies_expiry_to_non_terminal() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Sent);
    let before: OffsetDateTime = datetime!(2026-01-31 12:00:00 UTC);
    let after: OffsetDateTime = datetime!(2026-01-31 12:00:00.000001 UTC);

    // expires_at itself is still usable
    assert_eq!(invitation.effective_status(before), InvitationStatus::Sent);
    assert_eq!(invitation.effective_status(after), InvitationStatus::Expired);
}

#[test]
fn test_effective_status_keeps_completed() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Completed);
    let later: OffsetDateTime = datetime!(2027-01-01 00:00:00 UTC);
    assert_eq!(
        invitation.effective_status(later),
        InvitationStatus::Completed
    );
}

#[test]
fn test_invitation_debug_redacts_token() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Pending);
    let debug: String = format!("{invitation:?}");
    assert!(!debug.contains(&invitation.token));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_account_role_parse() {
    assert_eq!("employer".parse::<AccountRole>(), Ok(AccountRole::Employer));
    assert_eq!("employee".parse::<AccountRole>(), Ok(AccountRole::Employee));
    assert_eq!("attorney".parse::<AccountRole>(), Ok(AccountRole::Attorney));
    assert!(matches!(
        "admin".parse::<AccountRole>(),
        Err(DomainError::InvalidRole(_))
    ));
}
