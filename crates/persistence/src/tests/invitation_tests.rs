// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for invitation persistence.

use intake_domain::{InvitationStatus, Invitee, SubjectRef};
use time::Duration;

use crate::tests::{
    CREATED_AT, EXPIRES_AT, LATER, MUCH_LATER, create_test_case, create_test_invitation,
    test_token,
};
use crate::{NewInvitation, Persistence, PersistenceError};

#[test]
fn test_create_invitation_starts_pending() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);

    let invitation = create_test_invitation(&mut persistence, subject, &test_token('a'));

    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.subject, subject);
    assert_eq!(invitation.subject_email, "jane@example.com");
    assert_eq!(invitation.reminder_count, 0);
    assert_eq!(invitation.created_at, CREATED_AT);
    assert_eq!(invitation.expires_at, EXPIRES_AT);
    assert!(invitation.sent_at.is_none());
    assert!(invitation.opened_at.is_none());
    assert!(invitation.completed_at.is_none());
}

#[test]
fn test_lookup_by_token_and_id() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    let created = create_test_invitation(&mut persistence, subject, &test_token('b'));

    let by_token = persistence
        .get_invitation_by_token(&test_token('b'))
        .unwrap()
        .unwrap();
    let by_id = persistence
        .get_invitation_by_id(created.invitation_id)
        .unwrap()
        .unwrap();

    assert_eq!(by_token, created);
    assert_eq!(by_id, created);
    assert!(
        persistence
            .get_invitation_by_token(&test_token('z'))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_duplicate_token_is_unique_violation() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    create_test_invitation(&mut persistence, subject, &test_token('c'));

    let invitee = Invitee::new("other@example.com", "Other");
    let result = persistence.create_invitation(&NewInvitation {
        token: &test_token('c'),
        subject,
        invitee: &invitee,
        created_at: CREATED_AT,
        expires_at: EXPIRES_AT,
    });

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_invitation_requires_existing_subject() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let invitee = Invitee::new("jane@example.com", "Jane Doe");

    let result = persistence.create_invitation(&NewInvitation {
        token: &test_token('d'),
        subject: SubjectRef::Petition(42),
        invitee: &invitee,
        created_at: CREATED_AT,
        expires_at: EXPIRES_AT,
    });

    assert!(result.is_err());
}

#[test]
fn test_list_by_subject_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    let invitee = Invitee::new("jane@example.com", "Jane Doe");

    let older = create_test_invitation(&mut persistence, subject, &test_token('e'));
    let newer = persistence
        .create_invitation(&NewInvitation {
            token: &test_token('f'),
            subject,
            invitee: &invitee,
            created_at: CREATED_AT + Duration::days(1),
            expires_at: EXPIRES_AT + Duration::days(1),
        })
        .unwrap();
    let same_time = create_test_invitation(&mut persistence, subject, &test_token('g'));

    let listed: Vec<i64> = persistence
        .list_invitations_by_subject(subject)
        .unwrap()
        .into_iter()
        .map(|invitation| invitation.invitation_id)
        .collect();

    // Ties on created_at fall back to descending ID.
    assert_eq!(
        listed,
        vec![
            newer.invitation_id,
            same_time.invitation_id,
            older.invitation_id
        ]
    );
    assert!(
        persistence
            .list_invitations_by_subject(SubjectRef::Petition(subject.id()))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_status_update_stamps_timestamps_once() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    let invitation = create_test_invitation(&mut persistence, subject, &test_token('h'));
    let id = invitation.invitation_id;

    persistence
        .update_invitation_status(id, InvitationStatus::Sent, CREATED_AT)
        .unwrap();
    persistence
        .update_invitation_status(id, InvitationStatus::Opened, LATER)
        .unwrap();
    persistence
        .update_invitation_status(id, InvitationStatus::Opened, MUCH_LATER)
        .unwrap();

    let stored = persistence.get_invitation_by_id(id).unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Opened);
    assert_eq!(stored.sent_at, Some(CREATED_AT));
    assert_eq!(stored.opened_at, Some(LATER));
    assert!(stored.completed_at.is_none());
}

#[test]
fn test_status_update_on_unknown_invitation() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.update_invitation_status(77, InvitationStatus::Expired, LATER);

    assert_eq!(result, Err(PersistenceError::InvitationNotFound(77)));
}

#[test]
fn test_increment_reminder_keeps_expiry_and_first_sent_at() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    let invitation = create_test_invitation(&mut persistence, subject, &test_token('i'));
    let id = invitation.invitation_id;

    persistence
        .update_invitation_status(id, InvitationStatus::Sent, CREATED_AT)
        .unwrap();
    persistence
        .update_invitation_status(id, InvitationStatus::Opened, LATER)
        .unwrap();
    persistence.increment_reminder(id, LATER).unwrap();
    persistence.increment_reminder(id, MUCH_LATER).unwrap();

    let stored = persistence.get_invitation_by_id(id).unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Sent);
    assert_eq!(stored.reminder_count, 2);
    assert_eq!(stored.last_reminder_sent_at, Some(MUCH_LATER));
    assert_eq!(stored.sent_at, Some(CREATED_AT));
    assert_eq!(stored.opened_at, Some(LATER));
    assert_eq!(stored.expires_at, EXPIRES_AT);
}

#[test]
fn test_increment_reminder_stamps_sent_at_for_pending() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);
    let invitation = create_test_invitation(&mut persistence, subject, &test_token('j'));

    persistence
        .increment_reminder(invitation.invitation_id, LATER)
        .unwrap();

    let stored = persistence
        .get_invitation_by_id(invitation.invitation_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, InvitationStatus::Sent);
    assert_eq!(stored.sent_at, Some(LATER));
    assert_eq!(stored.reminder_count, 1);
}
