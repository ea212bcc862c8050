// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    AFTER, CREATED_AT, DURING, EXPIRES_AT, create_sent_invitation, create_test_invitation,
};
use crate::{Command, CoreError, TransitionResult, apply};
use intake_domain::{Invitation, InvitationStatus};

#[test]
fn test_mark_sent_stamps_sent_at() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Pending);

    let result: TransitionResult = apply(&invitation, Command::MarkSent, CREATED_AT).unwrap();

    assert!(result.changed);
    assert_eq!(result.previous_status, InvitationStatus::Pending);
    assert_eq!(result.invitation.status, InvitationStatus::Sent);
    assert_eq!(result.invitation.sent_at, Some(CREATED_AT));
}

#[test]
fn test_mark_sent_does_not_regress_opened() {
    let mut invitation: Invitation = create_sent_invitation();
    invitation.status = InvitationStatus::Opened;
    invitation.opened_at = Some(DURING);

    let result: TransitionResult = apply(&invitation, Command::MarkSent, DURING).unwrap();

    assert!(!result.changed);
    assert_eq!(result.invitation.status, InvitationStatus::Opened);
}

#[test]
fn test_first_access_opens_invitation() {
    let invitation: Invitation = create_sent_invitation();

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, DURING).unwrap();

    assert!(result.changed);
    assert_eq!(result.invitation.status, InvitationStatus::Opened);
    assert_eq!(result.invitation.opened_at, Some(DURING));
}

#[test]
fn test_second_access_is_idempotent() {
    let invitation: Invitation = create_sent_invitation();
    let first: TransitionResult = apply(&invitation, Command::RecordAccess, DURING).unwrap();

    let later = DURING + time::Duration::hours(3);
    let second: TransitionResult =
        apply(&first.invitation, Command::RecordAccess, later).unwrap();

    assert!(!second.changed);
    assert_eq!(second.invitation.opened_at, Some(DURING));
}

#[test]
fn test_pending_invitation_opens_by_direct_link() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Pending);

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, DURING).unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Opened);
    assert_eq!(result.invitation.sent_at, None);
}

#[test]
fn test_access_after_expiry_expires_without_opening() {
    let invitation: Invitation = create_sent_invitation();

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, AFTER).unwrap();

    assert!(result.changed);
    assert!(result.expired());
    assert_eq!(result.invitation.status, InvitationStatus::Expired);
    assert_eq!(result.invitation.opened_at, None);
    assert_eq!(result.invitation.expires_at, EXPIRES_AT);
}

#[test]
fn test_access_exactly_at_expiry_still_opens() {
    let invitation: Invitation = create_sent_invitation();

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, EXPIRES_AT).unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Opened);
}

#[test]
fn test_access_to_stored_expired_is_unchanged() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Expired);

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, DURING).unwrap();

    assert!(!result.changed);
    assert!(!result.expired());
    assert_eq!(result.invitation.status, InvitationStatus::Expired);
}

#[test]
fn test_access_to_completed_is_unchanged_after_expiry() {
    let mut invitation: Invitation = create_sent_invitation();
    invitation.status = InvitationStatus::Completed;
    invitation.completed_at = Some(DURING);

    let result: TransitionResult = apply(&invitation, Command::RecordAccess, AFTER).unwrap();

    assert!(!result.changed);
    assert_eq!(result.invitation.status, InvitationStatus::Completed);
}

#[test]
fn test_partial_save_does_not_change_status() {
    let mut invitation: Invitation = create_sent_invitation();
    invitation.status = InvitationStatus::Opened;

    let result: TransitionResult = apply(
        &invitation,
        Command::SaveProgress { is_complete: false },
        DURING,
    )
    .unwrap();

    assert!(!result.changed);
    assert_eq!(result.invitation.status, InvitationStatus::Opened);
}

#[test]
fn test_final_save_completes_invitation() {
    let mut invitation: Invitation = create_sent_invitation();
    invitation.status = InvitationStatus::Opened;

    let result: TransitionResult = apply(
        &invitation,
        Command::SaveProgress { is_complete: true },
        DURING,
    )
    .unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Completed);
    assert_eq!(result.invitation.completed_at, Some(DURING));
}

#[test]
fn test_save_after_completion_is_rejected() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Completed);

    let result: Result<TransitionResult, CoreError> = apply(
        &invitation,
        Command::SaveProgress { is_complete: false },
        DURING,
    );

    assert_eq!(
        result,
        Err(CoreError::AlreadyCompleted { invitation_id: 42 })
    );
}

#[test]
fn test_save_after_expiry_is_rejected() {
    let invitation: Invitation = create_sent_invitation();

    let result: Result<TransitionResult, CoreError> = apply(
        &invitation,
        Command::SaveProgress { is_complete: true },
        AFTER,
    );

    assert_eq!(
        result,
        Err(CoreError::Expired { invitation_id: 42 })
    );
}

#[test]
fn test_resend_increments_reminder_and_keeps_expiry() {
    let mut invitation: Invitation = create_sent_invitation();
    invitation.status = InvitationStatus::Opened;
    invitation.opened_at = Some(DURING);

    let result: TransitionResult = apply(&invitation, Command::Resend, DURING).unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Sent);
    assert_eq!(result.invitation.reminder_count, 1);
    assert_eq!(result.invitation.last_reminder_sent_at, Some(DURING));
    assert_eq!(result.invitation.expires_at, EXPIRES_AT);
    assert_eq!(result.invitation.opened_at, Some(DURING));
    assert_eq!(result.invitation.sent_at, Some(CREATED_AT));
}

#[test]
fn test_resend_revives_expired_invitation() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Expired);

    let result: TransitionResult = apply(&invitation, Command::Resend, AFTER).unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Sent);
    assert_eq!(result.invitation.reminder_count, 1);
    assert_eq!(result.invitation.expires_at, EXPIRES_AT);
}

#[test]
fn test_resend_of_pending_stamps_first_sent_at() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Pending);

    let result: TransitionResult = apply(&invitation, Command::Resend, DURING).unwrap();

    assert_eq!(result.invitation.status, InvitationStatus::Sent);
    assert_eq!(result.invitation.sent_at, Some(DURING));
}

#[test]
fn test_resend_of_completed_is_rejected() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Completed);

    let result: Result<TransitionResult, CoreError> = apply(&invitation, Command::Resend, DURING);

    assert!(matches!(
        result,
        Err(CoreError::AlreadyCompleted { .. })
    ));
}

#[test]
fn test_failed_command_leaves_input_untouched() {
    let invitation: Invitation = create_test_invitation(InvitationStatus::Completed);
    let before: Invitation = invitation.clone();

    let _ = apply(&invitation, Command::Resend, DURING);

    assert_eq!(invitation, before);
}

#[test]
fn test_core_error_display_names_the_command_and_edge() {
    let err: CoreError = CoreError::IllegalTransition {
        invitation_id: 42,
        command: Command::MarkSent.name(),
        from: InvitationStatus::Completed,
        to: InvitationStatus::Sent,
    };
    assert_eq!(
        err.to_string(),
        "MarkSent cannot move invitation 42 from completed to sent"
    );
    assert_eq!(
        CoreError::Expired { invitation_id: 42 }.to_string(),
        "Invitation 42 has expired"
    );
}
