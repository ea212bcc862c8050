// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::TransitionResult;
use crate::validate_editable;
use intake_domain::{Invitation, InvitationStatus, normalize_timestamp};
use time::OffsetDateTime;

/// Applies a command to an invitation, producing the next invitation state.
///
/// The expiry check runs before any other rule, so an invitation read past
/// its expiry time is never marked opened.
///
/// # Arguments
///
/// * `invitation` - The current invitation (immutable)
/// * `command` - The command to apply
/// * `now` - The current time
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the next invitation state
/// * `Err(CoreError)` if the command is not permitted
///
/// # Errors
///
/// Returns an error if:
/// - A questionnaire save targets a completed or expired invitation
/// - A resend targets a completed invitation
/// - The resulting status change violates the lifecycle rules
pub fn apply(
    invitation: &Invitation,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let now: OffsetDateTime = normalize_timestamp(now);
    let previous_status: InvitationStatus = invitation.status;
    let mut next: Invitation = invitation.clone();

    match command {
        Command::MarkSent => {
            // Only a pending invitation moves; a link opened before the
            // email returned keeps its later status.
            if invitation.status == InvitationStatus::Pending {
                transition(&mut next, command, InvitationStatus::Sent)?;
                next.sent_at = Some(now);
            }
        }
        Command::RecordAccess => {
            if invitation.effective_status(now) == InvitationStatus::Expired {
                if !invitation.status.is_terminal() {
                    transition(&mut next, command, InvitationStatus::Expired)?;
                }
            } else if matches!(
                invitation.status,
                InvitationStatus::Pending | InvitationStatus::Sent
            ) {
                transition(&mut next, command, InvitationStatus::Opened)?;
                if next.opened_at.is_none() {
                    next.opened_at = Some(now);
                }
            }
        }
        Command::SaveProgress { is_complete } => {
            validate_editable(invitation, now)?;
            if is_complete {
                transition(&mut next, command, InvitationStatus::Completed)?;
                next.completed_at = Some(now);
            }
        }
        Command::Resend => {
            if invitation.status == InvitationStatus::Completed {
                return Err(CoreError::AlreadyCompleted {
                    invitation_id: invitation.invitation_id,
                });
            }
            transition(&mut next, command, InvitationStatus::Sent)?;
            next.reminder_count = invitation.reminder_count.saturating_add(1);
            next.last_reminder_sent_at = Some(now);
            if next.sent_at.is_none() {
                next.sent_at = Some(now);
            }
        }
    }

    let changed: bool = next != *invitation;
    Ok(TransitionResult {
        previous_status,
        invitation: next,
        changed,
    })
}

fn transition(
    invitation: &mut Invitation,
    command: Command,
    to: InvitationStatus,
) -> Result<(), CoreError> {
    invitation
        .status
        .validate_transition(to)
        .map_err(|_| CoreError::IllegalTransition {
            invitation_id: invitation.invitation_id,
            command: command.name(),
            from: invitation.status,
            to,
        })?;
    invitation.status = to;
    Ok(())
}
