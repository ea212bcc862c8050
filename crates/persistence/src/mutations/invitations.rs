// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invitation mutations.
//!
//! The store applies writes as instructed; lifecycle rules are enforced by
//! the caller before a mutation is issued.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::{Invitation, InvitationStatus};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewInvitation;
use crate::diesel_schema::invitations;
use crate::error::PersistenceError;
use crate::mutations::timestamp_text;
use crate::queries::invitations::get_invitation_by_id;

/// Creates a new invitation with `pending` status and no reminders.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invitation` - The invitation to create
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the token is already in
/// use, or another error if the insert fails (for example an unknown
/// subject).
pub fn create_invitation(
    conn: &mut SqliteConnection,
    invitation: &NewInvitation<'_>,
) -> Result<Invitation, PersistenceError> {
    diesel::insert_into(invitations::table)
        .values((
            invitations::invitation_token.eq(invitation.token),
            invitations::case_id.eq(invitation.subject.case_id()),
            invitations::petition_id.eq(invitation.subject.petition_id()),
            invitations::subject_email.eq(&invitation.invitee.email),
            invitations::invitee_name.eq(&invitation.invitee.name),
            invitations::status.eq(InvitationStatus::Pending.as_str()),
            invitations::created_at.eq(timestamp_text(invitation.created_at)?),
            invitations::expires_at.eq(timestamp_text(invitation.expires_at)?),
            invitations::reminder_count.eq(0),
        ))
        .execute(conn)?;

    let invitation_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        invitation_id,
        subject = %invitation.subject,
        "Invitation created"
    );

    get_invitation_by_id(conn, invitation_id)?
        .ok_or(PersistenceError::InvitationNotFound(invitation_id))
}

/// Sets an invitation's status and stamps the matching timestamp.
///
/// `sent` stamps `sent_at`, `opened` stamps `opened_at` and `completed`
/// stamps `completed_at`. A timestamp that is already set is left alone,
/// so re-applying a status is harmless. `pending` and `expired` stamp
/// nothing.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invitation_id` - The invitation ID
/// * `status` - The new status
/// * `at` - The time of the transition
///
/// # Errors
///
/// Returns `PersistenceError::InvitationNotFound` if the invitation does
/// not exist, or another error if the update fails.
pub fn update_invitation_status(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    status: InvitationStatus,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| set_status_and_stamp(conn, invitation_id, status, at))?;

    debug!(invitation_id, status = %status, "Invitation status updated");
    Ok(())
}

/// Same as [`update_invitation_status`] but runs inside the caller's
/// transaction.
///
/// # Errors
///
/// Returns `PersistenceError::InvitationNotFound` if the invitation does
/// not exist, or another error if the update fails.
pub fn set_status_and_stamp(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    status: InvitationStatus,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let at_text: String = timestamp_text(at)?;

    let updated: usize = diesel::update(invitations::table)
        .filter(invitations::invitation_id.eq(invitation_id))
        .set(invitations::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::InvitationNotFound(invitation_id));
    }

    let target = invitations::table.filter(invitations::invitation_id.eq(invitation_id));
    match status {
        InvitationStatus::Sent => {
            diesel::update(target.filter(invitations::sent_at.is_null()))
                .set(invitations::sent_at.eq(Some(at_text.as_str())))
                .execute(conn)?;
        }
        InvitationStatus::Opened => {
            diesel::update(target.filter(invitations::opened_at.is_null()))
                .set(invitations::opened_at.eq(Some(at_text.as_str())))
                .execute(conn)?;
        }
        InvitationStatus::Completed => {
            diesel::update(target.filter(invitations::completed_at.is_null()))
                .set(invitations::completed_at.eq(Some(at_text.as_str())))
                .execute(conn)?;
        }
        InvitationStatus::Pending | InvitationStatus::Expired => {}
    }

    Ok(())
}

/// Records a resend: `reminder_count += 1`, `last_reminder_sent_at = at`,
/// `status = sent`.
///
/// `sent_at` is stamped only if the invitation was never delivered before.
/// `expires_at` is never touched.
///
/// # Errors
///
/// Returns `PersistenceError::InvitationNotFound` if the invitation does
/// not exist, or another error if the update fails.
pub fn increment_reminder(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| record_reminder(conn, invitation_id, at))?;

    info!(invitation_id, "Invitation reminder recorded");
    Ok(())
}

fn record_reminder(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let at_text: String = timestamp_text(at)?;

    let updated: usize = diesel::update(invitations::table)
        .filter(invitations::invitation_id.eq(invitation_id))
        .set((
            invitations::reminder_count.eq(invitations::reminder_count + 1),
            invitations::last_reminder_sent_at.eq(Some(at_text.as_str())),
            invitations::status.eq(InvitationStatus::Sent.as_str()),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::InvitationNotFound(invitation_id));
    }

    diesel::update(
        invitations::table
            .filter(invitations::invitation_id.eq(invitation_id))
            .filter(invitations::sent_at.is_null()),
    )
    .set(invitations::sent_at.eq(Some(at_text.as_str())))
    .execute(conn)?;

    Ok(())
}
