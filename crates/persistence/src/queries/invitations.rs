// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invitation queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::{Invitation, InvitationStatus, SubjectRef, parse_timestamp};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::debug;

use crate::diesel_schema::invitations;
use crate::error::PersistenceError;

/// Diesel Queryable struct for invitation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = invitations)]
struct InvitationRow {
    invitation_id: i64,
    invitation_token: String,
    case_id: Option<i64>,
    petition_id: Option<i64>,
    subject_email: String,
    invitee_name: String,
    status: String,
    created_at: String,
    sent_at: Option<String>,
    opened_at: Option<String>,
    completed_at: Option<String>,
    expires_at: String,
    reminder_count: i32,
    last_reminder_sent_at: Option<String>,
}

fn optional_timestamp(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    Ok(value.map(parse_timestamp).transpose()?)
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = PersistenceError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        let reminder_count: u32 = u32::try_from(row.reminder_count).map_err(|_| {
            PersistenceError::CorruptRow(format!(
                "invitation {} has negative reminder_count",
                row.invitation_id
            ))
        })?;

        Ok(Self {
            invitation_id: row.invitation_id,
            token: row.invitation_token,
            subject: SubjectRef::from_columns(row.case_id, row.petition_id)?,
            subject_email: row.subject_email,
            invitee_name: row.invitee_name,
            status: InvitationStatus::from_str(&row.status)?,
            created_at: parse_timestamp(&row.created_at)?,
            sent_at: optional_timestamp(row.sent_at.as_deref())?,
            opened_at: optional_timestamp(row.opened_at.as_deref())?,
            completed_at: optional_timestamp(row.completed_at.as_deref())?,
            expires_at: parse_timestamp(&row.expires_at)?,
            reminder_count,
            last_reminder_sent_at: optional_timestamp(row.last_reminder_sent_at.as_deref())?,
        })
    }
}

/// Retrieves an invitation by its secret token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The invitation token
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if no invitation carries the token.
pub fn get_invitation_by_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<Invitation>, PersistenceError> {
    let row: Option<InvitationRow> = invitations::table
        .filter(invitations::invitation_token.eq(token))
        .select(InvitationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Invitation::try_from).transpose()
}

/// Retrieves an invitation by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the invitation is not found.
pub fn get_invitation_by_id(
    conn: &mut SqliteConnection,
    invitation_id: i64,
) -> Result<Option<Invitation>, PersistenceError> {
    debug!(invitation_id, "Looking up invitation by ID");

    let row: Option<InvitationRow> = invitations::table
        .filter(invitations::invitation_id.eq(invitation_id))
        .select(InvitationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Invitation::try_from).transpose()
}

/// Lists the invitations of a case or petition, newest first.
///
/// Ties on `created_at` are broken by descending ID so the order is stable.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_invitations_by_subject(
    conn: &mut SqliteConnection,
    subject: SubjectRef,
) -> Result<Vec<Invitation>, PersistenceError> {
    debug!(subject = %subject, "Listing invitations for subject");

    let rows: Vec<InvitationRow> = match subject {
        SubjectRef::Case(case_id) => invitations::table
            .filter(invitations::case_id.eq(case_id))
            .order((
                invitations::created_at.desc(),
                invitations::invitation_id.desc(),
            ))
            .select(InvitationRow::as_select())
            .load(conn)?,
        SubjectRef::Petition(petition_id) => invitations::table
            .filter(invitations::petition_id.eq(petition_id))
            .order((
                invitations::created_at.desc(),
                invitations::invitation_id.desc(),
            ))
            .select(InvitationRow::as_select())
            .load(conn)?,
    };

    rows.into_iter().map(Invitation::try_from).collect()
}
