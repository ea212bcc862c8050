// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAccount;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;
use crate::mutations::timestamp_text;

/// Creates a new account.
///
/// The email is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account` - The account to create; its password is hashed with bcrypt
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is taken, or
/// another error if the account cannot be created.
pub fn create_account(
    conn: &mut SqliteConnection,
    account: &NewAccount<'_>,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = account.email.trim().to_lowercase();

    info!(
        email = %normalized_email,
        role = %account.role,
        "Creating account"
    );

    let password_hash: String = bcrypt::hash(account.password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::email.eq(&normalized_email),
            accounts::display_name.eq(account.display_name),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(account.role.as_str()),
            accounts::organization_name.eq(account.organization_name),
            accounts::created_at.eq(timestamp_text(account.created_at)?),
        ))
        .execute(conn)?;

    let account_id: i64 = get_last_insert_rowid(conn)?;

    info!(account_id, "Account created successfully");
    Ok(account_id)
}

/// Updates the last login timestamp for an account.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    account_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!(account_id, "Updating last_login_at");

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(Some(timestamp_text(at)?)))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `account_id` - The account ID
/// * `created_at` - Session start
/// * `expires_at` - Session expiry
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_text: String = timestamp_text(created_at)?;
    let expires_text: String = timestamp_text(expires_at)?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::created_at.eq(&created_text),
            sessions::last_activity_at.eq(&created_text),
            sessions::expires_at.eq(&expires_text),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;

    debug!(session_id, account_id, expires_at = %expires_text, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(timestamp_text(at)?))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    debug!(deleted, "Session deleted");
    Ok(())
}

/// Deletes all sessions that expired before `now`.
///
/// Timestamps are stored in a fixed-width format, so a text comparison is
/// a chronological comparison.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(timestamp_text(now)?))
        .execute(conn)?;

    if deleted > 0 {
        info!(deleted, "Deleted expired sessions");
    }
    Ok(deleted)
}
