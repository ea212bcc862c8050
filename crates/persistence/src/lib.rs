// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the petition intake system.
//!
//! This crate stores accounts, sessions, cases, petitions, invitations and
//! questionnaire responses in `SQLite` via Diesel.
//!
//! ## Storage Rules
//!
//! - Invitation tokens are unique; a duplicate insert fails with
//!   `PersistenceError::UniqueViolation`
//! - Each invitation owns at most one questionnaire response
//! - Every invitation and response references exactly one of a case or a
//!   petition (enforced by a `CHECK` constraint)
//! - Timestamps are stored as fixed-width UTC text with microsecond
//!   precision, so lexical order matches chronological order
//! - Completing a questionnaire writes the final response and the
//!   invitation status in a single transaction
//!
//! ## Testing Philosophy
//!
//! - Every test gets its own shared-cache in-memory database
//! - Migrations run on every connection, so the schema under test is the
//!   schema that ships

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use intake_domain::{Invitation, InvitationStatus, QuestionnaireResponse, SubjectRef, SubjectSummary};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

use crate::backend::sqlite::StoreKind;

#[cfg(test)]
mod tests;

pub use data_models::{
    AccountData, NewAccount, NewInvitation, NewSubject, ResponseUpsert, SessionData,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// Callers that share the adapter across tasks wrap it in a mutex; every
/// method takes `&mut self`.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open_store(&shared_memory_url, StoreKind::Memory)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::sqlite::open_store(path_str, StoreKind::File)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Accounts & Sessions
    // ========================================================================

    /// Creates a new account. The password is hashed with bcrypt.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the email is taken.
    pub fn create_account(&mut self, account: &NewAccount<'_>) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, account)
    }

    /// Retrieves an account by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::accounts::verify_password(password, password_hash)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(
        &mut self,
        account_id: i64,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, account_id, at)
    }

    /// Creates a new session for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(
            &mut self.conn,
            session_token,
            account_id,
            created_at,
            expires_at,
        )
    }

    /// Retrieves a session by its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id, at)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every session that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Cases & Petitions
    // ========================================================================

    /// Creates a case owned by an employer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (for example an unknown employer).
    pub fn create_case(&mut self, case: &NewSubject<'_>) -> Result<SubjectRef, PersistenceError> {
        mutations::subjects::create_case(&mut self.conn, case)
    }

    /// Creates a petition owned by an employer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (for example an unknown employer).
    pub fn create_petition(
        &mut self,
        petition: &NewSubject<'_>,
    ) -> Result<SubjectRef, PersistenceError> {
        mutations::subjects::create_petition(&mut self.conn, petition)
    }

    /// Retrieves the summary of a case or petition.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_subject(
        &mut self,
        subject: SubjectRef,
    ) -> Result<Option<SubjectSummary>, PersistenceError> {
        queries::subjects::get_subject(&mut self.conn, subject)
    }

    // ========================================================================
    // Invitations
    // ========================================================================

    /// Creates a new invitation with `pending` status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the token is already
    /// in use.
    pub fn create_invitation(
        &mut self,
        invitation: &NewInvitation<'_>,
    ) -> Result<Invitation, PersistenceError> {
        mutations::invitations::create_invitation(&mut self.conn, invitation)
    }

    /// Retrieves an invitation by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_invitation_by_token(
        &mut self,
        token: &str,
    ) -> Result<Option<Invitation>, PersistenceError> {
        queries::invitations::get_invitation_by_token(&mut self.conn, token)
    }

    /// Retrieves an invitation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_invitation_by_id(
        &mut self,
        invitation_id: i64,
    ) -> Result<Option<Invitation>, PersistenceError> {
        queries::invitations::get_invitation_by_id(&mut self.conn, invitation_id)
    }

    /// Lists the invitations of a case or petition, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_invitations_by_subject(
        &mut self,
        subject: SubjectRef,
    ) -> Result<Vec<Invitation>, PersistenceError> {
        queries::invitations::list_invitations_by_subject(&mut self.conn, subject)
    }

    /// Sets the status of an invitation, stamping the matching
    /// lifecycle timestamp if it is unset.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvitationNotFound` if the invitation
    /// does not exist.
    pub fn update_invitation_status(
        &mut self,
        invitation_id: i64,
        status: InvitationStatus,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::invitations::update_invitation_status(&mut self.conn, invitation_id, status, at)
    }

    /// Records a reminder for an invitation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvitationNotFound` if the invitation
    /// does not exist.
    pub fn increment_reminder(
        &mut self,
        invitation_id: i64,
        at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::invitations::increment_reminder(&mut self.conn, invitation_id, at)
    }

    // ========================================================================
    // Questionnaire Responses
    // ========================================================================

    /// Retrieves the response of an invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_response_by_invitation(
        &mut self,
        invitation_id: i64,
    ) -> Result<Option<QuestionnaireResponse>, PersistenceError> {
        queries::responses::get_response_by_invitation(&mut self.conn, invitation_id)
    }

    /// Creates or shallowly merges the response of an invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_response(
        &mut self,
        upsert: &ResponseUpsert<'_>,
    ) -> Result<QuestionnaireResponse, PersistenceError> {
        mutations::responses::upsert_response(&mut self.conn, upsert)
    }

    /// Stores the final response and marks the invitation completed
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is then applied.
    pub fn complete_questionnaire(
        &mut self,
        upsert: &ResponseUpsert<'_>,
        completed_at: OffsetDateTime,
    ) -> Result<(QuestionnaireResponse, Invitation), PersistenceError> {
        mutations::responses::complete_questionnaire(&mut self.conn, upsert, completed_at)
    }
}
