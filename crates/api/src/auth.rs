// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use intake_domain::{AccountRole, Invitation, SubjectSummary, generate_token, parse_timestamp};
use intake_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: i64,
    /// Lowercase email address.
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    /// Set for employers.
    pub organization_name: Option<String>,
}

impl From<&AccountData> for AuthenticatedAccount {
    fn from(account: &AccountData) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            organization_name: account.organization_name.clone(),
        }
    }
}

/// Authorization service for role and ownership checks.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the account is an employer.
    ///
    /// # Arguments
    ///
    /// * `account` - The authenticated account
    /// * `action` - The action being attempted, for the error message
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not an employer.
    pub fn authorize_employer(
        account: &AuthenticatedAccount,
        action: &str,
    ) -> Result<(), AuthError> {
        match account.role {
            AccountRole::Employer => Ok(()),
            AccountRole::Employee | AccountRole::Attorney => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("employer role"),
            }),
        }
    }

    /// Checks that the account is the employer owning a case or petition.
    ///
    /// Only the owning employer may invite for a subject, list its
    /// invitations or resend them.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not an employer or does not own
    /// the subject.
    pub fn authorize_subject_owner(
        account: &AuthenticatedAccount,
        subject: &SubjectSummary,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::authorize_employer(account, action)?;
        if subject.employer_account_id != account.account_id {
            return Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: format!("ownership of {}", subject.subject),
            });
        }
        Ok(())
    }

    /// Checks that an employee account is the invitee of an invitation.
    ///
    /// The account email must match the invitation's `subject_email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not an employee or is not the
    /// invitee.
    pub fn authorize_invitee(
        account: &AuthenticatedAccount,
        invitation: &Invitation,
        action: &str,
    ) -> Result<(), AuthError> {
        if account.role != AccountRole::Employee {
            return Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("employee role"),
            });
        }
        if !account.email.eq_ignore_ascii_case(&invitation.subject_email) {
            return Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("the invited employee"),
            });
        }
        Ok(())
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// How long a session stays valid after login.
    pub const SESSION_DURATION: Duration = Duration::hours(8);

    /// Verifies credentials and creates a session.
    ///
    /// Unknown emails and wrong passwords fail with the same reason.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The plaintext password
    /// * `now` - The login time
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_account`, `session_expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(String, AuthenticatedAccount, OffsetDateTime), AuthError> {
        let account: AccountData = persistence
            .get_account_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let password_valid: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            debug!(account_id = account.account_id, "Password mismatch");
            return Err(Self::invalid_credentials());
        }

        let session_token: String = generate_token();
        let expires_at: OffsetDateTime = now + Self::SESSION_DURATION;

        persistence
            .create_session(&session_token, account.account_id, now, expires_at)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(account.account_id, now)
            .map_err(Self::map_persistence_error)?;

        info!(account_id = account.account_id, role = %account.role, "Login succeeded");
        Ok((
            session_token,
            AuthenticatedAccount::from(&account),
            expires_at,
        ))
    }

    /// Validates a session token and returns the authenticated account.
    ///
    /// An expired session is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedAccount, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if now > expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id, now)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedAccount::from(&account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        }
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        warn!(error = %err, "Authentication store failure");
        AuthError::AuthenticationFailed {
            reason: String::from("Authentication is temporarily unavailable"),
        }
    }
}
