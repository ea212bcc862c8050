// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Invitee;

/// Maximum accepted length of an email address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum accepted length of a display name.
const MAX_NAME_LENGTH: usize = 200;

/// Validates that an email address is plausibly deliverable.
///
/// This is a structural check only: one `@`, a non-empty local part, and
/// a domain containing a dot with no empty labels.
///
/// # Arguments
///
/// * `email` - The email address to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` describing the first failed rule.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(DomainError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot contain whitespace",
        )));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must contain '@'",
        )));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must have exactly one '@' preceded by a local part",
        )));
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(DomainError::InvalidEmail(format!(
            "Email domain '{domain}' is not valid"
        )));
    }

    Ok(())
}

/// Validates that a required text field is present.
///
/// # Errors
///
/// Returns `DomainError::MissingField` if the value is blank, or
/// `DomainError::InvalidField` if it is longer than 200 characters.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            reason: format!("cannot exceed {MAX_NAME_LENGTH} characters"),
        });
    }

    Ok(())
}

/// Validates the invitee of a new invitation.
///
/// # Errors
///
/// Returns an error if the email is malformed or the name is blank.
pub fn validate_invitee(invitee: &Invitee) -> Result<(), DomainError> {
    validate_email(&invitee.email)?;
    validate_required("invitee_name", &invitee.name)
}
