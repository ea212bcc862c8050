// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An email address is empty or malformed.
    InvalidEmail(String),
    /// A required field is missing or blank.
    MissingField(&'static str),
    /// A field value failed validation.
    InvalidField {
        /// The field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// The subject reference does not identify exactly one case or petition.
    InvalidSubject(String),
    /// Invitation status string is not recognised.
    InvalidInvitationStatus {
        /// The invalid status string.
        status: String,
    },
    /// Questionnaire section identifier is not recognised.
    InvalidSection(String),
    /// Account role string is not recognised.
    InvalidRole(String),
    /// A status transition is not permitted by the invitation lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// Progress cannot be computed because no questionnaire fields are configured.
    NoSectionsConfigured,
    /// Invitation expiry window is outside the permitted range.
    InvalidExpiryDays(i64),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse a timestamp from string.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a timestamp.
    TimestampFormatError(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::MissingField(field) => write!(f, "Field '{field}' is required"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::InvalidSubject(msg) => write!(f, "Invalid subject: {msg}"),
            Self::InvalidInvitationStatus { status } => {
                write!(f, "Invalid invitation status: '{status}'")
            }
            Self::InvalidSection(section) => {
                write!(f, "Unknown questionnaire section: '{section}'")
            }
            Self::InvalidRole(role) => write!(f, "Invalid account role: '{role}'"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid invitation status transition from '{from}' to '{to}': {reason}"
                )
            }
            Self::NoSectionsConfigured => {
                write!(
                    f,
                    "Cannot compute completion: no questionnaire fields are configured"
                )
            }
            Self::InvalidExpiryDays(days) => {
                write!(
                    f,
                    "Invalid invitation expiry: {days} days. Must be between 1 and 365"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
            Self::TimestampFormatError(msg) => write!(f, "Failed to format timestamp: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
