// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use intake::CoreError;
use intake_domain::DomainError;
use intake_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role or relationship required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the account may not perform this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role or relationship required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The invitation exists but is past its expiry time.
    InvitationExpired {
        /// The invitation identifier.
        invitation_id: i64,
    },
    /// The questionnaire has been completed and can no longer change.
    AlreadyCompleted {
        /// The invitation identifier.
        invitation_id: i64,
    },
    /// A uniqueness rule was violated (for example a taken email).
    Conflict {
        /// What collided.
        message: String,
    },
    /// An internal error occurred (store unavailable, misconfiguration).
    Internal {
        /// A description of the internal error. Never shown to clients.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvitationExpired { invitation_id } => {
                write!(f, "Invitation {invitation_id} has expired")
            }
            Self::AlreadyCompleted { invitation_id } => {
                write!(f, "Invitation {invitation_id} is already completed")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::MissingField(field) => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} is required"),
        },
        DomainError::InvalidField { field, reason } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::InvalidSubject(msg) => ApiError::InvalidInput {
            field: String::from("subject"),
            message: msg,
        },
        DomainError::InvalidSection(section) => ApiError::InvalidInput {
            field: String::from("current_section"),
            message: format!("Unknown questionnaire section '{section}'"),
        },
        DomainError::InvalidRole(role) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role '{role}'. Must be employer, employee or attorney"),
        },
        DomainError::InvalidExpiryDays(days) => ApiError::InvalidInput {
            field: String::from("invitation_expiry_days"),
            message: format!("Invalid invitation expiry of {days} days"),
        },
        DomainError::InvalidInvitationStatus { .. }
        | DomainError::InvalidStatusTransition { .. }
        | DomainError::NoSectionsConfigured
        | DomainError::DateArithmeticOverflow { .. }
        | DomainError::TimestampParseError { .. }
        | DomainError::TimestampFormatError(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::AlreadyCompleted { invitation_id } => {
            ApiError::AlreadyCompleted { invitation_id }
        }
        CoreError::Expired { invitation_id } => ApiError::InvitationExpired { invitation_id },
        CoreError::IllegalTransition { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Missing rows become `ResourceNotFound` and unique violations become
/// `Conflict`; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::InvitationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Invitation"),
            message: format!("Invitation {id} does not exist"),
        },
        PersistenceError::AccountNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: format!("Account {id} does not exist"),
        },
        PersistenceError::UniqueViolation(msg) => ApiError::Conflict { message: msg },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
