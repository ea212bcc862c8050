// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invitation status tracking and transition logic.
//!
//! This module defines invitation status states and valid transitions.
//! `Completed` and `Expired` are terminal with respect to the invitee:
//! nothing the invitee does moves an invitation out of them. The single
//! exception is a resend, which the employer may issue against an expired
//! invitation to put it back into `Sent`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Invitation status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Invitation has been persisted but no email has been delivered
    Pending,
    /// Invitation email has been delivered (or re-delivered)
    Sent,
    /// Invitee has followed the link at least once
    Opened,
    /// Invitee has submitted the final questionnaire section
    Completed,
    /// Invitation was read after its expiry time
    Expired,
}

impl InvitationStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Opened => "opened",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInvitationStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "opened" => Ok(Self::Opened),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidInvitationStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal for the invitee.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Re-applying the current status is accepted for every non-completed
    /// state so that store writes stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if *self == Self::Completed {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "completed invitations are immutable".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(
                new_status,
                Self::Pending | Self::Sent | Self::Opened | Self::Completed | Self::Expired
            ),
            Self::Sent | Self::Opened => matches!(
                new_status,
                Self::Sent | Self::Opened | Self::Completed | Self::Expired
            ),
            // Only a resend revives an expired invitation
            Self::Expired => matches!(new_status, Self::Expired | Self::Sent),
            Self::Completed => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by invitation lifecycle rules".to_string(),
            })
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
