// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use intake_domain::InvitationStatus;

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The questionnaire was submitted; the invitation takes no further
    /// answers or reminders.
    AlreadyCompleted { invitation_id: i64 },
    /// The invitation is past its expiry time.
    Expired { invitation_id: i64 },
    /// The command would move the invitation along an edge the lifecycle
    /// does not have.
    IllegalTransition {
        invitation_id: i64,
        command: &'static str,
        from: InvitationStatus,
        to: InvitationStatus,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyCompleted { invitation_id } => {
                write!(f, "Invitation {invitation_id} is already completed")
            }
            Self::Expired { invitation_id } => write!(f, "Invitation {invitation_id} has expired"),
            Self::IllegalTransition {
                invitation_id,
                command,
                from,
                to,
            } => write!(
                f,
                "{command} cannot move invitation {invitation_id} from {from} to {to}"
            ),
        }
    }
}

impl std::error::Error for CoreError {}
