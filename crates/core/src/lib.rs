// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! The invitation lifecycle as a pure function.
//!
//! `apply` takes the current invitation, a command and the current time and
//! returns the invitation as it should be stored next. Nothing here touches
//! storage or email; callers persist the result when it reports a change.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use intake_domain::{Invitation, InvitationStatus};
use time::OffsetDateTime;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::TransitionResult;

/// Validates that the invitation still accepts questionnaire answers.
///
/// This is a read-only check; it does not change the invitation.
///
/// # Arguments
///
/// * `invitation` - The invitation being edited
/// * `now` - The current time
///
/// # Errors
///
/// Returns `CoreError::AlreadyCompleted` for completed invitations and
/// `CoreError::Expired` for invitations that are expired or past their
/// expiry time.
pub fn validate_editable(invitation: &Invitation, now: OffsetDateTime) -> Result<(), CoreError> {
    match invitation.effective_status(now) {
        InvitationStatus::Completed => Err(CoreError::AlreadyCompleted {
            invitation_id: invitation.invitation_id,
        }),
        InvitationStatus::Expired => Err(CoreError::Expired {
            invitation_id: invitation.invitation_id,
        }),
        InvitationStatus::Pending | InvitationStatus::Sent | InvitationStatus::Opened => Ok(()),
    }
}
