// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use intake_domain::{Invitation, InvitationStatus};

/// The result of a successful lifecycle transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The status before the command was applied.
    pub previous_status: InvitationStatus,
    /// The invitation after the command was applied.
    pub invitation: Invitation,
    /// Whether any stored field differs from the input invitation.
    pub changed: bool,
}

impl TransitionResult {
    /// Returns true if the transition moved the invitation to `Expired`.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.previous_status != InvitationStatus::Expired
            && self.invitation.status == InvitationStatus::Expired
    }
}
