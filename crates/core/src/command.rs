// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents an event in an invitation's life as data only.
///
/// Commands are the only way to request invitation status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The invitation email was delivered for the first time.
    MarkSent,
    /// The invitee followed the link.
    RecordAccess,
    /// A questionnaire section was saved.
    SaveProgress {
        /// Whether this save finishes the questionnaire.
        is_complete: bool,
    },
    /// The employer re-delivered the invitation email.
    Resend,
}

impl Command {
    /// Returns the command name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MarkSent => "MarkSent",
            Self::RecordAccess => "RecordAccess",
            Self::SaveProgress { .. } => "SaveProgress",
            Self::Resend => "Resend",
        }
    }
}
