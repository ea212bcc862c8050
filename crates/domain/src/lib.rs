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

mod error;
mod invitation_status;
mod progress;
mod questionnaire;
mod timestamp;
mod token;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use invitation_status::InvitationStatus;
pub use progress::{completion_for_answers, compute_completion};
pub use questionnaire::{
    AnswerMap, SectionId, answered_fields, is_answered, merge_answers, section_field_counts,
    section_of_field,
};
pub use timestamp::{format_timestamp, invitation_expiry, normalize_timestamp, parse_timestamp};
pub use token::{TOKEN_BYTES, generate_token};

// Re-export public types
pub use error::DomainError;
pub use types::{
    AccountRole, DEFAULT_INVITATION_EXPIRY_DAYS, Invitation, Invitee, MAX_INVITATION_EXPIRY_DAYS,
    QuestionnaireResponse, SubjectKind, SubjectRef, SubjectSummary,
};
pub use validation::{validate_email, validate_invitee, validate_required};
