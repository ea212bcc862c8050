// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::invitation_status::InvitationStatus;
use crate::questionnaire::{AnswerMap, SectionId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Default number of days an invitation stays usable after creation.
pub const DEFAULT_INVITATION_EXPIRY_DAYS: u16 = 30;

/// Upper bound on a configured invitation expiry window.
pub const MAX_INVITATION_EXPIRY_DAYS: u16 = 365;

/// The kind of record an invitation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Case,
    Petition,
}

impl SubjectKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Petition => "petition",
        }
    }
}

/// The case or petition an invitation and its response belong to.
///
/// Exactly one of the two is ever referenced; storage columns that allow
/// both to be set are converted through [`SubjectRef::from_columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SubjectRef {
    Case(i64),
    Petition(i64),
}

impl SubjectRef {
    /// Builds a subject reference from a pair of nullable foreign keys.
    ///
    /// # Arguments
    ///
    /// * `case_id` - The case identifier, if any
    /// * `petition_id` - The petition identifier, if any
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSubject` unless exactly one id is present.
    pub fn from_columns(case_id: Option<i64>, petition_id: Option<i64>) -> Result<Self, DomainError> {
        match (case_id, petition_id) {
            (Some(id), None) => Ok(Self::Case(id)),
            (None, Some(id)) => Ok(Self::Petition(id)),
            (Some(_), Some(_)) => Err(DomainError::InvalidSubject(
                "both case_id and petition_id are set".to_string(),
            )),
            (None, None) => Err(DomainError::InvalidSubject(
                "one of case_id or petition_id is required".to_string(),
            )),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        match self {
            Self::Case(_) => SubjectKind::Case,
            Self::Petition(_) => SubjectKind::Petition,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Case(id) | Self::Petition(id) => *id,
        }
    }

    #[must_use]
    pub const fn case_id(&self) -> Option<i64> {
        match self {
            Self::Case(id) => Some(*id),
            Self::Petition(_) => None,
        }
    }

    #[must_use]
    pub const fn petition_id(&self) -> Option<i64> {
        match self {
            Self::Petition(id) => Some(*id),
            Self::Case(_) => None,
        }
    }
}

impl std::fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id())
    }
}

/// The person an invitation is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitee {
    /// Email address the invitation is delivered to.
    pub email: String,
    /// Display name used in the invitation email.
    pub name: String,
}

impl Invitee {
    /// Creates a new invitee, normalizing the email to lowercase.
    #[must_use]
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
        }
    }
}

/// An offer for a specific person to complete a questionnaire for a subject.
///
/// `expires_at` is fixed at creation and never moves. The stored `status`
/// may lag behind the clock; use [`Invitation::effective_status`] when the
/// answer must reflect expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Invitation {
    /// Canonical internal identifier.
    pub invitation_id: i64,
    /// Secret link token. Never logged.
    pub token: String,
    /// The case or petition this invitation belongs to.
    pub subject: SubjectRef,
    /// Email address of the invitee.
    pub subject_email: String,
    /// Display name of the invitee.
    pub invitee_name: String,
    pub status: InvitationStatus,
    pub created_at: OffsetDateTime,
    pub sent_at: Option<OffsetDateTime>,
    pub opened_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    pub expires_at: OffsetDateTime,
    /// Number of resends issued since creation.
    pub reminder_count: u32,
    pub last_reminder_sent_at: Option<OffsetDateTime>,
}

impl Invitation {
    /// Returns true if `now` is strictly past the expiry time.
    #[must_use]
    pub fn is_past_expiry(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }

    /// Returns the status as observed at `now`.
    ///
    /// A non-terminal invitation read after its expiry time is reported as
    /// `Expired` even if the store has not recorded it yet.
    #[must_use]
    pub fn effective_status(&self, now: OffsetDateTime) -> InvitationStatus {
        if !self.status.is_terminal() && self.is_past_expiry(now) {
            InvitationStatus::Expired
        } else {
            self.status
        }
    }
}

impl std::fmt::Debug for Invitation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invitation")
            .field("invitation_id", &self.invitation_id)
            .field("token", &"<redacted>")
            .field("subject", &self.subject)
            .field("subject_email", &self.subject_email)
            .field("invitee_name", &self.invitee_name)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("sent_at", &self.sent_at)
            .field("opened_at", &self.opened_at)
            .field("completed_at", &self.completed_at)
            .field("expires_at", &self.expires_at)
            .field("reminder_count", &self.reminder_count)
            .field("last_reminder_sent_at", &self.last_reminder_sent_at)
            .finish()
    }
}

/// The invitee's answers, one-to-one with an invitation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireResponse {
    /// Canonical internal identifier.
    pub response_id: i64,
    /// The owning invitation.
    pub invitation_id: i64,
    /// Copied from the invitation for query convenience.
    pub subject: SubjectRef,
    /// Flat map of answer fields. Unknown keys are kept but do not count
    /// toward completion.
    pub answers: AnswerMap,
    pub current_section: SectionId,
    /// Derived from `answers`; recomputed on every save.
    pub completion_percentage: u8,
    pub is_complete: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Display fields of a case or petition, used for email text and the
/// questionnaire page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: SubjectRef,
    /// Account that owns the subject.
    pub employer_account_id: i64,
    pub employer_name: String,
    pub employee_name: String,
    pub employee_email: String,
    pub job_title: String,
    /// Case type or petition type, e.g. "new_employment".
    pub subject_type: String,
}

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Creates cases and petitions and invites employees.
    Employer,
    /// Completes questionnaires.
    Employee,
    /// May sign in; has no case or questionnaire permissions.
    Attorney,
}

impl AccountRole {
    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employer => "employer",
            Self::Employee => "employee",
            Self::Attorney => "attorney",
        }
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employer" => Ok(Self::Employer),
            "employee" => Ok(Self::Employee),
            "attorney" => Ok(Self::Attorney),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
