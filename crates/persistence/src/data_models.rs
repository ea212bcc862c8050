// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use intake_domain::{AccountRole, AnswerMap, Invitee, SectionId, SubjectRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AccountRole,
    pub organization_name: Option<String>,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Input for a new account. The password is hashed before it is stored.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub display_name: &'a str,
    pub password: &'a str,
    pub role: AccountRole,
    pub organization_name: Option<&'a str>,
    pub created_at: OffsetDateTime,
}

/// Input for a new case or petition.
#[derive(Debug, Clone)]
pub struct NewSubject<'a> {
    pub employer_account_id: i64,
    pub employee_name: &'a str,
    pub employee_email: &'a str,
    pub job_title: &'a str,
    /// Case type for cases, petition type for petitions.
    pub subject_type: &'a str,
    pub created_at: OffsetDateTime,
}

/// Input for a new invitation. Status starts as `pending` with no reminders.
#[derive(Debug, Clone)]
pub struct NewInvitation<'a> {
    pub token: &'a str,
    pub subject: SubjectRef,
    pub invitee: &'a Invitee,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Input for a questionnaire response upsert.
///
/// `fields` are merged shallowly over any stored answers.
#[derive(Debug, Clone)]
pub struct ResponseUpsert<'a> {
    pub invitation_id: i64,
    pub subject: SubjectRef,
    pub fields: &'a AnswerMap,
    pub current_section: SectionId,
    pub completion_percentage: u8,
    pub is_complete: bool,
    pub at: OffsetDateTime,
}
