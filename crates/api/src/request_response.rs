// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Invitation tokens never appear in a response body. They only travel
//! inside the questionnaire link of the invitation email.

use intake_domain::{
    AccountRole, AnswerMap, Invitation, InvitationStatus, QuestionnaireResponse, SectionId,
    SubjectRef, SubjectSummary, format_timestamp,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::error::ApiError;

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    /// `employer`, `employee` or `attorney`.
    pub role: String,
    /// Required for employers; shown as the employer name in emails.
    pub organization_name: Option<String>,
}

/// API response for a successful signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    /// False if the welcome email could not be delivered.
    pub welcome_email_delivered: bool,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub expires_at: String,
}

/// The current account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub organization_name: Option<String>,
}

/// API request to create a case and invite its employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCaseRequest {
    pub employee_name: String,
    pub employee_email: String,
    pub job_title: String,
    pub case_type: String,
}

/// API request to create a petition and invite its employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePetitionRequest {
    pub employee_name: String,
    pub employee_email: String,
    pub job_title: String,
    pub petition_type: String,
}

/// API response for a created case or petition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubjectResponse {
    pub subject: SubjectRef,
    /// The invitation sent to the employee.
    pub invitation: InvitationInfo,
    pub email_delivered: bool,
}

/// API request to invite someone to a case or petition.
///
/// Exactly one of `case_id` and `petition_id` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateInvitationRequest {
    pub case_id: Option<i64>,
    pub petition_id: Option<i64>,
    pub email: String,
    pub name: String,
}

impl CreateInvitationRequest {
    /// Returns the subject the request targets.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one of `case_id` and `petition_id`
    /// is set.
    pub fn subject(&self) -> Result<SubjectRef, ApiError> {
        Ok(SubjectRef::from_columns(self.case_id, self.petition_id)?)
    }
}

/// Query for listing invitations of a case or petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListInvitationsQuery {
    pub case_id: Option<i64>,
    pub petition_id: Option<i64>,
}

impl ListInvitationsQuery {
    /// Returns the subject the query targets.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one of `case_id` and `petition_id`
    /// is set.
    pub fn subject(&self) -> Result<SubjectRef, ApiError> {
        Ok(SubjectRef::from_columns(self.case_id, self.petition_id)?)
    }
}

/// An invitation as shown to clients. Carries no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationInfo {
    pub invitation_id: i64,
    pub subject: SubjectRef,
    pub subject_email: String,
    pub invitee_name: String,
    /// Effective status at read time.
    pub status: InvitationStatus,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub opened_at: Option<String>,
    pub completed_at: Option<String>,
    pub expires_at: String,
    pub reminder_count: u32,
    pub last_reminder_sent_at: Option<String>,
}

impl InvitationInfo {
    /// Builds the client view of an invitation as observed at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_invitation(invitation: &Invitation, now: OffsetDateTime) -> Result<Self, ApiError> {
        Ok(Self {
            invitation_id: invitation.invitation_id,
            subject: invitation.subject,
            subject_email: invitation.subject_email.clone(),
            invitee_name: invitation.invitee_name.clone(),
            status: invitation.effective_status(now),
            created_at: format_timestamp(invitation.created_at)?,
            sent_at: invitation.sent_at.map(format_timestamp).transpose()?,
            opened_at: invitation.opened_at.map(format_timestamp).transpose()?,
            completed_at: invitation.completed_at.map(format_timestamp).transpose()?,
            expires_at: format_timestamp(invitation.expires_at)?,
            reminder_count: invitation.reminder_count,
            last_reminder_sent_at: invitation
                .last_reminder_sent_at
                .map(format_timestamp)
                .transpose()?,
        })
    }
}

/// API response for invitation creation and resend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationResponse {
    pub invitation: InvitationInfo,
    /// False if the email could not be delivered. The invitation is still
    /// usable by direct link.
    pub email_delivered: bool,
}

/// API response listing the invitations of a subject, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInvitationsResponse {
    pub subject: SubjectRef,
    pub invitations: Vec<InvitationInfo>,
}

/// A questionnaire response as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub response_id: i64,
    pub invitation_id: i64,
    pub subject: SubjectRef,
    pub answers: AnswerMap,
    pub current_section: SectionId,
    pub completion_percentage: u8,
    pub is_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&QuestionnaireResponse> for ResponseInfo {
    type Error = ApiError;

    fn try_from(response: &QuestionnaireResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            response_id: response.response_id,
            invitation_id: response.invitation_id,
            subject: response.subject,
            answers: response.answers.clone(),
            current_section: response.current_section,
            completion_percentage: response.completion_percentage,
            is_complete: response.is_complete,
            created_at: format_timestamp(response.created_at)?,
            updated_at: format_timestamp(response.updated_at)?,
        })
    }
}

/// Everything the questionnaire page needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireView {
    pub invitation: InvitationInfo,
    pub subject: SubjectSummary,
    /// `None` until the first save.
    pub response: Option<ResponseInfo>,
}

/// A questionnaire save, parsed from a flat JSON body.
///
/// The body carries the answer fields next to the control keys
/// `current_section`, `is_complete` and `completion_percentage`. The
/// client's `completion_percentage` is discarded; it is always recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveProgressRequest {
    /// `None` keeps the stored section (or the first section for a new
    /// response).
    pub current_section: Option<SectionId>,
    pub fields: AnswerMap,
    pub is_complete: bool,
}

impl SaveProgressRequest {
    /// Splits a flat JSON body into control keys and answer fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is unknown or a control key has the
    /// wrong type.
    pub fn from_body(mut body: AnswerMap) -> Result<Self, ApiError> {
        let current_section: Option<SectionId> = match body.remove("current_section") {
            None | Some(Value::Null) => None,
            Some(Value::String(section)) => Some(SectionId::from_str(&section)?),
            Some(_) => {
                return Err(ApiError::InvalidInput {
                    field: String::from("current_section"),
                    message: String::from("current_section must be a string"),
                });
            }
        };

        let is_complete: bool = match body.remove("is_complete") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => flag,
            Some(_) => {
                return Err(ApiError::InvalidInput {
                    field: String::from("is_complete"),
                    message: String::from("is_complete must be a boolean"),
                });
            }
        };

        body.remove("completion_percentage");

        Ok(Self {
            current_section,
            fields: body,
            is_complete,
        })
    }
}
