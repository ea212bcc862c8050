// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Handlers validate input, enforce authorization and convert engine
//! results into response DTOs. The current time is passed in by the
//! caller.

use intake_domain::{
    AccountRole, AnswerMap, Invitation, Invitee, QuestionnaireResponse, SubjectKind, SubjectRef,
    SubjectSummary, format_timestamp, normalize_timestamp, validate_email, validate_required,
};
use intake_notify::EmailTransport;
use intake_persistence::{NewAccount, Persistence};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedAccount, AuthenticationService, AuthorizationService};
use crate::error::ApiError;
use crate::lifecycle::{
    FetchedQuestionnaire, InvitationOutcome, LifecycleEngine, SubjectDetails,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    CreateCaseRequest, CreateInvitationRequest, CreatePetitionRequest, CreateSubjectResponse,
    InvitationInfo, InvitationResponse, ListInvitationsQuery, ListInvitationsResponse,
    LoginRequest, LoginResponse, QuestionnaireView, ResponseInfo, SaveProgressRequest,
    SignupRequest, SignupResponse, WhoAmIResponse,
};

/// Creates an account and sends the welcome email.
///
/// Employers must supply an organization name. A failed welcome email is
/// logged and reported in the response; the account is still created.
///
/// # Errors
///
/// Returns an error if:
/// - A field is missing or malformed
/// - The password violates the policy
/// - The email is already registered
pub async fn signup<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    request: &SignupRequest,
    now: OffsetDateTime,
) -> Result<SignupResponse, ApiError> {
    let email: String = request.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_required("display_name", &request.display_name)?;
    let role: AccountRole = AccountRole::from_str(request.role.trim())?;

    let organization_name: Option<&str> = request
        .organization_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    if role == AccountRole::Employer && organization_name.is_none() {
        return Err(ApiError::InvalidInput {
            field: String::from("organization_name"),
            message: String::from("Employers must supply an organization name"),
        });
    }

    PasswordPolicy::default().validate(&request.password, &email)?;

    let account_id: i64 = {
        let mut store = engine.persistence().lock().await;
        store
            .create_account(&NewAccount {
                email: &email,
                display_name: request.display_name.trim(),
                password: &request.password,
                role,
                organization_name,
                created_at: normalize_timestamp(now),
            })
            .map_err(|err| match ApiError::from(err) {
                ApiError::Conflict { .. } => ApiError::Conflict {
                    message: String::from("An account with this email already exists"),
                },
                other => other,
            })?
    };

    let welcome_email_delivered: bool = match engine
        .notifier()
        .send_welcome(&email, request.display_name.trim())
        .await
    {
        Ok(()) => true,
        Err(err) => {
            warn!(account_id, error = %err, "Welcome email failed");
            false
        }
    };

    info!(account_id, role = %role, "Account created");
    Ok(SignupResponse {
        account_id,
        email,
        display_name: request.display_name.trim().to_string(),
        role,
        welcome_email_delivered,
    })
}

/// Logs in and creates a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for unknown emails or wrong passwords.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let now: OffsetDateTime = normalize_timestamp(now);
    let (session_token, account, expires_at): (String, AuthenticatedAccount, OffsetDateTime) =
        AuthenticationService::login(persistence, &request.email, &request.password, now)?;

    Ok(LoginResponse {
        session_token,
        account_id: account.account_id,
        email: account.email,
        display_name: account.display_name,
        role: account.role,
        expires_at: format_timestamp(expires_at)?,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the current account.
#[must_use]
pub fn whoami(account: &AuthenticatedAccount) -> WhoAmIResponse {
    WhoAmIResponse {
        account_id: account.account_id,
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        role: account.role,
        organization_name: account.organization_name.clone(),
    }
}

/// Creates a case and invites its employee.
///
/// # Errors
///
/// Returns an error if the account is not an employer or the input is invalid.
pub async fn create_case<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    request: CreateCaseRequest,
    now: OffsetDateTime,
) -> Result<CreateSubjectResponse, ApiError> {
    AuthorizationService::authorize_employer(account, "create_case")?;
    let details: SubjectDetails = SubjectDetails {
        employee_name: request.employee_name,
        employee_email: request.employee_email,
        job_title: request.job_title,
        subject_type: request.case_type,
    };
    create_subject(engine, account, SubjectKind::Case, &details, now).await
}

/// Creates a petition and invites its employee.
///
/// # Errors
///
/// Returns an error if the account is not an employer or the input is invalid.
pub async fn create_petition<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    request: CreatePetitionRequest,
    now: OffsetDateTime,
) -> Result<CreateSubjectResponse, ApiError> {
    AuthorizationService::authorize_employer(account, "create_petition")?;
    let details: SubjectDetails = SubjectDetails {
        employee_name: request.employee_name,
        employee_email: request.employee_email,
        job_title: request.job_title,
        subject_type: request.petition_type,
    };
    create_subject(engine, account, SubjectKind::Petition, &details, now).await
}

async fn create_subject<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    kind: SubjectKind,
    details: &SubjectDetails,
    now: OffsetDateTime,
) -> Result<CreateSubjectResponse, ApiError> {
    let (subject, outcome): (SubjectRef, InvitationOutcome) = engine
        .create_subject_and_invite(kind, account.account_id, details, now)
        .await?;

    Ok(CreateSubjectResponse {
        subject,
        invitation: InvitationInfo::from_invitation(&outcome.invitation, now)?,
        email_delivered: outcome.email_delivered,
    })
}

/// Invites someone to an existing case or petition.
///
/// # Errors
///
/// Returns an error if the account does not own the subject or the input
/// is invalid.
pub async fn create_invitation<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    request: &CreateInvitationRequest,
    now: OffsetDateTime,
) -> Result<InvitationResponse, ApiError> {
    AuthorizationService::authorize_employer(account, "create_invitation")?;
    let subject: SubjectRef = request.subject()?;
    let summary: SubjectSummary = engine.load_subject(subject).await?;
    AuthorizationService::authorize_subject_owner(account, &summary, "create_invitation")?;

    let outcome: InvitationOutcome = engine
        .create_invitation_and_notify(subject, Invitee::new(&request.email, &request.name), now)
        .await?;

    invitation_response(&outcome, now)
}

/// Lists the invitations of a case or petition, newest first.
///
/// # Errors
///
/// Returns an error if the account does not own the subject.
pub async fn list_invitations<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    query: &ListInvitationsQuery,
    now: OffsetDateTime,
) -> Result<ListInvitationsResponse, ApiError> {
    AuthorizationService::authorize_employer(account, "list_invitations")?;
    let subject: SubjectRef = query.subject()?;
    let summary: SubjectSummary = engine.load_subject(subject).await?;
    AuthorizationService::authorize_subject_owner(account, &summary, "list_invitations")?;

    let invitations: Vec<Invitation> = engine.list_by_subject(subject).await?;
    let invitations: Vec<InvitationInfo> = invitations
        .iter()
        .map(|invitation| InvitationInfo::from_invitation(invitation, now))
        .collect::<Result<_, _>>()?;

    Ok(ListInvitationsResponse {
        subject,
        invitations,
    })
}

/// Re-sends an invitation email.
///
/// # Errors
///
/// Returns an error if the invitation does not exist, the account does not
/// own its subject, or the invitation is completed.
pub async fn resend_invitation<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    invitation_id: i64,
    now: OffsetDateTime,
) -> Result<InvitationResponse, ApiError> {
    AuthorizationService::authorize_employer(account, "resend_invitation")?;
    let invitation: Invitation = engine.get_invitation(invitation_id).await?;
    let summary: SubjectSummary = engine.load_subject(invitation.subject).await?;
    AuthorizationService::authorize_subject_owner(account, &summary, "resend_invitation")?;

    let outcome: InvitationOutcome = engine.resend(invitation_id, now).await?;
    invitation_response(&outcome, now)
}

/// Opens a questionnaire by link token.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `InvitationExpired` for unusable links.
pub async fn get_questionnaire<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    token: &str,
    now: OffsetDateTime,
) -> Result<QuestionnaireView, ApiError> {
    let fetched: FetchedQuestionnaire = engine.fetch_by_token(token, now).await?;
    questionnaire_view(&fetched, now)
}

/// Saves questionnaire answers by link token.
///
/// # Errors
///
/// Returns an error if the link is unusable, the questionnaire is
/// completed, or the body is malformed.
pub async fn save_questionnaire<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    token: &str,
    body: AnswerMap,
    now: OffsetDateTime,
) -> Result<ResponseInfo, ApiError> {
    let request: SaveProgressRequest = SaveProgressRequest::from_body(body)?;
    let invitation_id: i64 = engine.invitation_id_for_token(token).await?;
    save(engine, invitation_id, request, now).await
}

/// Opens a questionnaire for the signed-in invitee.
///
/// # Errors
///
/// Returns an error if the account is not the invitee or the invitation is
/// unusable.
pub async fn get_employee_questionnaire<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    invitation_id: i64,
    now: OffsetDateTime,
) -> Result<QuestionnaireView, ApiError> {
    let invitation: Invitation = engine.get_invitation(invitation_id).await?;
    AuthorizationService::authorize_invitee(account, &invitation, "view_questionnaire")?;

    let fetched: FetchedQuestionnaire = engine.fetch_by_id(invitation_id, now).await?;
    questionnaire_view(&fetched, now)
}

/// Saves questionnaire answers for the signed-in invitee.
///
/// # Errors
///
/// Returns an error if the account is not the invitee, the invitation is
/// unusable, or the body is malformed.
pub async fn save_employee_questionnaire<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    account: &AuthenticatedAccount,
    invitation_id: i64,
    body: AnswerMap,
    now: OffsetDateTime,
) -> Result<ResponseInfo, ApiError> {
    let request: SaveProgressRequest = SaveProgressRequest::from_body(body)?;
    let invitation: Invitation = engine.get_invitation(invitation_id).await?;
    AuthorizationService::authorize_invitee(account, &invitation, "save_questionnaire")?;

    save(engine, invitation_id, request, now).await
}

async fn save<T: EmailTransport>(
    engine: &LifecycleEngine<T>,
    invitation_id: i64,
    request: SaveProgressRequest,
    now: OffsetDateTime,
) -> Result<ResponseInfo, ApiError> {
    let response: QuestionnaireResponse = engine
        .save_progress(
            invitation_id,
            request.current_section,
            request.fields,
            request.is_complete,
            now,
        )
        .await?;
    ResponseInfo::try_from(&response)
}

fn invitation_response(
    outcome: &InvitationOutcome,
    now: OffsetDateTime,
) -> Result<InvitationResponse, ApiError> {
    Ok(InvitationResponse {
        invitation: InvitationInfo::from_invitation(&outcome.invitation, now)?,
        email_delivered: outcome.email_delivered,
    })
}

fn questionnaire_view(
    fetched: &FetchedQuestionnaire,
    now: OffsetDateTime,
) -> Result<QuestionnaireView, ApiError> {
    Ok(QuestionnaireView {
        invitation: InvitationInfo::from_invitation(&fetched.invitation, now)?,
        subject: fetched.subject.clone(),
        response: fetched
            .response
            .as_ref()
            .map(ResponseInfo::try_from)
            .transpose()?,
    })
}
