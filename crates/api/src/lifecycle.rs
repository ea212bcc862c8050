// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invitation lifecycle orchestration.
//!
//! The engine combines the pure lifecycle rules with the store and the
//! notifier. Each operation runs sequentially. The store lock is released
//! while an email is in flight and re-acquired to record the outcome, so a
//! slow email provider never blocks unrelated requests.
//!
//! Email failures are downgraded to warnings here: creation and resend
//! report success to their caller with `email_delivered = false`.

use intake::{Command, TransitionResult, apply};
use intake_domain::{
    AnswerMap, DEFAULT_INVITATION_EXPIRY_DAYS, Invitation, InvitationStatus, Invitee,
    QuestionnaireResponse, SectionId, SubjectKind, SubjectRef, SubjectSummary, completion_for_answers,
    generate_token, invitation_expiry, merge_answers, normalize_timestamp, validate_email,
    validate_invitee, validate_required,
};
use intake_notify::{EmailTransport, InvitationContext, Notifier};
use intake_persistence::{NewInvitation, NewSubject, Persistence, ResponseUpsert};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Date format used in email copy, e.g. "January 31, 2026".
const EMAIL_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL for questionnaire links, without a trailing slash.
    pub public_url: String,
    /// Days an invitation stays usable.
    pub invitation_expiry_days: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            public_url: String::from("http://localhost:3000"),
            invitation_expiry_days: DEFAULT_INVITATION_EXPIRY_DAYS,
        }
    }
}

/// An invitation together with the outcome of its email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationOutcome {
    pub invitation: Invitation,
    pub email_delivered: bool,
}

/// The result of opening a questionnaire link.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedQuestionnaire {
    pub invitation: Invitation,
    pub subject: SubjectSummary,
    pub response: Option<QuestionnaireResponse>,
}

/// Fields of a new case or petition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDetails {
    pub employee_name: String,
    pub employee_email: String,
    pub job_title: String,
    /// Case type or petition type.
    pub subject_type: String,
}

/// Orchestrates invitation creation, access, progress and resends.
pub struct LifecycleEngine<T: EmailTransport> {
    persistence: Arc<Mutex<Persistence>>,
    notifier: Notifier<T>,
    config: EngineConfig,
}

impl<T: EmailTransport> LifecycleEngine<T> {
    /// Creates an engine over a shared store and a notifier.
    #[must_use]
    pub const fn new(
        persistence: Arc<Mutex<Persistence>>,
        notifier: Notifier<T>,
        config: EngineConfig,
    ) -> Self {
        Self {
            persistence,
            notifier,
            config,
        }
    }

    /// Returns the shared store handle.
    #[must_use]
    pub const fn persistence(&self) -> &Arc<Mutex<Persistence>> {
        &self.persistence
    }

    /// Returns the notifier.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier<T> {
        &self.notifier
    }

    /// Returns the engine settings.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn store(&self) -> MutexGuard<'_, Persistence> {
        self.persistence.lock().await
    }

    /// Loads the display fields of a case or petition.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the subject does not exist.
    pub async fn load_subject(&self, subject: SubjectRef) -> Result<SubjectSummary, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        require_subject(&mut store, subject)
    }

    /// Loads an invitation without applying any transition.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the invitation does not exist.
    pub async fn get_invitation(&self, invitation_id: i64) -> Result<Invitation, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        require_invitation(&mut store, invitation_id)
    }

    /// Creates a case or petition and invites its employee.
    ///
    /// # Arguments
    ///
    /// * `kind` - Whether to create a case or a petition
    /// * `employer_account_id` - The owning employer
    /// * `details` - The subject fields
    /// * `now` - The creation time
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for missing or malformed fields, or an
    /// internal error if the store fails.
    pub async fn create_subject_and_invite(
        &self,
        kind: SubjectKind,
        employer_account_id: i64,
        details: &SubjectDetails,
        now: OffsetDateTime,
    ) -> Result<(SubjectRef, InvitationOutcome), ApiError> {
        validate_required("employee_name", &details.employee_name)?;
        validate_email(details.employee_email.trim())?;
        validate_required("job_title", &details.job_title)?;
        let type_field: &'static str = match kind {
            SubjectKind::Case => "case_type",
            SubjectKind::Petition => "petition_type",
        };
        validate_required(type_field, &details.subject_type)?;

        let now: OffsetDateTime = normalize_timestamp(now);
        let invitee: Invitee = Invitee::new(&details.employee_email, &details.employee_name);
        let new_subject: NewSubject<'_> = NewSubject {
            employer_account_id,
            employee_name: details.employee_name.trim(),
            employee_email: &invitee.email,
            job_title: details.job_title.trim(),
            subject_type: details.subject_type.trim(),
            created_at: now,
        };

        let subject: SubjectRef = {
            let mut store: MutexGuard<'_, Persistence> = self.store().await;
            match kind {
                SubjectKind::Case => store.create_case(&new_subject)?,
                SubjectKind::Petition => store.create_petition(&new_subject)?,
            }
        };

        let outcome: InvitationOutcome = self
            .create_invitation_and_notify(subject, invitee, now)
            .await?;
        Ok((subject, outcome))
    }

    /// Creates an invitation and emails it to the invitee.
    ///
    /// The invitation is persisted as `pending` first. A delivered email
    /// moves it to `sent`; a failed email leaves it `pending` and usable by
    /// direct link.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed invitee, `ResourceNotFound`
    /// for an unknown subject, or an internal error if the store fails.
    /// Email failures are not errors.
    pub async fn create_invitation_and_notify(
        &self,
        subject: SubjectRef,
        invitee: Invitee,
        now: OffsetDateTime,
    ) -> Result<InvitationOutcome, ApiError> {
        validate_invitee(&invitee)?;
        let now: OffsetDateTime = normalize_timestamp(now);
        let expires_at: OffsetDateTime = invitation_expiry(now, self.config.invitation_expiry_days)?;
        let token: String = generate_token();

        let (invitation, summary): (Invitation, SubjectSummary) = {
            let mut store: MutexGuard<'_, Persistence> = self.store().await;
            let summary: SubjectSummary = require_subject(&mut store, subject)?;
            let invitation: Invitation = store.create_invitation(&NewInvitation {
                token: &token,
                subject,
                invitee: &invitee,
                created_at: now,
                expires_at,
            })?;
            (invitation, summary)
        };

        let context: InvitationContext = self.invitation_context(&invitation, &summary, false);
        match self
            .notifier
            .send_invitation(&invitation.subject_email, &context)
            .await
        {
            Ok(()) => {
                let mut store: MutexGuard<'_, Persistence> = self.store().await;
                let current: Invitation = require_invitation(&mut store, invitation.invitation_id)?;
                let result: TransitionResult = apply(&current, Command::MarkSent, now)?;
                if result.changed {
                    store.update_invitation_status(
                        current.invitation_id,
                        InvitationStatus::Sent,
                        now,
                    )?;
                }
                info!(
                    invitation_id = invitation.invitation_id,
                    subject = %subject,
                    "Invitation sent"
                );
                Ok(InvitationOutcome {
                    invitation: result.invitation,
                    email_delivered: true,
                })
            }
            Err(err) => {
                warn!(
                    invitation_id = invitation.invitation_id,
                    error = %err,
                    "Invitation email failed; invitation remains pending"
                );
                Ok(InvitationOutcome {
                    invitation,
                    email_delivered: false,
                })
            }
        }
    }

    /// Opens a questionnaire by its link token.
    ///
    /// The expiry check runs before any other state change. An expired
    /// invitation is recorded as `expired` and reported as
    /// `InvitationExpired`; otherwise the first access records `opened`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown token, `InvitationExpired`
    /// past the expiry time, or an internal error if the store fails.
    pub async fn fetch_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<FetchedQuestionnaire, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        let invitation: Invitation =
            store
                .get_invitation_by_token(token)?
                .ok_or_else(|| ApiError::ResourceNotFound {
                    resource_type: String::from("Invitation"),
                    message: String::from("Invalid or expired invitation link"),
                })?;
        open_questionnaire(&mut store, invitation, now)
    }

    /// Opens a questionnaire by invitation ID.
    ///
    /// Same rules as [`Self::fetch_by_token`]; used by authenticated
    /// employees.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `InvitationExpired`, or an internal error.
    pub async fn fetch_by_id(
        &self,
        invitation_id: i64,
        now: OffsetDateTime,
    ) -> Result<FetchedQuestionnaire, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        let invitation: Invitation = require_invitation(&mut store, invitation_id)?;
        open_questionnaire(&mut store, invitation, now)
    }

    /// Resolves a link token to its invitation ID without any transition.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown token.
    pub async fn invitation_id_for_token(&self, token: &str) -> Result<i64, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        store
            .get_invitation_by_token(token)?
            .map(|invitation| invitation.invitation_id)
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Invitation"),
                message: String::from("Invalid or expired invitation link"),
            })
    }

    /// Saves questionnaire answers.
    ///
    /// Supplied fields are merged over stored answers and completion is
    /// recomputed from the merged set. With `is_complete` the response and
    /// the `completed` status are committed together.
    ///
    /// A completed questionnaire is immutable. Replaying the final
    /// submission with identical fields returns the stored response.
    ///
    /// # Arguments
    ///
    /// * `invitation_id` - The invitation being answered
    /// * `section` - The section the invitee is on, if supplied
    /// * `fields` - Partial answers
    /// * `is_complete` - Whether this is the final submission
    /// * `now` - The save time
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `InvitationExpired`, `AlreadyCompleted`,
    /// or an internal error if the store fails.
    pub async fn save_progress(
        &self,
        invitation_id: i64,
        section: Option<SectionId>,
        fields: AnswerMap,
        is_complete: bool,
        now: OffsetDateTime,
    ) -> Result<QuestionnaireResponse, ApiError> {
        let now: OffsetDateTime = normalize_timestamp(now);
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        let invitation: Invitation = require_invitation(&mut store, invitation_id)?;
        let existing: Option<QuestionnaireResponse> =
            store.get_response_by_invitation(invitation_id)?;

        let replayed: Option<&QuestionnaireResponse> = existing.as_ref().filter(|stored| {
            invitation.status == InvitationStatus::Completed
                && is_replay(stored, &fields, is_complete)
        });
        if let Some(stored) = replayed {
            debug!(invitation_id, "Final submission replayed");
            return Ok(stored.clone());
        }

        if let Err(err) = apply(&invitation, Command::SaveProgress { is_complete }, now) {
            if invitation.status != InvitationStatus::Expired
                && invitation.effective_status(now) == InvitationStatus::Expired
            {
                store.update_invitation_status(invitation_id, InvitationStatus::Expired, now)?;
                info!(invitation_id, "Invitation expired");
            }
            return Err(err.into());
        }

        let mut merged: AnswerMap = existing
            .as_ref()
            .map(|response| response.answers.clone())
            .unwrap_or_default();
        merge_answers(&mut merged, &fields);
        let completion_percentage: u8 = completion_for_answers(&merged)?;
        let current_section: SectionId = section
            .or_else(|| existing.as_ref().map(|response| response.current_section))
            .unwrap_or_else(SectionId::first);

        let upsert: ResponseUpsert<'_> = ResponseUpsert {
            invitation_id,
            subject: invitation.subject,
            fields: &fields,
            current_section,
            completion_percentage,
            is_complete,
            at: now,
        };

        if is_complete {
            let (response, _completed): (QuestionnaireResponse, Invitation) =
                store.complete_questionnaire(&upsert, now)?;
            info!(invitation_id, "Questionnaire submitted");
            Ok(response)
        } else {
            let response: QuestionnaireResponse = store.upsert_response(&upsert)?;
            debug!(
                invitation_id,
                completion_percentage,
                section = %current_section,
                "Questionnaire progress saved"
            );
            Ok(response)
        }
    }

    /// Re-sends the invitation email as a reminder.
    ///
    /// On delivery the invitation moves to `sent`, the reminder count
    /// increases by one and `expires_at` is left unchanged. A failed email
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown invitation,
    /// `AlreadyCompleted` for a completed one, or an internal error if the
    /// store fails.
    pub async fn resend(
        &self,
        invitation_id: i64,
        now: OffsetDateTime,
    ) -> Result<InvitationOutcome, ApiError> {
        let now: OffsetDateTime = normalize_timestamp(now);
        let (invitation, summary): (Invitation, SubjectSummary) = {
            let mut store: MutexGuard<'_, Persistence> = self.store().await;
            let invitation: Invitation = require_invitation(&mut store, invitation_id)?;
            // Rejects completed invitations before any email goes out.
            apply(&invitation, Command::Resend, now)?;
            let summary: SubjectSummary = require_subject(&mut store, invitation.subject)?;
            (invitation, summary)
        };

        let context: InvitationContext = self.invitation_context(&invitation, &summary, true);
        if let Err(err) = self
            .notifier
            .send_invitation(&invitation.subject_email, &context)
            .await
        {
            warn!(invitation_id, error = %err, "Reminder email failed");
            return Ok(InvitationOutcome {
                invitation,
                email_delivered: false,
            });
        }

        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        let current: Invitation = require_invitation(&mut store, invitation_id)?;
        let result: TransitionResult = apply(&current, Command::Resend, now)?;
        store.increment_reminder(invitation_id, now)?;
        info!(
            invitation_id,
            reminder_count = result.invitation.reminder_count,
            previous_status = %result.previous_status,
            "Reminder sent"
        );

        Ok(InvitationOutcome {
            invitation: result.invitation,
            email_delivered: true,
        })
    }

    /// Lists the invitations of a case or petition, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown subject, or an internal
    /// error if the store fails.
    pub async fn list_by_subject(&self, subject: SubjectRef) -> Result<Vec<Invitation>, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store().await;
        require_subject(&mut store, subject)?;
        Ok(store.list_invitations_by_subject(subject)?)
    }

    fn invitation_context(
        &self,
        invitation: &Invitation,
        summary: &SubjectSummary,
        is_reminder: bool,
    ) -> InvitationContext {
        let kind_label: &str = match summary.subject {
            SubjectRef::Case(_) => "case",
            SubjectRef::Petition(_) => "petition",
        };
        InvitationContext {
            invitee_name: invitation.invitee_name.clone(),
            employer_name: summary.employer_name.clone(),
            subject_type: format!(
                "{} {kind_label}",
                summary.subject_type.replace('_', " ")
            ),
            job_title: summary.job_title.clone(),
            login_url: format!(
                "{}/questionnaire/{}",
                self.config.public_url.trim_end_matches('/'),
                invitation.token
            ),
            expires_on: invitation
                .expires_at
                .format(EMAIL_DATE_FORMAT)
                .unwrap_or_else(|_| invitation.expires_at.date().to_string()),
            is_reminder,
        }
    }
}

fn require_invitation(
    store: &mut Persistence,
    invitation_id: i64,
) -> Result<Invitation, ApiError> {
    store
        .get_invitation_by_id(invitation_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Invitation"),
            message: format!("Invitation {invitation_id} does not exist"),
        })
}

fn require_subject(store: &mut Persistence, subject: SubjectRef) -> Result<SubjectSummary, ApiError> {
    store
        .get_subject(subject)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Subject"),
            message: format!("{subject} does not exist"),
        })
}

/// Applies the access rules and loads the page data.
fn open_questionnaire(
    store: &mut Persistence,
    invitation: Invitation,
    now: OffsetDateTime,
) -> Result<FetchedQuestionnaire, ApiError> {
    let now: OffsetDateTime = normalize_timestamp(now);
    let result: TransitionResult = apply(&invitation, Command::RecordAccess, now)?;

    if result.invitation.status == InvitationStatus::Expired {
        if result.expired() {
            store.update_invitation_status(
                invitation.invitation_id,
                InvitationStatus::Expired,
                now,
            )?;
            info!(
                invitation_id = invitation.invitation_id,
                previous_status = %result.previous_status,
                "Invitation expired"
            );
        }
        return Err(ApiError::InvitationExpired {
            invitation_id: invitation.invitation_id,
        });
    }

    if result.changed {
        store.update_invitation_status(invitation.invitation_id, InvitationStatus::Opened, now)?;
        info!(
            invitation_id = invitation.invitation_id,
            "Invitation opened"
        );
    }

    let subject: SubjectSummary = require_subject(store, invitation.subject)?;
    let response: Option<QuestionnaireResponse> =
        store.get_response_by_invitation(invitation.invitation_id)?;

    Ok(FetchedQuestionnaire {
        invitation: result.invitation,
        subject,
        response,
    })
}

/// True if a save against a completed questionnaire repeats the final
/// submission exactly.
fn is_replay(stored: &QuestionnaireResponse, fields: &AnswerMap, is_complete: bool) -> bool {
    is_complete
        && stored.is_complete
        && fields
            .iter()
            .all(|(key, value)| stored.answers.get(key) == Some(value))
}
