// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Questionnaire response mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::{AnswerMap, Invitation, InvitationStatus, QuestionnaireResponse, merge_answers};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::ResponseUpsert;
use crate::diesel_schema::questionnaire_responses;
use crate::error::PersistenceError;
use crate::mutations::invitations::set_status_and_stamp;
use crate::mutations::timestamp_text;
use crate::queries::invitations::get_invitation_by_id;
use crate::queries::responses::get_response_by_invitation;

/// Creates or updates the response of an invitation.
///
/// If no response exists it is created with the supplied fields. Otherwise
/// the supplied fields are merged shallowly over the stored answers:
/// supplied keys overwrite, omitted keys keep their prior value.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `upsert` - The fields and derived values to store
///
/// # Errors
///
/// Returns an error if the invitation does not exist or a write fails.
pub fn upsert_response(
    conn: &mut SqliteConnection,
    upsert: &ResponseUpsert<'_>,
) -> Result<QuestionnaireResponse, PersistenceError> {
    conn.immediate_transaction(|conn| upsert_in_transaction(conn, upsert))
}

/// Stores the final response and marks the invitation completed in one
/// transaction.
///
/// Either both writes are visible or neither is.
///
/// # Errors
///
/// Returns an error if the invitation does not exist or a write fails.
pub fn complete_questionnaire(
    conn: &mut SqliteConnection,
    upsert: &ResponseUpsert<'_>,
    completed_at: OffsetDateTime,
) -> Result<(QuestionnaireResponse, Invitation), PersistenceError> {
    let (response, invitation) = conn.immediate_transaction(|conn| {
        let response: QuestionnaireResponse = upsert_in_transaction(conn, upsert)?;
        set_status_and_stamp(
            conn,
            upsert.invitation_id,
            InvitationStatus::Completed,
            completed_at,
        )?;
        let invitation: Invitation = get_invitation_by_id(conn, upsert.invitation_id)?
            .ok_or(PersistenceError::InvitationNotFound(upsert.invitation_id))?;
        Ok::<_, PersistenceError>((response, invitation))
    })?;

    info!(
        invitation_id = upsert.invitation_id,
        "Questionnaire completed"
    );
    Ok((response, invitation))
}

fn upsert_in_transaction(
    conn: &mut SqliteConnection,
    upsert: &ResponseUpsert<'_>,
) -> Result<QuestionnaireResponse, PersistenceError> {
    let at_text: String = timestamp_text(upsert.at)?;
    let completion: i32 = i32::from(upsert.completion_percentage);
    let is_complete: i32 = i32::from(upsert.is_complete);

    match get_response_by_invitation(conn, upsert.invitation_id)? {
        Some(existing) => {
            let mut answers: AnswerMap = existing.answers;
            merge_answers(&mut answers, upsert.fields);
            let answers_json: String = serde_json::to_string(&answers)?;

            diesel::update(questionnaire_responses::table)
                .filter(questionnaire_responses::response_id.eq(existing.response_id))
                .set((
                    questionnaire_responses::answers_json.eq(&answers_json),
                    questionnaire_responses::current_section
                        .eq(upsert.current_section.as_str()),
                    questionnaire_responses::completion_percentage.eq(completion),
                    questionnaire_responses::is_complete.eq(is_complete),
                    questionnaire_responses::updated_at.eq(&at_text),
                ))
                .execute(conn)?;

            debug!(
                invitation_id = upsert.invitation_id,
                response_id = existing.response_id,
                completion,
                "Questionnaire response updated"
            );
        }
        None => {
            let answers_json: String = serde_json::to_string(upsert.fields)?;

            diesel::insert_into(questionnaire_responses::table)
                .values((
                    questionnaire_responses::invitation_id.eq(upsert.invitation_id),
                    questionnaire_responses::case_id.eq(upsert.subject.case_id()),
                    questionnaire_responses::petition_id.eq(upsert.subject.petition_id()),
                    questionnaire_responses::answers_json.eq(&answers_json),
                    questionnaire_responses::current_section
                        .eq(upsert.current_section.as_str()),
                    questionnaire_responses::completion_percentage.eq(completion),
                    questionnaire_responses::is_complete.eq(is_complete),
                    questionnaire_responses::created_at.eq(&at_text),
                    questionnaire_responses::updated_at.eq(&at_text),
                ))
                .execute(conn)?;

            debug!(
                invitation_id = upsert.invitation_id,
                completion,
                "Questionnaire response created"
            );
        }
    }

    get_response_by_invitation(conn, upsert.invitation_id)?.ok_or_else(|| {
        PersistenceError::NotFound(format!(
            "response for invitation {} vanished after write",
            upsert.invitation_id
        ))
    })
}
