// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Questionnaire response queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::{AnswerMap, QuestionnaireResponse, SectionId, SubjectRef, parse_timestamp};
use std::str::FromStr;

use crate::diesel_schema::questionnaire_responses;
use crate::error::PersistenceError;

/// Diesel Queryable struct for response rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = questionnaire_responses)]
struct ResponseRow {
    response_id: i64,
    invitation_id: i64,
    case_id: Option<i64>,
    petition_id: Option<i64>,
    answers_json: String,
    current_section: String,
    completion_percentage: i32,
    is_complete: i32,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ResponseRow> for QuestionnaireResponse {
    type Error = PersistenceError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        let answers: AnswerMap = serde_json::from_str(&row.answers_json)?;
        let completion_percentage: u8 = u8::try_from(row.completion_percentage)
            .ok()
            .filter(|percent| *percent <= 100)
            .ok_or_else(|| {
                PersistenceError::CorruptRow(format!(
                    "response {} has completion_percentage {}",
                    row.response_id, row.completion_percentage
                ))
            })?;

        Ok(Self {
            response_id: row.response_id,
            invitation_id: row.invitation_id,
            subject: SubjectRef::from_columns(row.case_id, row.petition_id)?,
            answers,
            current_section: SectionId::from_str(&row.current_section)?,
            completion_percentage,
            is_complete: row.is_complete != 0,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Retrieves the response belonging to an invitation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invitation_id` - The owning invitation
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if no response has been saved yet.
pub fn get_response_by_invitation(
    conn: &mut SqliteConnection,
    invitation_id: i64,
) -> Result<Option<QuestionnaireResponse>, PersistenceError> {
    let row: Option<ResponseRow> = questionnaire_responses::table
        .filter(questionnaire_responses::invitation_id.eq(invitation_id))
        .select(ResponseRow::as_select())
        .first(conn)
        .optional()?;

    row.map(QuestionnaireResponse::try_from).transpose()
}
