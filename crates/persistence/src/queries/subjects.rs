// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case and petition read queries.
//!
//! Subjects are only read for display: email templating and the
//! questionnaire page header.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::{SubjectRef, SubjectSummary};
use tracing::debug;

use crate::diesel_schema::{accounts, cases, petitions};
use crate::error::PersistenceError;

type SubjectRow = (i64, String, String, String, String, String, Option<String>);

fn to_summary(subject: SubjectRef, row: SubjectRow) -> SubjectSummary {
    let (
        employer_account_id,
        employee_name,
        employee_email,
        job_title,
        subject_type,
        display_name,
        organization_name,
    ) = row;

    SubjectSummary {
        subject,
        employer_account_id,
        // Employers always carry an organisation name; fall back to the
        // account display name for rows created before that rule.
        employer_name: organization_name.unwrap_or(display_name),
        employee_name,
        employee_email,
        job_title,
        subject_type,
    }
}

/// Retrieves the display fields of a case or petition.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `subject` - The case or petition to look up
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the subject does not exist.
pub fn get_subject(
    conn: &mut SqliteConnection,
    subject: SubjectRef,
) -> Result<Option<SubjectSummary>, PersistenceError> {
    debug!(subject = %subject, "Looking up subject");

    let row: Option<SubjectRow> = match subject {
        SubjectRef::Case(case_id) => cases::table
            .inner_join(accounts::table)
            .filter(cases::case_id.eq(case_id))
            .select((
                cases::employer_account_id,
                cases::employee_name,
                cases::employee_email,
                cases::job_title,
                cases::case_type,
                accounts::display_name,
                accounts::organization_name,
            ))
            .first(conn)
            .optional()?,
        SubjectRef::Petition(petition_id) => petitions::table
            .inner_join(accounts::table)
            .filter(petitions::petition_id.eq(petition_id))
            .select((
                petitions::employer_account_id,
                petitions::employee_name,
                petitions::employee_email,
                petitions::job_title,
                petitions::petition_type,
                accounts::display_name,
                accounts::organization_name,
            ))
            .first(conn)
            .optional()?,
    };

    Ok(row.map(|row| to_summary(subject, row)))
}
