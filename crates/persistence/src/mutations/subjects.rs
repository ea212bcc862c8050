// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case and petition mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use intake_domain::SubjectRef;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewSubject;
use crate::diesel_schema::{cases, petitions};
use crate::error::PersistenceError;
use crate::mutations::timestamp_text;

/// Creates a new case.
///
/// # Errors
///
/// Returns an error if the employer account does not exist or the insert
/// fails.
pub fn create_case(
    conn: &mut SqliteConnection,
    case: &NewSubject<'_>,
) -> Result<SubjectRef, PersistenceError> {
    diesel::insert_into(cases::table)
        .values((
            cases::employer_account_id.eq(case.employer_account_id),
            cases::employee_name.eq(case.employee_name),
            cases::employee_email.eq(case.employee_email),
            cases::job_title.eq(case.job_title),
            cases::case_type.eq(case.subject_type),
            cases::created_at.eq(timestamp_text(case.created_at)?),
        ))
        .execute(conn)?;

    let case_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        case_id,
        employer_account_id = case.employer_account_id,
        "Case created"
    );
    Ok(SubjectRef::Case(case_id))
}

/// Creates a new petition.
///
/// # Errors
///
/// Returns an error if the employer account does not exist or the insert
/// fails.
pub fn create_petition(
    conn: &mut SqliteConnection,
    petition: &NewSubject<'_>,
) -> Result<SubjectRef, PersistenceError> {
    diesel::insert_into(petitions::table)
        .values((
            petitions::employer_account_id.eq(petition.employer_account_id),
            petitions::employee_name.eq(petition.employee_name),
            petitions::employee_email.eq(petition.employee_email),
            petitions::job_title.eq(petition.job_title),
            petitions::petition_type.eq(petition.subject_type),
            petitions::created_at.eq(timestamp_text(petition.created_at)?),
        ))
        .execute(conn)?;

    let petition_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        petition_id,
        employer_account_id = petition.employer_account_id,
        "Petition created"
    );
    Ok(SubjectRef::Petition(petition_id))
}
