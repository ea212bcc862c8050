// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod invitation_tests;
mod subject_tests;

use intake_domain::{AccountRole, Invitation, Invitee, SubjectRef};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{NewAccount, NewInvitation, NewSubject, Persistence};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-01-01 12:00 UTC);
pub const EXPIRES_AT: OffsetDateTime = datetime!(2026-01-31 12:00 UTC);
pub const LATER: OffsetDateTime = datetime!(2026-01-02 09:30 UTC);
pub const MUCH_LATER: OffsetDateTime = datetime!(2026-01-05 16:45 UTC);

pub fn create_test_employer(persistence: &mut Persistence) -> i64 {
    persistence
        .create_account(&NewAccount {
            email: "hr@acme.example",
            display_name: "Acme HR",
            password: "correct horse battery staple",
            role: AccountRole::Employer,
            organization_name: Some("Acme Corp"),
            created_at: CREATED_AT,
        })
        .unwrap()
}

pub fn create_test_case(persistence: &mut Persistence) -> SubjectRef {
    let employer_id: i64 = create_test_employer(persistence);
    persistence
        .create_case(&NewSubject {
            employer_account_id: employer_id,
            employee_name: "Jane Doe",
            employee_email: "jane@example.com",
            job_title: "Software Engineer",
            subject_type: "new_employment",
            created_at: CREATED_AT,
        })
        .unwrap()
}

pub fn create_test_invitation(
    persistence: &mut Persistence,
    subject: SubjectRef,
    token: &str,
) -> Invitation {
    let invitee: Invitee = Invitee::new("Jane@Example.com", "Jane Doe");
    persistence
        .create_invitation(&NewInvitation {
            token,
            subject,
            invitee: &invitee,
            created_at: CREATED_AT,
            expires_at: EXPIRES_AT,
        })
        .unwrap()
}

pub fn test_token(fill: char) -> String {
    std::iter::repeat_n(fill, 64).collect()
}
