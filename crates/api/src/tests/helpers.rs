// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use intake_domain::{AccountRole, AnswerMap, SubjectKind, SubjectRef};
use intake_notify::{MemoryTransport, Notifier};
use intake_persistence::{NewAccount, Persistence};
use std::sync::Arc;
use time::macros::datetime;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    AuthenticatedAccount, EngineConfig, InvitationOutcome, LifecycleEngine, SubjectDetails,
};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-01-01 12:00 UTC);
pub const EXPIRES_AT: OffsetDateTime = datetime!(2026-01-31 12:00 UTC);
pub const DURING: OffsetDateTime = datetime!(2026-01-10 08:15 UTC);
pub const LATER: OffsetDateTime = datetime!(2026-01-20 17:40 UTC);
pub const AFTER_EXPIRY: OffsetDateTime = datetime!(2026-02-01 09:00 UTC);
pub const PASSWORD: &str = "correct horse 42";

pub type TestEngine = LifecycleEngine<MemoryTransport>;

pub fn create_engine() -> TestEngine {
    let persistence = Persistence::new_in_memory().unwrap();
    LifecycleEngine::new(
        Arc::new(Mutex::new(persistence)),
        Notifier::new(MemoryTransport::new()).unwrap(),
        EngineConfig {
            public_url: String::from("https://intake.example.com/"),
            invitation_expiry_days: 30,
        },
    )
}

pub fn transport(engine: &TestEngine) -> &MemoryTransport {
    engine.notifier().transport()
}

pub async fn create_account(
    engine: &TestEngine,
    email: &str,
    role: AccountRole,
    organization_name: Option<&str>,
) -> AuthenticatedAccount {
    let mut store = engine.persistence().lock().await;
    let account_id = store
        .create_account(&NewAccount {
            email,
            display_name: "Test Account",
            password: PASSWORD,
            role,
            organization_name,
            created_at: CREATED_AT,
        })
        .unwrap();
    let account = store.get_account_by_id(account_id).unwrap().unwrap();
    AuthenticatedAccount::from(&account)
}

pub async fn create_employer(engine: &TestEngine) -> AuthenticatedAccount {
    create_account(engine, "hr@acme.example", AccountRole::Employer, Some("Acme Corp")).await
}

pub fn jane_details() -> SubjectDetails {
    SubjectDetails {
        employee_name: String::from("Jane Doe"),
        employee_email: String::from("Jane@Example.com"),
        job_title: String::from("Software Engineer"),
        subject_type: String::from("new_employment"),
    }
}

/// Creates a case for a fresh employer; the invitation email succeeds.
pub async fn create_case_with_invitation(
    engine: &TestEngine,
) -> (AuthenticatedAccount, SubjectRef, InvitationOutcome) {
    let employer = create_employer(engine).await;
    let (subject, outcome) = engine
        .create_subject_and_invite(SubjectKind::Case, employer.account_id, &jane_details(), CREATED_AT)
        .await
        .unwrap();
    (employer, subject, outcome)
}

/// Extracts the token from the questionnaire link of the latest email.
pub fn token_from_last_email(engine: &TestEngine) -> String {
    let sent = transport(engine).sent();
    let message = sent.last().expect("an email was sent");
    let marker = "/questionnaire/";
    let start = message.text.find(marker).expect("link in email") + marker.len();
    message.text[start..start + 64].to_string()
}

pub fn answers(value: serde_json::Value) -> AnswerMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test answers must be an object"),
    }
}
