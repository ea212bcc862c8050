// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for case and petition persistence.

use intake_domain::{SubjectKind, SubjectRef};

use crate::tests::{CREATED_AT, create_test_case, create_test_employer};
use crate::{NewSubject, Persistence};

#[test]
fn test_case_summary_uses_organization_name() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subject = create_test_case(&mut persistence);

    assert_eq!(subject.kind(), SubjectKind::Case);

    let summary = persistence.get_subject(subject).unwrap().unwrap();
    assert_eq!(summary.subject, subject);
    assert_eq!(summary.employer_name, "Acme Corp");
    assert_eq!(summary.employee_name, "Jane Doe");
    assert_eq!(summary.job_title, "Software Engineer");
    assert_eq!(summary.subject_type, "new_employment");
}

#[test]
fn test_petition_summary() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let employer_id = create_test_employer(&mut persistence);

    let subject = persistence
        .create_petition(&NewSubject {
            employer_account_id: employer_id,
            employee_name: "Raj Patel",
            employee_email: "raj@example.com",
            job_title: "Data Scientist",
            subject_type: "cap_subject",
            created_at: CREATED_AT,
        })
        .unwrap();

    assert_eq!(subject.kind(), SubjectKind::Petition);
    let summary = persistence.get_subject(subject).unwrap().unwrap();
    assert_eq!(summary.employer_account_id, employer_id);
    assert_eq!(summary.subject_type, "cap_subject");
}

#[test]
fn test_case_and_petition_ids_are_separate_namespaces() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let case = create_test_case(&mut persistence);

    assert!(
        persistence
            .get_subject(SubjectRef::Petition(case.id()))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_case_requires_existing_employer() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.create_case(&NewSubject {
        employer_account_id: 999,
        employee_name: "Nobody",
        employee_email: "nobody@example.com",
        job_title: "None",
        subject_type: "new_employment",
        created_at: CREATED_AT,
    });

    assert!(result.is_err());
}
