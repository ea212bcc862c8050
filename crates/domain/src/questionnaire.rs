// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The fixed questionnaire schema.
//!
//! Eight sections, 44 answer fields in total. Answers are stored as a
//! flat JSON object keyed by field name; a field belongs to exactly one
//! section.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Flat map of answer field name to value.
pub type AnswerMap = serde_json::Map<String, Value>;

/// Questionnaire sections, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    PersonalInfo,
    ContactInfo,
    ImmigrationStatus,
    PreviousHistory,
    Education,
    WorkExperience,
    FamilyInfo,
    AdditionalInfo,
}

impl SectionId {
    /// All sections in presentation order.
    pub const ALL: [Self; 8] = [
        Self::PersonalInfo,
        Self::ContactInfo,
        Self::ImmigrationStatus,
        Self::PreviousHistory,
        Self::Education,
        Self::WorkExperience,
        Self::FamilyInfo,
        Self::AdditionalInfo,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal_info",
            Self::ContactInfo => "contact_info",
            Self::ImmigrationStatus => "immigration_status",
            Self::PreviousHistory => "previous_history",
            Self::Education => "education",
            Self::WorkExperience => "work_experience",
            Self::FamilyInfo => "family_info",
            Self::AdditionalInfo => "additional_info",
        }
    }

    /// Returns the answer field names belonging to this section.
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::PersonalInfo => &[
                "employee_first_name",
                "employee_last_name",
                "employee_middle_name",
                "date_of_birth",
                "country_of_birth",
                "country_of_citizenship",
                "gender",
                "passport_number",
            ],
            Self::ContactInfo => &["home_address", "phone_number", "personal_email"],
            Self::ImmigrationStatus => &[
                "current_visa_status",
                "i94_number",
                "i94_expiration_date",
                "visa_expiration_date",
                "last_entry_date",
                "port_of_entry",
                "sevis_number",
                "ead_number",
                "alien_number",
            ],
            Self::PreviousHistory => &[
                "previous_h1b_petitions",
                "previous_visa_denials",
                "immigration_violations",
                "previous_h1b_employers",
            ],
            Self::Education => &[
                "highest_degree",
                "field_of_study",
                "university_name",
                "graduation_date",
                "degree_country",
                "credential_evaluation",
            ],
            Self::WorkExperience => &[
                "current_employer",
                "current_job_title",
                "employment_start_date",
                "job_duties",
                "years_of_experience",
                "previous_employment",
            ],
            Self::FamilyInfo => &[
                "marital_status",
                "spouse_name",
                "spouse_date_of_birth",
                "number_of_children",
                "dependents_accompanying",
            ],
            Self::AdditionalInfo => &[
                "criminal_history",
                "additional_comments",
                "certification_accepted",
            ],
        }
    }

    /// Returns the first section, used for brand new responses.
    #[must_use]
    pub const fn first() -> Self {
        Self::PersonalInfo
    }

    /// Returns true if this is the last section of the questionnaire.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        matches!(self, Self::AdditionalInfo)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| DomainError::InvalidSection(s.to_string()))
    }
}

/// Returns the `(section, field count)` list for the fixed schema.
#[must_use]
pub fn section_field_counts() -> Vec<(SectionId, usize)> {
    SectionId::ALL
        .into_iter()
        .map(|section| (section, section.fields().len()))
        .collect()
}

/// Returns the section a field belongs to, if it is part of the schema.
#[must_use]
pub fn section_of_field(field: &str) -> Option<SectionId> {
    SectionId::ALL
        .into_iter()
        .find(|section| section.fields().contains(&field))
}

/// Returns true if a value counts as an answer.
///
/// Null and the empty string do not; everything else does, including
/// `0`, `false`, empty arrays and empty objects.
#[must_use]
pub fn is_answered(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Returns the schema fields in `answers` that hold an answer.
///
/// Keys that are not part of the schema are ignored.
#[must_use]
pub fn answered_fields(answers: &AnswerMap) -> BTreeSet<&str> {
    answers
        .iter()
        .filter(|(key, value)| section_of_field(key).is_some() && is_answered(value))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Shallow-merges `partial` over `existing`.
///
/// Supplied keys overwrite, omitted keys keep their prior value. A key
/// supplied as `null` is stored as `null`, which clears the answer.
pub fn merge_answers(existing: &mut AnswerMap, partial: &AnswerMap) {
    for (key, value) in partial {
        existing.insert(key.clone(), value.clone());
    }
}
