// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Questionnaire completion percentage.

use crate::error::DomainError;
use crate::questionnaire::{AnswerMap, SectionId, answered_fields, section_field_counts};
use std::collections::BTreeSet;

/// Computes the completion percentage from a set of answered fields.
///
/// The result is `round(100 * answered / total)` using round-half-up,
/// clamped to 100 when more fields are answered than configured.
///
/// # Arguments
///
/// * `answered` - Names of fields holding a non-empty answer
/// * `sections` - Field count per section
///
/// # Errors
///
/// Returns `DomainError::NoSectionsConfigured` if the sections hold no fields.
pub fn compute_completion(
    answered: &BTreeSet<&str>,
    sections: &[(SectionId, usize)],
) -> Result<u8, DomainError> {
    let total: usize = sections.iter().map(|(_, count)| *count).sum();
    if total == 0 {
        return Err(DomainError::NoSectionsConfigured);
    }

    let filled: usize = answered.len().min(total);
    let percent: usize = (200 * filled + total) / (2 * total);

    Ok(u8::try_from(percent).unwrap_or(100))
}

/// Computes the completion percentage of an answer map against the fixed
/// questionnaire schema.
///
/// # Errors
///
/// Returns `DomainError::NoSectionsConfigured` if the schema is empty.
pub fn completion_for_answers(answers: &AnswerMap) -> Result<u8, DomainError> {
    compute_completion(&answered_fields(answers), &section_field_counts())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("field_{i}")).collect()
    }

    #[test]
    fn test_two_of_44_is_five_percent() {
        let answered: BTreeSet<&str> = ["employee_first_name", "employee_last_name"]
            .into_iter()
            .collect();
        assert_eq!(compute_completion(&answered, &section_field_counts()), Ok(5));
    }

    #[test]
    fn test_half_rounds_up() {
        // 1 of 8 is 12.5%
        let answered: BTreeSet<&str> = ["a"].into_iter().collect();
        let sections = [(SectionId::PersonalInfo, 8)];
        assert_eq!(compute_completion(&answered, &sections), Ok(13));
    }

    #[test]
    fn test_empty_and_full() {
        let sections = section_field_counts();
        assert_eq!(compute_completion(&BTreeSet::new(), &sections), Ok(0));

        let names = fields(44);
        let answered: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(compute_completion(&answered, &sections), Ok(100));
    }

    #[test]
    fn test_overfull_is_clamped() {
        let names = fields(10);
        let answered: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let sections = [(SectionId::ContactInfo, 3)];
        assert_eq!(compute_completion(&answered, &sections), Ok(100));
    }

    #[test]
    fn test_no_sections_is_a_configuration_error() {
        assert_eq!(
            compute_completion(&BTreeSet::new(), &[]),
            Err(DomainError::NoSectionsConfigured)
        );
        assert_eq!(
            compute_completion(&BTreeSet::new(), &[(SectionId::Education, 0)]),
            Err(DomainError::NoSectionsConfigured)
        );
    }

    #[test]
    fn test_monotonic_as_fields_are_added() {
        let names = fields(44);
        let sections = section_field_counts();
        let mut previous: u8 = 0;
        for n in 0..=44 {
            let answered: BTreeSet<&str> = names[..n].iter().map(String::as_str).collect();
            let Ok(current) = compute_completion(&answered, &sections) else {
                panic!("completion failed at {n}");
            };
            assert!(current >= previous, "{current} < {previous} at {n}");
            previous = current;
        }
        assert_eq!(previous, 100);
    }
}
