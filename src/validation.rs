//! Input validation and sanitization.
//!
//! Two layers, run before model building. [`sanitize_assessors`] is the
//! warn-and-recover path: a malformed assessor record costs at most that
//! record, never the run. [`validate_input`] then rejects input the model
//! cannot meaningfully be built from.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::{Assessor, CalendarDomain, Program};

/// Structural input problems that abort a scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate assessor id `{0}`")]
    DuplicateId(String),
    #[error("assessor `{assessor}` references unknown program `{program}`")]
    UnknownProgram { assessor: String, program: String },
    #[error("assessor `{0}` has no capabilities")]
    NoCapabilities(String),
    #[error("program `{0}` has no roles")]
    EmptyProgram(String),
    #[error("duplicate program name `{0}`")]
    DuplicateProgram(String),
}

/// Checks assessors and programs for structural problems.
///
/// The run pipeline sanitizes first, so through `Scheduler::run` the
/// duplicate-id and unknown-program variants cannot fire (those records
/// are repaired before this runs). They reject raw input when this is
/// called directly.
pub fn validate_input(assessors: &[Assessor], programs: &[Program]) -> Result<(), ValidationError> {
    let mut program_names = BTreeSet::new();
    for program in programs {
        if program.roles.is_empty() {
            return Err(ValidationError::EmptyProgram(program.name.clone()));
        }
        if !program_names.insert(program.name.as_str()) {
            return Err(ValidationError::DuplicateProgram(program.name.clone()));
        }
    }

    let mut ids = BTreeSet::new();
    for assessor in assessors {
        if !ids.insert(assessor.id.as_str()) {
            return Err(ValidationError::DuplicateId(assessor.id.clone()));
        }
        if assessor.capabilities.is_empty() {
            return Err(ValidationError::NoCapabilities(assessor.id.clone()));
        }
        for name in &assessor.programs {
            if !program_names.contains(name.as_str()) {
                return Err(ValidationError::UnknownProgram {
                    assessor: assessor.id.clone(),
                    program: name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Repairs recoverable record problems, logging each repair.
///
/// - a repeated assessor id drops the later record;
/// - references to programs that do not exist are removed;
/// - a missing capacity declaration for a month in the calendar is
///   reported (the model reads it as 0).
pub fn sanitize_assessors(
    assessors: Vec<Assessor>,
    programs: &[Program],
    calendar: &CalendarDomain,
) -> Vec<Assessor> {
    let known: BTreeSet<&str> = programs.iter().map(|p| p.name.as_str()).collect();

    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(assessors.len());
    for mut assessor in assessors {
        if !seen.insert(assessor.id.clone()) {
            log::warn!("dropping duplicate assessor record `{}`", assessor.id);
            continue;
        }

        assessor.programs.retain(|name| {
            let ok = known.contains(name.as_str());
            if !ok {
                log::warn!(
                    "assessor `{}` references unknown program `{}`, removing",
                    assessor.id,
                    name
                );
            }
            ok
        });

        for &month in calendar.months.keys() {
            if !assessor.monthly_capacity.contains_key(&month) {
                log::warn!(
                    "assessor `{}` has no declared capacity for month {}, using 0",
                    assessor.id,
                    month
                );
            }
        }

        kept.push(assessor);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Capability;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_assessor(id: &str) -> Assessor {
        Assessor::new(id)
            .with_capability(Capability::Curious)
            .with_program("Curious")
            .with_uniform_capacity(10)
    }

    #[test]
    fn test_valid_input_passes() {
        let assessors = vec![sample_assessor("Ines"), sample_assessor("Bram")];
        let programs = vec![Program::curious("Curious")];
        assert!(validate_input(&assessors, &programs).is_ok());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let assessors = vec![sample_assessor("Ines"), sample_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        assert_eq!(
            validate_input(&assessors, &programs),
            Err(ValidationError::DuplicateId("Ines".into()))
        );
    }

    #[test]
    fn test_unknown_program_rejected() {
        let assessors = vec![sample_assessor("Ines").with_program("Ghost")];
        let programs = vec![Program::curious("Curious")];
        assert!(matches!(
            validate_input(&assessors, &programs),
            Err(ValidationError::UnknownProgram { .. })
        ));
    }

    #[test]
    fn test_no_capabilities_rejected() {
        let assessors = vec![Assessor::new("Empty")];
        let programs = vec![Program::curious("Curious")];
        assert_eq!(
            validate_input(&assessors, &programs),
            Err(ValidationError::NoCapabilities("Empty".into()))
        );
    }

    #[test]
    fn test_roleless_program_rejected() {
        let programs = vec![Program::new("Hollow", Vec::new(), 3)];
        assert_eq!(
            validate_input(&[], &programs),
            Err(ValidationError::EmptyProgram("Hollow".into()))
        );
    }

    #[test]
    fn test_duplicate_program_rejected() {
        let programs = vec![Program::curious("Curious"), Program::curious("Curious")];
        assert_eq!(
            validate_input(&[], &programs),
            Err(ValidationError::DuplicateProgram("Curious".into()))
        );
    }

    #[test]
    fn test_sanitize_drops_duplicate_records() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let programs = vec![Program::curious("Curious")];
        let input = vec![
            sample_assessor("Ines").with_capacity(1, 7),
            sample_assessor("Ines"),
        ];

        let kept = sanitize_assessors(input, &programs, &calendar);
        assert_eq!(kept.len(), 1);
        // The first record wins
        assert_eq!(kept[0].capacity_for(1), 7);
    }

    #[test]
    fn test_sanitize_removes_unknown_program_refs() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let programs = vec![Program::curious("Curious")];
        let input = vec![sample_assessor("Ines").with_program("Ghost")];

        let kept = sanitize_assessors(input, &programs, &calendar);
        assert_eq!(kept[0].programs, vec!["Curious".to_string()]);
    }

    #[test]
    fn test_sanitize_keeps_assessor_without_capacity() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let programs = vec![Program::curious("Curious")];
        let mut assessor = sample_assessor("Ines");
        assessor.monthly_capacity.clear();

        let kept = sanitize_assessors(vec![assessor], &programs, &calendar);
        // Kept, with the missing month reading as zero capacity
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].capacity_for(1), 0);
    }
}
