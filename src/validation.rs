//! Input validation for flexible job-shop instances.
//!
//! Checks structural integrity of jobs, operations and alternatives
//! before anything is scheduled. Detects:
//! - Empty instances (no machines, no jobs)
//! - Job ids that do not match their position
//! - Operations without alternatives
//! - Non-positive durations
//! - Machine references outside `0..machine_count`
//!
//! Jobs without operations are accepted; they contribute nothing to the
//! makespan.

use serde::{Deserialize, Serialize};

use crate::models::Job;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The instance declares zero machines.
    NoMachines,
    /// The instance has no jobs.
    NoJobs,
    /// A job's id differs from its position.
    JobIdMismatch,
    /// An operation lists no alternatives.
    EmptyAlternatives,
    /// An alternative has a zero or negative duration.
    NonPositiveDuration,
    /// An alternative references a machine that doesn't exist.
    UnknownMachine,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the jobs of an instance against its machine count.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(machine_count: usize, jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    if machine_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "Instance declares no machines",
        ));
    }
    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoJobs,
            "Instance has no jobs",
        ));
    }

    for (position, job) in jobs.iter().enumerate() {
        if job.id != position {
            errors.push(ValidationError::new(
                ValidationErrorKind::JobIdMismatch,
                format!("Job at position {position} has id {}", job.id),
            ));
        }

        for (op_index, op) in job.operations.iter().enumerate() {
            if op.alternatives.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyAlternatives,
                    format!("Job {} operation {op_index} has no alternatives", job.id),
                ));
            }

            for alt in &op.alternatives {
                if alt.duration <= 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NonPositiveDuration,
                        format!(
                            "Job {} operation {op_index} has duration {} on machine {}",
                            job.id, alt.duration, alt.machine
                        ),
                    ));
                }
                if alt.machine >= machine_count {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownMachine,
                        format!(
                            "Job {} operation {op_index} references unknown machine {}",
                            job.id, alt.machine
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new(0)
                .with_operation(Operation::single(0, 3))
                .with_operation(Operation::new().with_alternative(0, 4).with_alternative(1, 2)),
            Job::new(1).with_operation(Operation::single(1, 5)),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_instance(2, &sample_jobs()).is_ok());
    }

    #[test]
    fn test_no_machines_and_no_jobs() {
        let errors = validate_instance(0, &[]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoMachines));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoJobs));
    }

    #[test]
    fn test_job_id_mismatch() {
        let jobs = vec![Job::new(1).with_operation(Operation::single(0, 1))];
        let errors = validate_instance(1, &jobs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::JobIdMismatch);
    }

    #[test]
    fn test_empty_alternatives() {
        let jobs = vec![Job::new(0).with_operation(Operation::new())];
        let errors = validate_instance(1, &jobs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyAlternatives);
    }

    #[test]
    fn test_non_positive_duration() {
        let jobs = vec![Job::new(0)
            .with_operation(Operation::single(0, 0))
            .with_operation(Operation::single(0, -2))];
        let errors = validate_instance(1, &jobs).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonPositiveDuration));
    }

    #[test]
    fn test_unknown_machine() {
        let jobs = vec![Job::new(0).with_operation(Operation::single(2, 5))];
        let errors = validate_instance(2, &jobs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownMachine);
        assert!(errors[0].message.contains("machine 2"));
    }

    #[test]
    fn test_job_without_operations_allowed() {
        let jobs = vec![Job::new(0), Job::new(1).with_operation(Operation::single(0, 1))];
        assert!(validate_instance(1, &jobs).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let jobs = vec![
            Job::new(3).with_operation(Operation::new()),
            Job::new(1).with_operation(Operation::single(9, 0)),
        ];
        let errors = validate_instance(1, &jobs).unwrap_err();
        // id mismatch, empty alternatives, non-positive duration, unknown machine
        assert_eq!(errors.len(), 4);
    }
}
