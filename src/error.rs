//! Error types.
//!
//! Only two conditions are raised by the scheduling core itself:
//! [`ScheduleError::InvalidSolution`] and [`ScheduleError::MissingAlternative`].
//! Both indicate a corrupted or hand-built encoded solution and abort the
//! current run. The remaining variants belong to the loader, instance
//! construction and configuration validation.

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors produced by instance construction, simulation and search.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The instance failed structural validation.
    #[error("invalid instance: {}", join_messages(.errors))]
    InvalidInstance {
        /// Every problem detected, in discovery order.
        errors: Vec<ValidationError>,
    },

    /// The encoded solution does not match the instance shape.
    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    /// The machine assignment names a machine the operation cannot run on.
    #[error("job {job} operation {operation} has no alternative on machine {machine}")]
    MissingAlternative {
        /// Job index.
        job: usize,
        /// Operation index within the job.
        operation: usize,
        /// Requested machine.
        machine: usize,
    },

    /// The incremental scheduler was asked to advance a finished job.
    #[error("job {job} has no operation left to schedule")]
    JobComplete {
        /// Job index.
        job: usize,
    },

    /// A search or solver configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The textual instance could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// Reading an instance file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidInstance { errors }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
