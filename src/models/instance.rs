//! Instance model: jobs, operations and machine alternatives.
//!
//! A flexible job-shop instance consists of jobs, each an ordered chain of
//! operations. Every operation lists one or more alternatives: a machine
//! it may run on together with the processing time on that machine.
//!
//! The instance is immutable once built. Construction validates it and
//! derives the remaining-work table used by the MWR/LWR dispatching rules.
//!
//! # Reference
//! Brucker & Schlie (1990), "Job-shop scheduling with multi-purpose machines"

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::validation::validate_instance;

/// Integral time unit used throughout the crate.
pub type Time = i64;

/// A (machine, duration) option for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alternative {
    /// Machine index (`0..machine_count`).
    pub machine: usize,
    /// Processing time on that machine (> 0).
    pub duration: Time,
}

impl Alternative {
    /// Creates an alternative.
    pub fn new(machine: usize, duration: Time) -> Self {
        Self { machine, duration }
    }
}

/// One step of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Machines this operation can run on, with their durations.
    pub alternatives: Vec<Alternative>,
}

impl Operation {
    /// Creates an operation with no alternatives yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an operation that can only run on one machine.
    pub fn single(machine: usize, duration: Time) -> Self {
        Self::new().with_alternative(machine, duration)
    }

    /// Adds an alternative.
    pub fn with_alternative(mut self, machine: usize, duration: Time) -> Self {
        self.alternatives.push(Alternative::new(machine, duration));
        self
    }

    /// First alternative on `machine`, if any.
    pub fn alternative_on(&self, machine: usize) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.machine == machine)
    }

    /// Alternative with the smallest duration (first one on ties).
    pub fn shortest(&self) -> Option<&Alternative> {
        self.alternatives
            .iter()
            .fold(None, |best: Option<&Alternative>, alt| match best {
                Some(b) if b.duration <= alt.duration => Some(b),
                _ => Some(alt),
            })
    }

    /// Smallest duration across the alternatives (0 if there are none).
    pub fn min_duration(&self) -> Time {
        self.shortest().map(|a| a.duration).unwrap_or(0)
    }

    /// Whether more than one alternative exists.
    pub fn is_flexible(&self) -> bool {
        self.alternatives.len() > 1
    }
}

/// A job: an ordered chain of operations.
///
/// Operation `k + 1` cannot start before operation `k` has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier. Equal to the job's position in the instance.
    pub id: usize,
    /// Operations in precedence order.
    pub operations: Vec<Operation>,
}

impl Job {
    /// Creates a job with no operations.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            operations: Vec::new(),
        }
    }

    /// Appends an operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Whether the job has any operations.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Sum of the minimum durations of all operations.
    pub fn min_total_duration(&self) -> Time {
        self.operations.iter().map(Operation::min_duration).sum()
    }
}

/// Per-job suffix sums of minimum operation durations.
///
/// `at(job, k)` is the work left in `job` once its first `k` operations are
/// done, counting each remaining operation at its fastest alternative.
/// `at(job, len) == 0` and values never decrease as `k` decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingWork {
    table: Vec<Vec<Time>>,
}

impl RemainingWork {
    /// Builds the table for a set of jobs.
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let table = jobs
            .iter()
            .map(|job| {
                let mut suffix = vec![0; job.operations.len() + 1];
                for (k, op) in job.operations.iter().enumerate().rev() {
                    suffix[k] = suffix[k + 1] + op.min_duration();
                }
                suffix
            })
            .collect();
        Self { table }
    }

    /// Remaining work of `job` with `next_operation` as its cursor.
    ///
    /// Out-of-range arguments yield 0.
    pub fn at(&self, job: usize, next_operation: usize) -> Time {
        self.table
            .get(job)
            .and_then(|row| row.get(next_operation))
            .copied()
            .unwrap_or(0)
    }

    /// Full suffix-sum row of a job.
    pub fn row(&self, job: usize) -> &[Time] {
        self.table.get(job).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Serialized form of an [`Instance`]; validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    /// Number of machines.
    pub machine_count: usize,
    /// Jobs in id order.
    pub jobs: Vec<Job>,
}

/// An immutable, validated flexible job-shop instance.
///
/// # Example
/// ```
/// use u_fjsp::models::{Instance, Job, Operation};
///
/// let instance = Instance::new(
///     2,
///     vec![
///         Job::new(0)
///             .with_operation(Operation::single(0, 3))
///             .with_operation(Operation::new().with_alternative(0, 4).with_alternative(1, 2)),
///         Job::new(1).with_operation(Operation::single(1, 5)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(instance.total_operations(), 3);
/// assert_eq!(instance.remaining_work().at(0, 0), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    machine_count: usize,
    jobs: Vec<Job>,
    remaining_work: RemainingWork,
}

impl Instance {
    /// Validates the jobs and builds the instance.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidInstance`] listing every detected problem.
    pub fn new(machine_count: usize, jobs: Vec<Job>) -> Result<Self> {
        validate_instance(machine_count, &jobs)?;
        let remaining_work = RemainingWork::from_jobs(&jobs);
        Ok(Self {
            machine_count,
            jobs,
            remaining_work,
        })
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machine_count
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// All jobs in id order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// A job by id.
    pub fn job(&self, id: usize) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// An operation by (job, index).
    pub fn operation(&self, job: usize, operation: usize) -> Option<&Operation> {
        self.jobs.get(job).and_then(|j| j.operations.get(operation))
    }

    /// Total number of operations across all jobs.
    pub fn total_operations(&self) -> usize {
        self.jobs.iter().map(Job::operation_count).sum()
    }

    /// The derived remaining-work table.
    pub fn remaining_work(&self) -> &RemainingWork {
        &self.remaining_work
    }
}

impl TryFrom<InstanceData> for Instance {
    type Error = ScheduleError;

    fn try_from(data: InstanceData) -> Result<Self> {
        Self::new(data.machine_count, data.jobs)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        Self {
            machine_count: instance.machine_count,
            jobs: instance.jobs,
        }
    }
}
