//! Encoded solution: operation sequence plus machine assignment.
//!
//! # Encoding
//!
//! - **Operation sequence**: a permutation of the job-id multiset. The k-th
//!   occurrence of job J stands for J's k-th operation.
//! - **Machine assignment**: per job, the chosen machine for each of its
//!   operations, in operation order.
//!
//! Every permutation of the multiset decodes to a precedence-feasible
//! schedule, so search moves never need repair.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use rand::Rng;
use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{Instance, Schedule};

/// A point in the search space of the metaheuristics.
///
/// Plain value type: clones are deep, so retained current/best solutions
/// never share storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedSolution {
    /// Job ids in processing priority order, one entry per operation.
    pub operation_sequence: Vec<usize>,
    /// `machine_assignment[job][k]` = machine chosen for operation k of job.
    pub machine_assignment: Vec<Vec<usize>>,
}

impl EncodedSolution {
    /// Creates a solution from its two parts.
    pub fn new(operation_sequence: Vec<usize>, machine_assignment: Vec<Vec<usize>>) -> Self {
        Self {
            operation_sequence,
            machine_assignment,
        }
    }

    /// Creates a random solution: shuffled sequence, uniform random machines.
    pub fn random<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let mut operation_sequence: Vec<usize> = instance
            .jobs()
            .iter()
            .flat_map(|job| std::iter::repeat(job.id).take(job.operation_count()))
            .collect();
        operation_sequence.shuffle(rng);

        let machine_assignment = instance
            .jobs()
            .iter()
            .map(|job| {
                job.operations
                    .iter()
                    .map(|op| op.alternatives.choose(rng).map_or(0, |alt| alt.machine))
                    .collect()
            })
            .collect();

        Self {
            operation_sequence,
            machine_assignment,
        }
    }

    /// Reads the encoding back out of a complete schedule.
    ///
    /// The sequence follows commit order, so simulating the result
    /// reproduces a schedule with the same makespan.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidSolution`] if the schedule does not cover
    /// every operation exactly once.
    pub fn from_schedule(schedule: &Schedule, instance: &Instance) -> Result<Self> {
        let operation_sequence: Vec<usize> = schedule.assignments.iter().map(|a| a.job).collect();
        let mut machine_assignment: Vec<Vec<usize>> = instance
            .jobs()
            .iter()
            .map(|job| vec![usize::MAX; job.operation_count()])
            .collect();
        for a in &schedule.assignments {
            let slot = machine_assignment
                .get_mut(a.job)
                .and_then(|row| row.get_mut(a.operation))
                .ok_or_else(|| {
                    ScheduleError::InvalidSolution(format!(
                        "schedule places unknown operation {} of job {}",
                        a.operation, a.job
                    ))
                })?;
            *slot = a.machine;
        }

        let solution = Self::new(operation_sequence, machine_assignment);
        solution.validate(instance)?;
        Ok(solution)
    }

    /// Number of entries in the operation sequence.
    pub fn len(&self) -> usize {
        self.operation_sequence.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.operation_sequence.is_empty()
    }

    /// Machine chosen for an operation.
    pub fn machine_for(&self, job: usize, operation: usize) -> Option<usize> {
        self.machine_assignment.get(job)?.get(operation).copied()
    }

    /// Decodes the sequence into (job, operation index) pairs.
    pub fn decode_sequence(&self) -> Vec<(usize, usize)> {
        let width = self
            .operation_sequence
            .iter()
            .copied()
            .max()
            .map_or(0, |m| m + 1);
        let mut counters = vec![0usize; width];
        self.operation_sequence
            .iter()
            .map(|&job| {
                let k = counters[job];
                counters[job] += 1;
                (job, k)
            })
            .collect()
    }

    /// Checks both encoding invariants against the instance.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidSolution`] for unknown job ids, a job
    ///   occurring more or fewer times than it has operations, or an
    ///   assignment table of the wrong shape.
    /// - [`ScheduleError::MissingAlternative`] if an assigned machine is not
    ///   among the operation's alternatives.
    pub fn validate(&self, instance: &Instance) -> Result<()> {
        let job_count = instance.job_count();
        if self.machine_assignment.len() != job_count {
            return Err(ScheduleError::InvalidSolution(format!(
                "machine assignment covers {} jobs, instance has {job_count}",
                self.machine_assignment.len()
            )));
        }

        let mut occurrences = vec![0usize; job_count];
        for &job in &self.operation_sequence {
            match occurrences.get_mut(job) {
                Some(count) => *count += 1,
                None => {
                    return Err(ScheduleError::InvalidSolution(format!(
                        "operation sequence names unknown job {job}"
                    )));
                }
            }
        }

        for (job, row) in instance.jobs().iter().zip(&self.machine_assignment) {
            let expected = job.operation_count();
            if occurrences[job.id] != expected {
                return Err(ScheduleError::InvalidSolution(format!(
                    "job {} occurs {} times in the sequence but has {expected} operations",
                    job.id, occurrences[job.id]
                )));
            }
            if row.len() != expected {
                return Err(ScheduleError::InvalidSolution(format!(
                    "job {} has {} assigned machines but {expected} operations",
                    job.id,
                    row.len()
                )));
            }
            for (k, (op, &machine)) in job.operations.iter().zip(row).enumerate() {
                if op.alternative_on(machine).is_none() {
                    return Err(ScheduleError::MissingAlternative {
                        job: job.id,
                        operation: k,
                        machine,
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self, instance: &Instance) -> bool {
        self.validate(instance).is_ok()
    }
}
