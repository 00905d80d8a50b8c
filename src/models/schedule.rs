//! Schedule (solution) model.
//!
//! A schedule is the outcome of one simulator pass: every operation placed
//! on one machine for one time interval, the per-machine timelines, and the
//! resulting makespan. It is recomputed from scratch by each pass and never
//! patched in place.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::{Instance, Time};

/// A committed (operation, machine, interval) placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub operation: usize,
    /// Machine the operation runs on.
    pub machine: usize,
    /// Start time.
    pub start: Time,
    /// End time (exclusive).
    pub end: Time,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(job: usize, operation: usize, machine: usize, start: Time, end: Time) -> Self {
        Self {
            job,
            operation,
            machine,
            start,
            end,
        }
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    /// Whether two half-open intervals `[start, end)` intersect.
    #[inline]
    pub fn overlaps(&self, other: &Assignment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An entry of a machine timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub operation: usize,
    /// Start time.
    pub start: Time,
    /// End time (exclusive).
    pub end: Time,
}

/// A complete schedule produced by the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in commit order.
    pub assignments: Vec<Assignment>,
    /// Per-machine bookings, ordered by start time.
    pub machines: Vec<Vec<Booking>>,
    /// Latest end time over all machines.
    pub makespan: Time,
}

/// A broken schedule invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// An operation started before its job predecessor finished.
    PrecedenceViolation,
    /// Two bookings on one machine overlap.
    MachineOverlap,
    /// The machine/duration pair is not one of the operation's alternatives.
    InvalidAlternative,
    /// An operation of the instance was never scheduled.
    Unscheduled,
}

impl Violation {
    fn new(violation_type: ViolationType, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule with `machine_count` empty timelines.
    pub fn with_machines(machine_count: usize) -> Self {
        Self {
            assignments: Vec::new(),
            machines: vec![Vec::new(); machine_count],
            makespan: 0,
        }
    }

    /// Makespan: latest end time across all machines.
    pub fn makespan(&self) -> Time {
        self.makespan
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing has been scheduled.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finds the assignment of a given operation.
    pub fn assignment_for(&self, job: usize, operation: usize) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.job == job && a.operation == operation)
    }

    /// All assignments of a job, in operation order.
    pub fn assignments_for_job(&self, job: usize) -> Vec<&Assignment> {
        let mut found: Vec<&Assignment> = self.assignments.iter().filter(|a| a.job == job).collect();
        found.sort_by_key(|a| a.operation);
        found
    }

    /// Timeline of a machine (empty slice for unknown machines).
    pub fn machine_timeline(&self, machine: usize) -> &[Booking] {
        self.machines.get(machine).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total processing time booked on a machine.
    pub fn machine_load(&self, machine: usize) -> Time {
        self.machine_timeline(machine)
            .iter()
            .map(|b| b.end - b.start)
            .sum()
    }

    /// Machine utilization: load / makespan.
    ///
    /// Returns `None` if the makespan is zero.
    pub fn machine_utilization(&self, machine: usize) -> Option<f64> {
        if self.makespan <= 0 {
            return None;
        }
        Some(self.machine_load(machine) as f64 / self.makespan as f64)
    }

    /// Completion time of a job (end of its latest assignment).
    pub fn job_completion_time(&self, job: usize) -> Option<Time> {
        self.assignments
            .iter()
            .filter(|a| a.job == job)
            .map(|a| a.end)
            .max()
    }

    /// Checks the schedule against the instance.
    ///
    /// Reports precedence breaks inside jobs, overlapping bookings on a
    /// machine, placements that match none of the operation's alternatives,
    /// and operations that were never scheduled. An empty result means the
    /// schedule is feasible.
    pub fn verify(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();

        for job in instance.jobs() {
            let placed = self.assignments_for_job(job.id);
            for (op_index, op) in job.operations.iter().enumerate() {
                let Some(a) = placed.iter().find(|a| a.operation == op_index) else {
                    violations.push(Violation::new(
                        ViolationType::Unscheduled,
                        format!("Job {} operation {op_index} was not scheduled", job.id),
                    ));
                    continue;
                };
                let matches = op
                    .alternatives
                    .iter()
                    .any(|alt| alt.machine == a.machine && alt.duration == a.duration());
                if !matches {
                    violations.push(Violation::new(
                        ViolationType::InvalidAlternative,
                        format!(
                            "Job {} operation {op_index} ran on machine {} for {}",
                            job.id,
                            a.machine,
                            a.duration()
                        ),
                    ));
                }
            }
            for pair in placed.windows(2) {
                if pair[0].end > pair[1].start {
                    violations.push(Violation::new(
                        ViolationType::PrecedenceViolation,
                        format!(
                            "Job {} operation {} starts at {} before operation {} ends at {}",
                            job.id, pair[1].operation, pair[1].start, pair[0].operation, pair[0].end
                        ),
                    ));
                }
            }
        }

        for machine in 0..self.machines.len() {
            let mut on_machine: Vec<&Assignment> = self
                .assignments
                .iter()
                .filter(|a| a.machine == machine)
                .collect();
            on_machine.sort_by_key(|a| a.start);
            for pair in on_machine.windows(2) {
                if pair[0].overlaps(pair[1]) {
                    violations.push(Violation::new(
                        ViolationType::MachineOverlap,
                        format!(
                            "Machine {machine}: job {} [{}, {}) overlaps job {} [{}, {})",
                            pair[0].job, pair[0].start, pair[0].end, pair[1].job, pair[1].start, pair[1].end
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Text report: per-machine timelines, then per-job placements.
impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Makespan: {}", self.makespan)?;
        for (machine, bookings) in self.machines.iter().enumerate() {
            write!(f, "Machine {machine}:")?;
            for b in bookings {
                write!(f, " J{}[{}, {})", b.job, b.start, b.end)?;
            }
            writeln!(f)?;
        }
        let jobs = self.assignments.iter().map(|a| a.job + 1).max().unwrap_or(0);
        for job in 0..jobs {
            write!(f, "Job {job}:")?;
            for a in self.assignments_for_job(job) {
                write!(f, " O{}@M{}[{}, {})", a.operation, a.machine, a.start, a.end)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
