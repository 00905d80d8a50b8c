//! Schedule simulator.
//!
//! Owns the working copy of the shop: job cursors, job/machine availability
//! and the schedule built so far. Two modes share one commit step:
//!
//! - **Batch** ([`ShopSimulator::compute_makespan`]): resets the state and
//!   replays an encoded solution left to right. The k-th occurrence of job
//!   J in the operation sequence schedules J's k-th operation on the machine
//!   the assignment table chose for it.
//! - **Incremental** ([`ShopSimulator::schedule_next`]): commits one
//!   already-resolved (job, alternative) pair, as used by the dispatching
//!   rules.
//!
//! In both modes an operation starts at
//! `max(machine available, job available)` and runs for the chosen
//! alternative's duration.
//!
//! # Complexity
//! Batch replay is O(total operations) after an O(total operations)
//! validation pass.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use crate::dispatching::DispatchContext;
use crate::encoding::EncodedSolution;
use crate::error::{Result, ScheduleError};
use crate::models::{Alternative, Assignment, Booking, Instance, Schedule, Time};

/// Re-simulatable working state for one instance.
///
/// Not shareable across concurrent runs: every simulation resets and
/// rewrites the per-job and per-machine state.
///
/// # Example
/// ```
/// use u_fjsp::encoding::EncodedSolution;
/// use u_fjsp::models::{Instance, Job, Operation};
/// use u_fjsp::scheduler::ShopSimulator;
///
/// let instance = Instance::new(
///     1,
///     vec![
///         Job::new(0).with_operation(Operation::single(0, 3)),
///         Job::new(1).with_operation(Operation::single(0, 5)),
///     ],
/// )
/// .unwrap();
/// let mut sim = ShopSimulator::new(&instance);
///
/// let solution = EncodedSolution::new(vec![1, 0], vec![vec![0], vec![0]]);
/// assert_eq!(sim.compute_makespan(&solution).unwrap(), 8);
/// assert_eq!(sim.schedule().assignment_for(0, 0).unwrap().start, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ShopSimulator {
    instance: Instance,
    next_operation: Vec<usize>,
    job_ready: Vec<Time>,
    timings: Vec<Vec<Option<Assignment>>>,
    schedule: Schedule,
}

impl ShopSimulator {
    /// Creates a simulator with its own copy of the instance.
    pub fn new(instance: &Instance) -> Self {
        let instance = instance.clone();
        let job_count = instance.job_count();
        let timings = instance
            .jobs()
            .iter()
            .map(|j| vec![None; j.operation_count()])
            .collect();
        let schedule = Schedule::with_machines(instance.machine_count());
        Self {
            instance,
            next_operation: vec![0; job_count],
            job_ready: vec![0; job_count],
            timings,
            schedule,
        }
    }

    /// The instance being simulated.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Clears cursors, timings, machine timelines and the makespan.
    pub fn reset(&mut self) {
        self.next_operation.iter_mut().for_each(|c| *c = 0);
        self.job_ready.iter_mut().for_each(|t| *t = 0);
        for row in &mut self.timings {
            row.iter_mut().for_each(|t| *t = None);
        }
        self.schedule.assignments.clear();
        self.schedule.machines.iter_mut().for_each(Vec::clear);
        self.schedule.makespan = 0;
    }

    /// Makespan of the most recent simulation.
    pub fn makespan(&self) -> Time {
        self.schedule.makespan
    }

    /// The schedule built so far.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Placement of one operation, if it has been scheduled.
    pub fn operation_timing(&self, job: usize, operation: usize) -> Option<&Assignment> {
        self.timings
            .get(job)
            .and_then(|row| row.get(operation))
            .and_then(Option::as_ref)
    }

    /// Index of the job's next unscheduled operation, `None` once complete.
    pub fn next_operation(&self, job: usize) -> Option<usize> {
        let cursor = *self.next_operation.get(job)?;
        let len = self.instance.job(job)?.operation_count();
        (cursor < len).then_some(cursor)
    }

    /// Whether every operation of the job has been scheduled.
    pub fn is_complete(&self, job: usize) -> bool {
        self.next_operation(job).is_none()
    }

    /// Whether every job is complete.
    pub fn all_complete(&self) -> bool {
        (0..self.instance.job_count()).all(|j| self.is_complete(j))
    }

    /// Time at which the machine's last booking ends (0 if idle).
    pub fn machine_available(&self, machine: usize) -> Time {
        self.schedule
            .machine_timeline(machine)
            .last()
            .map(|b| b.end)
            .unwrap_or(0)
    }

    /// Time at which the job's last committed operation ends.
    pub fn job_available(&self, job: usize) -> Time {
        self.job_ready.get(job).copied().unwrap_or(0)
    }

    /// Read-only view handed to dispatching rules.
    pub fn dispatch_context(&self) -> DispatchContext<'_> {
        DispatchContext::new(&self.instance, &self.next_operation)
    }

    /// Incremental mode: commits the job's next operation on `alternative`.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidSolution`] for an unknown job.
    /// - [`ScheduleError::JobComplete`] if the job has nothing left.
    /// - [`ScheduleError::MissingAlternative`] if `alternative` is not one
    ///   of the operation's alternatives.
    pub fn schedule_next(&mut self, job: usize, alternative: Alternative) -> Result<Assignment> {
        if job >= self.instance.job_count() {
            return Err(ScheduleError::InvalidSolution(format!("unknown job {job}")));
        }
        let operation = self
            .next_operation(job)
            .ok_or(ScheduleError::JobComplete { job })?;
        let known = self
            .instance
            .operation(job, operation)
            .is_some_and(|op| op.alternatives.contains(&alternative));
        if !known {
            return Err(ScheduleError::MissingAlternative {
                job,
                operation,
                machine: alternative.machine,
            });
        }
        Ok(self.commit(job, operation, alternative))
    }

    /// Batch mode: resets the state and replays an encoded solution.
    ///
    /// Returns the makespan, which also stays available through
    /// [`makespan`](Self::makespan) and [`schedule`](Self::schedule).
    ///
    /// # Errors
    /// [`ScheduleError::InvalidSolution`] or
    /// [`ScheduleError::MissingAlternative`] if the solution does not fit
    /// the instance. The state is left reset in that case.
    pub fn compute_makespan(&mut self, solution: &EncodedSolution) -> Result<Time> {
        self.reset();
        solution.validate(&self.instance)?;

        for &job in &solution.operation_sequence {
            let operation = self.next_operation[job];
            let machine = solution.machine_assignment[job][operation];
            let alternative = self
                .instance
                .operation(job, operation)
                .and_then(|op| op.alternative_on(machine))
                .copied()
                .ok_or(ScheduleError::MissingAlternative {
                    job,
                    operation,
                    machine,
                })?;
            self.commit(job, operation, alternative);
        }

        Ok(self.schedule.makespan)
    }

    fn commit(&mut self, job: usize, operation: usize, alternative: Alternative) -> Assignment {
        let machine = alternative.machine;
        let start = self.machine_available(machine).max(self.job_ready[job]);
        let end = start + alternative.duration;
        let assignment = Assignment::new(job, operation, machine, start, end);

        self.schedule.machines[machine].push(Booking {
            job,
            operation,
            start,
            end,
        });
        self.schedule.assignments.push(assignment);
        self.schedule.makespan = self.schedule.makespan.max(end);
        self.job_ready[job] = end;
        self.timings[job][operation] = Some(assignment);
        self.next_operation[job] += 1;
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation};

    fn two_jobs_one_machine() -> Instance {
        Instance::new(
            1,
            vec![
                Job::new(0).with_operation(Operation::single(0, 3)),
                Job::new(1).with_operation(Operation::single(0, 5)),
            ],
        )
        .unwrap()
    }

    fn chain_instance() -> Instance {
        Instance::new(
            3,
            vec![Job::new(0)
                .with_operation(Operation::single(0, 2))
                .with_operation(Operation::single(1, 4))
                .with_operation(Operation::single(2, 1))],
        )
        .unwrap()
    }

    fn flexible_instance() -> Instance {
        Instance::new(
            2,
            vec![
                Job::new(0)
                    .with_operation(Operation::new().with_alternative(0, 3).with_alternative(1, 5))
                    .with_operation(Operation::single(1, 2)),
                Job::new(1)
                    .with_operation(Operation::new().with_alternative(0, 4).with_alternative(1, 1)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_serialized_single_machine() {
        let mut sim = ShopSimulator::new(&two_jobs_one_machine());

        let first = EncodedSolution::new(vec![0, 1], vec![vec![0], vec![0]]);
        assert_eq!(sim.compute_makespan(&first).unwrap(), 8);
        assert_eq!(sim.operation_timing(0, 0).map(|a| (a.start, a.end)), Some((0, 3)));
        assert_eq!(sim.operation_timing(1, 0).map(|a| (a.start, a.end)), Some((3, 8)));

        let second = EncodedSolution::new(vec![1, 0], vec![vec![0], vec![0]]);
        assert_eq!(sim.compute_makespan(&second).unwrap(), 8);
        assert_eq!(sim.operation_timing(1, 0).map(|a| (a.start, a.end)), Some((0, 5)));
        assert_eq!(sim.operation_timing(0, 0).map(|a| (a.start, a.end)), Some((5, 8)));
    }

    #[test]
    fn test_chain_without_choice() {
        let mut sim = ShopSimulator::new(&chain_instance());
        let sol = EncodedSolution::new(vec![0, 0, 0], vec![vec![0, 1, 2]]);
        assert_eq!(sim.compute_makespan(&sol).unwrap(), 7);
        let times: Vec<(Time, Time)> = (0..3)
            .map(|k| {
                let a = sim.operation_timing(0, k).unwrap();
                (a.start, a.end)
            })
            .collect();
        assert_eq!(times, vec![(0, 2), (2, 6), (6, 7)]);
        assert_eq!(sim.makespan(), 7);
    }

    #[test]
    fn test_machine_choice_changes_makespan() {
        let mut sim = ShopSimulator::new(&flexible_instance());
        // job0 op0 on m0 (0-3), job1 on m1 (0-1), job0 op1 on m1 (3-5)
        let fast = EncodedSolution::new(vec![0, 1, 0], vec![vec![0, 1], vec![1]]);
        assert_eq!(sim.compute_makespan(&fast).unwrap(), 5);
        // job1 on m0 first (0-4), job0 op0 waits on m0 (4-7), op1 on m1 (7-9)
        let slow = EncodedSolution::new(vec![1, 0, 0], vec![vec![0, 1], vec![0]]);
        assert_eq!(sim.compute_makespan(&slow).unwrap(), 9);
        assert!(sim.schedule().verify(sim.instance()).is_empty());
    }

    #[test]
    fn test_compute_makespan_is_repeatable() {
        let mut sim = ShopSimulator::new(&flexible_instance());
        let sol = EncodedSolution::new(vec![1, 0, 0], vec![vec![1, 1], vec![0]]);
        let a = sim.compute_makespan(&sol).unwrap();
        let first = sim.schedule().clone();
        sim.reset();
        let b = sim.compute_makespan(&sol).unwrap();
        assert_eq!(a, b);
        assert_eq!(&first, sim.schedule());
    }

    #[test]
    fn test_missing_alternative() {
        let mut sim = ShopSimulator::new(&two_jobs_one_machine());
        let inst = Instance::new(
            2,
            vec![Job::new(0).with_operation(Operation::single(0, 1))],
        )
        .unwrap();
        let mut sim2 = ShopSimulator::new(&inst);
        let bad = EncodedSolution::new(vec![0], vec![vec![1]]);
        assert!(matches!(
            sim2.compute_makespan(&bad),
            Err(ScheduleError::MissingAlternative { job: 0, operation: 0, machine: 1 })
        ));
        assert_eq!(sim2.makespan(), 0);

        let wrong_count = EncodedSolution::new(vec![0, 0, 1], vec![vec![0], vec![0]]);
        assert!(matches!(
            sim.compute_makespan(&wrong_count),
            Err(ScheduleError::InvalidSolution(_))
        ));
    }

    #[test]
    fn test_incremental_respects_job_and_machine() {
        let mut sim = ShopSimulator::new(&flexible_instance());
        let a = sim.schedule_next(1, Alternative::new(1, 1)).unwrap();
        assert_eq!((a.start, a.end), (0, 1));
        let b = sim.schedule_next(0, Alternative::new(1, 5)).unwrap();
        assert_eq!((b.start, b.end), (1, 6)); // waits for machine 1
        let c = sim.schedule_next(0, Alternative::new(1, 2)).unwrap();
        assert_eq!((c.start, c.end), (6, 8)); // waits for its own predecessor
        assert!(sim.all_complete());
        assert_eq!(sim.makespan(), 8);
        assert!(sim.schedule().verify(sim.instance()).is_empty());
    }

    #[test]
    fn test_incremental_waits_for_job_predecessor() {
        let mut sim = ShopSimulator::new(&chain_instance());
        sim.schedule_next(0, Alternative::new(0, 2)).unwrap();
        let second = sim.schedule_next(0, Alternative::new(1, 4)).unwrap();
        // machine 1 is idle, but the job is busy until 2
        assert_eq!(second.start, 2);
    }

    #[test]
    fn test_incremental_errors() {
        let mut sim = ShopSimulator::new(&two_jobs_one_machine());
        assert!(matches!(
            sim.schedule_next(0, Alternative::new(0, 9)),
            Err(ScheduleError::MissingAlternative { .. })
        ));
        sim.schedule_next(0, Alternative::new(0, 3)).unwrap();
        assert!(matches!(
            sim.schedule_next(0, Alternative::new(0, 3)),
            Err(ScheduleError::JobComplete { job: 0 })
        ));
        assert!(matches!(
            sim.schedule_next(4, Alternative::new(0, 3)),
            Err(ScheduleError::InvalidSolution(_))
        ));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut sim = ShopSimulator::new(&chain_instance());
        sim.schedule_next(0, Alternative::new(0, 2)).unwrap();
        sim.reset();
        assert_eq!(sim.makespan(), 0);
        assert!(sim.schedule().is_empty());
        assert_eq!(sim.next_operation(0), Some(0));
        assert!(sim.operation_timing(0, 0).is_none());
        assert_eq!(sim.machine_available(0), 0);
    }

    #[test]
    fn test_job_without_operations_is_noop() {
        let inst = Instance::new(
            2,
            vec![Job::new(0), Job::new(1).with_operation(Operation::single(1, 4))],
        )
        .unwrap();
        let mut sim = ShopSimulator::new(&inst);
        assert!(sim.is_complete(0));
        let sol = EncodedSolution::new(vec![1], vec![vec![], vec![1]]);
        assert_eq!(sim.compute_makespan(&sol).unwrap(), 4);
        assert!(sim.schedule().machine_timeline(0).is_empty());
    }
}
