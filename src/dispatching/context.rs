//! Dispatch context: the live state a rule may look at.

use crate::models::{Instance, Operation, Time};

/// Read-only view of the simulator passed to dispatching rules.
///
/// Pairs the instance with the per-job cursors (index of each job's next
/// unscheduled operation).
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    instance: &'a Instance,
    cursors: &'a [usize],
}

impl<'a> DispatchContext<'a> {
    /// Creates a context from an instance and its job cursors.
    pub fn new(instance: &'a Instance, cursors: &'a [usize]) -> Self {
        Self { instance, cursors }
    }

    /// The instance being scheduled.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Cursor of a job (0 for unknown jobs).
    pub fn cursor(&self, job: usize) -> usize {
        self.cursors.get(job).copied().unwrap_or(0)
    }

    /// Next unscheduled operation of a job, `None` once complete.
    pub fn next_operation(&self, job: usize) -> Option<&'a Operation> {
        self.instance.operation(job, self.cursor(job))
    }

    /// Jobs that still have work, in index order, with their next operation.
    pub fn pending(&self) -> impl Iterator<Item = (usize, &'a Operation)> + '_ {
        (0..self.instance.job_count()).filter_map(move |j| self.next_operation(j).map(|op| (j, op)))
    }

    /// Remaining work of a job from its cursor on (sum of minimum durations).
    pub fn work_remaining(&self, job: usize) -> Time {
        self.instance.remaining_work().at(job, self.cursor(job))
    }

    /// Whether every job is complete.
    pub fn is_finished(&self) -> bool {
        self.pending().next().is_none()
    }
}
