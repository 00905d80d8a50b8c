//! Counters collected during a local-search run.

use std::time::Duration;

/// Aggregate metrics of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Iterations completed.
    pub iterations: u64,
    /// Simulator evaluations, including the initial and final ones.
    pub evaluations: u64,
    /// Candidates that became the current solution.
    pub accepted: u64,
    /// Times the best makespan strictly improved.
    pub improvements: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl SearchStatistics {
    /// Counts a completed iteration.
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    /// Counts a simulator evaluation.
    #[inline]
    pub fn on_evaluation(&mut self) {
        self.evaluations = self.evaluations.saturating_add(1);
    }

    /// Counts an accepted candidate.
    #[inline]
    pub fn on_accepted(&mut self) {
        self.accepted = self.accepted.saturating_add(1);
    }

    /// Counts a new best makespan.
    #[inline]
    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    /// Iterations whose candidate was not taken.
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.iterations.saturating_sub(self.accepted)
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "   Iterations:    {}", self.iterations)?;
        writeln!(f, "   Evaluations:   {}", self.evaluations)?;
        writeln!(f, "   Accepted:      {}", self.accepted)?;
        writeln!(f, "   Rejected:      {}", self.rejected())?;
        writeln!(f, "   Improvements:  {}", self.improvements)?;
        writeln!(f, "   Elapsed:       {:?}", self.elapsed)?;
        Ok(())
    }
}
