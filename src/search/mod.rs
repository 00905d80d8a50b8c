//! Local-search metaheuristics over the encoded solution space.
//!
//! Every driver repeatedly draws neighbors with the shared
//! [`NeighborOperator`](crate::encoding::NeighborOperator), scores them
//! through the simulator's batch mode, and keeps the best solution seen.
//! On exit the best solution is simulated once more so the simulator holds
//! its schedule.
//!
//! | Driver | Acceptance | Stops when |
//! |--------|-----------|------------|
//! | [`SimulatedAnnealing`] | Metropolis | frozen or iteration cap |
//! | [`HillClimbing`] | strict improvement | budget of non-improving moves spent or iteration cap |
//! | [`TabuSearch`] | best admissible of a batch | no admissible neighbor or iteration cap |
//!
//! # References
//! - Kirkpatrick et al. (1983), "Optimization by Simulated Annealing"
//! - Glover (1989), "Tabu Search, Part I"

mod annealing;
mod config;
mod hill_climbing;
mod stats;
mod tabu;
#[cfg(test)]
mod testing;

pub use annealing::SimulatedAnnealing;
pub use config::{AnnealingConfig, HillClimbingConfig, TabuConfig};
pub use hill_climbing::HillClimbing;
pub use stats::SearchStatistics;
pub use tabu::TabuSearch;

use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::encoding::EncodedSolution;
use crate::error::Result;
use crate::models::Time;
use crate::scheduler::ShopSimulator;

/// A single-solution metaheuristic.
pub trait LocalSearch {
    /// Driver name (e.g., "SA").
    fn name(&self) -> &'static str;

    /// Improves `initial` and returns the best solution found.
    ///
    /// The simulator is left holding the schedule of the returned best.
    ///
    /// # Errors
    /// Invalid configuration, or an `initial` solution that does not fit
    /// the simulator's instance.
    fn search<R: Rng>(
        &self,
        sim: &mut ShopSimulator,
        initial: &EncodedSolution,
        rng: &mut R,
    ) -> Result<SearchOutcome>;
}

/// Result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution found.
    pub best: EncodedSolution,
    /// Makespan of `best`.
    pub best_makespan: Time,
    /// Run counters.
    pub statistics: SearchStatistics,
    /// Best makespan after the initial evaluation and after each iteration.
    pub trace: Vec<Time>,
}

/// Best-so-far bookkeeping shared by the drivers.
#[derive(Debug)]
struct Incumbent {
    best: EncodedSolution,
    best_makespan: Time,
    trace: Vec<Time>,
}

impl Incumbent {
    fn new(initial: &EncodedSolution, makespan: Time) -> Self {
        Self {
            best: initial.clone(),
            best_makespan: makespan,
            trace: vec![makespan],
        }
    }

    /// Takes `candidate` as the new best if it is strictly better.
    fn offer(&mut self, candidate: &EncodedSolution, makespan: Time) -> bool {
        if makespan < self.best_makespan {
            self.best = candidate.clone();
            self.best_makespan = makespan;
            true
        } else {
            false
        }
    }

    fn record(&mut self) {
        self.trace.push(self.best_makespan);
    }

    /// Re-simulates the best solution and packages the outcome.
    fn finish(
        self,
        driver: &'static str,
        sim: &mut ShopSimulator,
        mut statistics: SearchStatistics,
        started: Instant,
    ) -> Result<SearchOutcome> {
        let best_makespan = sim.compute_makespan(&self.best)?;
        statistics.on_evaluation();
        statistics.elapsed = started.elapsed();
        info!(
            driver,
            best_makespan,
            iterations = statistics.iterations,
            improvements = statistics.improvements,
            "search finished"
        );
        Ok(SearchOutcome {
            best: self.best,
            best_makespan,
            statistics,
            trace: self.trace,
        })
    }
}
