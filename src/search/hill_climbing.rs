//! Hill climbing with a patience budget.
//!
//! A neighbor replaces the current solution only if its makespan is
//! strictly lower. Every non-improving neighbor spends one unit of the
//! improvement budget and every improvement refills it, so the run ends
//! after `improvement_budget` consecutive failures (a probable local
//! optimum) or at `max_iterations`.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", §4.1

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use super::{HillClimbingConfig, Incumbent, LocalSearch, SearchOutcome, SearchStatistics};
use crate::encoding::{EncodedSolution, NeighborOperator};
use crate::error::Result;
use crate::scheduler::ShopSimulator;

/// First-improvement hill climbing driver.
#[derive(Debug, Clone, Default)]
pub struct HillClimbing {
    config: HillClimbingConfig,
    neighbor: NeighborOperator,
}

impl HillClimbing {
    /// Creates a driver with the given parameters.
    pub fn new(config: HillClimbingConfig) -> Self {
        Self {
            config,
            neighbor: NeighborOperator::default(),
        }
    }

    /// Replaces the neighbor operator.
    pub fn with_neighbor_operator(mut self, neighbor: NeighborOperator) -> Self {
        self.neighbor = neighbor;
        self
    }

    /// The parameters in use.
    pub fn config(&self) -> &HillClimbingConfig {
        &self.config
    }
}

impl LocalSearch for HillClimbing {
    fn name(&self) -> &'static str {
        "HC"
    }

    fn search<R: Rng>(
        &self,
        sim: &mut ShopSimulator,
        initial: &EncodedSolution,
        rng: &mut R,
    ) -> Result<SearchOutcome> {
        self.config.validate()?;
        let started = Instant::now();
        let mut stats = SearchStatistics::default();

        let mut current = initial.clone();
        let mut current_makespan = sim.compute_makespan(&current)?;
        stats.on_evaluation();
        let mut incumbent = Incumbent::new(&current, current_makespan);

        let mut budget = self.config.improvement_budget;
        let mut iteration = 0usize;

        while iteration < self.config.max_iterations && budget > 0 {
            let (candidate, _) = self.neighbor.neighbor(sim.instance(), &current, rng);
            let makespan = sim.compute_makespan(&candidate)?;
            stats.on_evaluation();

            if makespan < current_makespan {
                stats.on_accepted();
                if incumbent.offer(&candidate, makespan) {
                    stats.on_improvement();
                }
                current = candidate;
                current_makespan = makespan;
                budget = self.config.improvement_budget;
            } else {
                budget -= 1;
            }

            iteration += 1;
            stats.on_iteration();
            incumbent.record();
        }

        if budget == 0 {
            debug!(iteration, current_makespan, "hill climbing reached a plateau");
        }
        incumbent.finish(self.name(), sim, stats, started)
    }
}
