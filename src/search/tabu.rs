//! Tabu search.
//!
//! Each iteration samples a batch of neighbors of the current solution and
//! moves to the best admissible one, even if it is worse.
//!
//! # Mechanisms
//!
//! 1.  **Tabu list:** a FIFO of move signatures with capacity `tenure`. A
//!     move is the pair (current solution, candidate solution), both
//!     including the machine assignment, so reassign moves are told apart.
//! 2.  **Aspiration:** a tabu move is still admissible if its makespan beats
//!     the best known.
//!
//! The run ends at `max_iterations` or as soon as a batch holds no
//! admissible candidate.
//!
//! # Reference
//! Glover (1989), "Tabu Search, Part I"

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use rand::Rng;
use rustc_hash::{FxHashSet, FxHasher};
use tracing::debug;

use super::{Incumbent, LocalSearch, SearchOutcome, SearchStatistics, TabuConfig};
use crate::encoding::{EncodedSolution, NeighborOperator};
use crate::error::Result;
use crate::models::Time;
use crate::scheduler::ShopSimulator;

/// Fixed-capacity FIFO of move signatures.
#[derive(Debug, Clone)]
struct TabuList {
    tenure: usize,
    queue: VecDeque<u64>,
    members: FxHashSet<u64>,
}

impl TabuList {
    fn new(tenure: usize) -> Self {
        Self {
            tenure,
            queue: VecDeque::with_capacity(tenure),
            members: FxHashSet::default(),
        }
    }

    #[inline]
    fn signature(from: &EncodedSolution, to: &EncodedSolution) -> u64 {
        let mut hasher = FxHasher::default();
        from.hash(&mut hasher);
        to.hash(&mut hasher);
        hasher.finish()
    }

    fn contains(&self, signature: u64) -> bool {
        self.members.contains(&signature)
    }

    /// Records a move, evicting the oldest once full.
    ///
    /// A move already on the list moves to the newest slot, so its tenure
    /// restarts.
    fn push(&mut self, signature: u64) {
        if self.members.contains(&signature) {
            self.queue.retain(|&s| s != signature);
        } else if self.queue.len() >= self.tenure {
            if let Some(oldest) = self.queue.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.queue.push_back(signature);
        self.members.insert(signature);
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Tabu search driver.
#[derive(Debug, Clone, Default)]
pub struct TabuSearch {
    config: TabuConfig,
    neighbor: NeighborOperator,
}

impl TabuSearch {
    /// Creates a driver with the given parameters.
    pub fn new(config: TabuConfig) -> Self {
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
    pub fn config(&self) -> &TabuConfig {
        &self.config
    }
}

impl LocalSearch for TabuSearch {
    fn name(&self) -> &'static str {
        "TS"
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
        let current_makespan = sim.compute_makespan(&current)?;
        stats.on_evaluation();
        let mut incumbent = Incumbent::new(&current, current_makespan);
        let mut tabu = TabuList::new(self.config.tenure);

        let mut iteration = 0usize;
        while iteration < self.config.max_iterations {
            let mut chosen: Option<(EncodedSolution, Time, u64)> = None;

            for _ in 0..self.config.neighbor_batch_size {
                let (candidate, _) = self.neighbor.neighbor(sim.instance(), &current, rng);
                let makespan = sim.compute_makespan(&candidate)?;
                stats.on_evaluation();

                let signature = TabuList::signature(&current, &candidate);
                let admissible =
                    !tabu.contains(signature) || makespan < incumbent.best_makespan;
                let better = chosen.as_ref().map_or(true, |(_, m, _)| makespan < *m);
                if admissible && better {
                    chosen = Some((candidate, makespan, signature));
                }
            }

            let Some((next, makespan, signature)) = chosen else {
                debug!(iteration, tabu_len = tabu.len(), "no admissible neighbor");
                break;
            };

            stats.on_accepted();
            if incumbent.offer(&next, makespan) {
                stats.on_improvement();
            }
            tabu.push(signature);
            current = next;

            iteration += 1;
            stats.on_iteration();
            incumbent.record();
        }

        incumbent.finish(self.name(), sim, stats, started)
    }
}
