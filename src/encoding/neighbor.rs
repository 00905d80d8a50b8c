//! Neighbor operator shared by all local-search drivers.
//!
//! Two move kinds:
//! - **Swap**: exchange two distinct positions of the operation sequence.
//!   Changes which job wins contention on a machine.
//! - **Reassign**: move one operation to a different machine among its
//!   alternatives. Explores routings that sequencing alone cannot reach.
//!
//! # Usage
//!
//! ```
//! use u_fjsp::encoding::NeighborOperator;
//!
//! let op = NeighborOperator::default();
//! assert!((op.swap_probability - 0.5).abs() < 1e-12);
//! ```
//!
//! # Reference
//! Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"

use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::EncodedSolution;
use crate::models::Instance;

/// The perturbation a neighbor was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Positions `first` and `second` of the sequence were exchanged.
    Swap {
        /// First position.
        first: usize,
        /// Second position.
        second: usize,
    },
    /// An operation moved from one machine to another.
    Reassign {
        /// Job index.
        job: usize,
        /// Operation index within the job.
        operation: usize,
        /// Previous machine.
        from: usize,
        /// New machine.
        to: usize,
    },
    /// Nothing could be changed (sequence too short, or no flexible
    /// operation found within the pick budget).
    Identity,
}

/// Random one-step perturbation of an [`EncodedSolution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborOperator {
    /// Probability of a swap move; otherwise a reassign move is tried.
    pub swap_probability: f64,
    /// Reassign picks allowed per operation of the instance.
    pub picks_per_operation: usize,
}

impl Default for NeighborOperator {
    fn default() -> Self {
        Self {
            swap_probability: 0.5,
            picks_per_operation: 2,
        }
    }
}

impl NeighborOperator {
    /// Sets the swap probability (clamped to `[0, 1]`).
    pub fn with_swap_probability(mut self, probability: f64) -> Self {
        self.swap_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the reassign pick budget per operation.
    pub fn with_picks_per_operation(mut self, picks: usize) -> Self {
        self.picks_per_operation = picks;
        self
    }

    /// Returns a perturbed copy of `solution` and the move applied.
    ///
    /// The input is never modified.
    pub fn neighbor<R: Rng>(
        &self,
        instance: &Instance,
        solution: &EncodedSolution,
        rng: &mut R,
    ) -> (EncodedSolution, Move) {
        let mut candidate = solution.clone();
        let mv = self.perturb(instance, &mut candidate, rng);
        (candidate, mv)
    }

    /// Applies one random move in place.
    pub fn perturb<R: Rng>(
        &self,
        instance: &Instance,
        solution: &mut EncodedSolution,
        rng: &mut R,
    ) -> Move {
        if rng.random_bool(self.swap_probability.clamp(0.0, 1.0)) {
            swap_move(solution, rng)
        } else {
            reassign_move(instance, solution, self.picks_per_operation, rng)
        }
    }
}

/// Swaps two distinct random positions of the operation sequence.
pub fn swap_move<R: Rng>(solution: &mut EncodedSolution, rng: &mut R) -> Move {
    let len = solution.operation_sequence.len();
    if len < 2 {
        return Move::Identity;
    }
    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    solution.operation_sequence.swap(first, second);
    Move::Swap { first, second }
}

/// Moves one random flexible operation to a different machine.
///
/// Makes up to `picks_per_operation × total operations` random
/// (job, operation) picks. A pick succeeds if the operation has an
/// alternative on a machine other than the current one. Returns
/// [`Move::Identity`] if the budget runs out.
pub fn reassign_move<R: Rng>(
    instance: &Instance,
    solution: &mut EncodedSolution,
    picks_per_operation: usize,
    rng: &mut R,
) -> Move {
    let job_count = instance.job_count();
    if job_count == 0 {
        return Move::Identity;
    }
    let budget = picks_per_operation * instance.total_operations();

    for _ in 0..budget {
        let job = rng.random_range(0..job_count);
        let Some(job_ref) = instance.job(job) else {
            continue;
        };
        if !job_ref.has_operations() {
            continue;
        }
        let operation = rng.random_range(0..job_ref.operation_count());
        let Some(current) = solution.machine_for(job, operation) else {
            continue;
        };
        let others: Vec<usize> = job_ref.operations[operation]
            .alternatives
            .iter()
            .map(|alt| alt.machine)
            .filter(|&m| m != current)
            .collect();
        let Some(&to) = others.choose(rng) else {
            continue;
        };
        solution.machine_assignment[job][operation] = to;
        return Move::Reassign {
            job,
            operation,
            from: current,
            to,
        };
    }

    Move::Identity
}
