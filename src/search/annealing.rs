//! Simulated annealing.
//!
//! Accepts every improving or equal neighbor, and a worsening one with the
//! Metropolis probability `exp(-delta / T)`. The temperature follows a
//! geometric schedule `T_{k+1} = T_k * cooling_rate`; the run ends once
//! `T <= min_temperature` or the iteration cap is hit.
//!
//! # Reference
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use super::{AnnealingConfig, Incumbent, LocalSearch, SearchOutcome, SearchStatistics};
use crate::encoding::{EncodedSolution, NeighborOperator};
use crate::error::Result;
use crate::scheduler::ShopSimulator;

/// Simulated annealing driver.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_fjsp::encoding::EncodedSolution;
/// use u_fjsp::models::{Instance, Job, Operation};
/// use u_fjsp::scheduler::ShopSimulator;
/// use u_fjsp::search::{AnnealingConfig, LocalSearch, SimulatedAnnealing};
///
/// let instance = Instance::new(
///     2,
///     vec![
///         Job::new(0).with_operation(Operation::new().with_alternative(0, 3).with_alternative(1, 4)),
///         Job::new(1).with_operation(Operation::single(0, 5)),
///     ],
/// )
/// .unwrap();
/// let mut sim = ShopSimulator::new(&instance);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let initial = EncodedSolution::random(&instance, &mut rng);
///
/// let sa = SimulatedAnnealing::new(AnnealingConfig::default().with_max_iterations(200));
/// let outcome = sa.search(&mut sim, &initial, &mut rng).unwrap();
/// assert_eq!(outcome.best_makespan, sim.makespan());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealing {
    config: AnnealingConfig,
    neighbor: NeighborOperator,
}

impl SimulatedAnnealing {
    /// Creates a driver with the given parameters.
    pub fn new(config: AnnealingConfig) -> Self {
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
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Metropolis criterion.
    #[inline]
    fn accept<R: Rng>(delta: i64, temperature: f64, rng: &mut R) -> bool {
        if delta < 0 {
            return true;
        }
        let p = (-(delta as f64) / temperature).exp();
        rng.random::<f64>() < p
    }
}

impl LocalSearch for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "SA"
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

        let mut temperature = self.config.initial_temperature;
        let mut iteration = 0usize;
        debug!(
            initial_makespan = current_makespan,
            temperature, "annealing started"
        );

        while temperature > self.config.min_temperature && iteration < self.config.max_iterations {
            let (candidate, _) = self.neighbor.neighbor(sim.instance(), &current, rng);
            let makespan = sim.compute_makespan(&candidate)?;
            stats.on_evaluation();

            if Self::accept(makespan - current_makespan, temperature, rng) {
                stats.on_accepted();
                if incumbent.offer(&candidate, makespan) {
                    stats.on_improvement();
                }
                current = candidate;
                current_makespan = makespan;
            }

            temperature *= self.config.cooling_rate;
            iteration += 1;
            stats.on_iteration();
            incumbent.record();
        }

        incumbent.finish(self.name(), sim, stats, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::search::testing::{flexible_instance, frozen_instance, is_non_increasing};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_never_worse_than_initial() {
        let inst = flexible_instance();
        let mut sim = ShopSimulator::new(&inst);
        let mut rng = SmallRng::seed_from_u64(42);
        let initial = EncodedSolution::random(&inst, &mut rng);
        let initial_makespan = sim.compute_makespan(&initial).unwrap();

        let outcome = SimulatedAnnealing::default()
            .search(&mut sim, &initial, &mut rng)
            .unwrap();
        assert!(outcome.best_makespan <= initial_makespan);
        assert!(outcome.best.is_valid(&inst));
        assert!(is_non_increasing(&outcome.trace));
        assert_eq!(outcome.trace[0], initial_makespan);
        assert_eq!(*outcome.trace.last().unwrap(), outcome.best_makespan);
    }

    #[test]
    fn test_simulator_holds_best_schedule() {
        let inst = flexible_instance();
        let mut sim = ShopSimulator::new(&inst);
        let mut rng = SmallRng::seed_from_u64(7);
        let initial = EncodedSolution::random(&inst, &mut rng);

        let outcome = SimulatedAnnealing::default()
            .search(&mut sim, &initial, &mut rng)
            .unwrap();
        assert_eq!(sim.makespan(), outcome.best_makespan);
        assert!(sim.schedule().verify(&inst).is_empty());
    }

    #[test]
    fn test_stops_when_frozen() {
        // 10 -> 5 -> 2.5 -> 1.25 -> 0.625: four iterations above 1
        let inst = frozen_instance();
        let mut sim = ShopSimulator::new(&inst);
        let mut rng = SmallRng::seed_from_u64(1);
        let initial = EncodedSolution::random(&inst, &mut rng);
        let cfg = AnnealingConfig::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.5);

        let outcome = SimulatedAnnealing::new(cfg)
            .search(&mut sim, &initial, &mut rng)
            .unwrap();
        assert_eq!(outcome.statistics.iterations, 4);
        assert_eq!(outcome.trace.len(), 5);
        assert_eq!(outcome.best_makespan, 4);
    }

    #[test]
    fn test_stops_at_iteration_cap() {
        let inst = flexible_instance();
        let mut sim = ShopSimulator::new(&inst);
        let mut rng = SmallRng::seed_from_u64(3);
        let initial = EncodedSolution::random(&inst, &mut rng);
        let cfg = AnnealingConfig::default().with_cooling_rate(0.999).with_max_iterations(25);

        let outcome = SimulatedAnnealing::new(cfg)
            .search(&mut sim, &initial, &mut rng)
            .unwrap();
        assert_eq!(outcome.statistics.iterations, 25);
        // initial + one per iteration + final re-simulation
        assert_eq!(outcome.statistics.evaluations, 27);
    }

    #[test]
    fn test_same_seed_same_result() {
        let inst = flexible_instance();
        let run = |seed: u64| {
            let mut sim = ShopSimulator::new(&inst);
            let mut rng = SmallRng::seed_from_u64(seed);
            let initial = EncodedSolution::random(&inst, &mut rng);
            SimulatedAnnealing::default()
                .search(&mut sim, &initial, &mut rng)
                .unwrap()
        };
        let a = run(99);
        let b = run(99);
        assert_eq!(a.best, b.best);
        assert_eq!(a.trace, b.trace);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let inst = frozen_instance();
        let mut sim = ShopSimulator::new(&inst);
        let mut rng = SmallRng::seed_from_u64(1);
        let initial = EncodedSolution::random(&inst, &mut rng);
        let sa = SimulatedAnnealing::new(AnnealingConfig::default().with_cooling_rate(1.5));
        assert!(matches!(
            sa.search(&mut sim, &initial, &mut rng),
            Err(ScheduleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_metropolis() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(SimulatedAnnealing::accept(-1, 0.001, &mut rng));
        // exp(0) = 1: equal moves always pass
        assert!(SimulatedAnnealing::accept(0, 5.0, &mut rng));
        // exp(-1e6) underflows to 0
        assert!(!SimulatedAnnealing::accept(1_000_000, 1.0, &mut rng));
    }
}
