//! One entry point for every heuristic.
//!
//! [`Heuristic`] names the seven strategies by their short tags
//! (SPT, LPT, MWR, LWR, SA, HC, TS). [`solve`] runs one of them against a
//! simulator and returns a [`SolveReport`]; dispatching rules run the greedy
//! loop directly, metaheuristics start from a random encoded solution.
//!
//! # Usage
//!
//! ```
//! use u_fjsp::loader::parse_instance;
//! use u_fjsp::scheduler::ShopSimulator;
//! use u_fjsp::solve::{solve, Heuristic, SolverConfig};
//!
//! let instance = parse_instance("2 2\n[0 3 1 4] [1 2]\n[0 2] [1 3 0 1]\n").unwrap();
//! let mut sim = ShopSimulator::new(&instance);
//! let config = SolverConfig::default().with_seed(42);
//!
//! for heuristic in Heuristic::ALL {
//!     let report = solve(&mut sim, heuristic, &config).unwrap();
//!     assert!(report.schedule.verify(&instance).is_empty());
//! }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dispatching::{rules, DispatchEngine, DispatchingRule};
use crate::encoding::{EncodedSolution, NeighborOperator};
use crate::error::{Result, ScheduleError};
use crate::models::{Instance, Schedule, Time};
use crate::scheduler::{ScheduleKpi, ShopSimulator};
use crate::search::{
    AnnealingConfig, HillClimbing, HillClimbingConfig, LocalSearch, SearchStatistics,
    SimulatedAnnealing, TabuConfig, TabuSearch,
};

/// The available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Shortest processing time dispatching.
    #[serde(rename = "SPT")]
    Spt,
    /// Longest processing time dispatching.
    #[serde(rename = "LPT")]
    Lpt,
    /// Most work remaining dispatching.
    #[serde(rename = "MWR")]
    Mwr,
    /// Least work remaining dispatching.
    #[serde(rename = "LWR")]
    Lwr,
    /// Simulated annealing.
    #[serde(rename = "SA")]
    SimulatedAnnealing,
    /// Hill climbing.
    #[serde(rename = "HC")]
    HillClimbing,
    /// Tabu search.
    #[serde(rename = "TS")]
    TabuSearch,
}

impl Heuristic {
    /// Every heuristic, dispatching rules first.
    pub const ALL: [Heuristic; 7] = [
        Heuristic::Spt,
        Heuristic::Lpt,
        Heuristic::Mwr,
        Heuristic::Lwr,
        Heuristic::SimulatedAnnealing,
        Heuristic::HillClimbing,
        Heuristic::TabuSearch,
    ];

    /// Short tag, e.g. "SPT" or "TS".
    pub fn tag(&self) -> &'static str {
        match self {
            Heuristic::Spt => "SPT",
            Heuristic::Lpt => "LPT",
            Heuristic::Mwr => "MWR",
            Heuristic::Lwr => "LWR",
            Heuristic::SimulatedAnnealing => "SA",
            Heuristic::HillClimbing => "HC",
            Heuristic::TabuSearch => "TS",
        }
    }

    /// Whether this is a greedy dispatching rule.
    pub fn is_dispatching(&self) -> bool {
        self.dispatching_rule().is_some()
    }

    /// The dispatching rule behind this heuristic, if it is one.
    pub fn dispatching_rule(&self) -> Option<Arc<dyn DispatchingRule>> {
        match self {
            Heuristic::Spt => Some(Arc::new(rules::Spt)),
            Heuristic::Lpt => Some(Arc::new(rules::Lpt)),
            Heuristic::Mwr => Some(Arc::new(rules::Mwr)),
            Heuristic::Lwr => Some(Arc::new(rules::Lwr)),
            Heuristic::SimulatedAnnealing | Heuristic::HillClimbing | Heuristic::TabuSearch => None,
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Heuristic {
    type Err = ScheduleError;

    /// Parses a tag, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Heuristic::ALL
            .into_iter()
            .find(|h| h.tag().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScheduleError::InvalidConfig(format!("unknown heuristic {s:?}")))
    }
}

/// Parameters for [`solve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Simulated annealing parameters.
    pub annealing: AnnealingConfig,
    /// Hill climbing parameters.
    pub hill_climbing: HillClimbingConfig,
    /// Tabu search parameters.
    pub tabu: TabuConfig,
    /// Neighbor operator used by all metaheuristics.
    pub neighbor: NeighborOperator,
    /// RNG seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl SolverConfig {
    /// Sets the simulated annealing parameters.
    pub fn with_annealing(mut self, config: AnnealingConfig) -> Self {
        self.annealing = config;
        self
    }

    /// Sets the hill climbing parameters.
    pub fn with_hill_climbing(mut self, config: HillClimbingConfig) -> Self {
        self.hill_climbing = config;
        self
    }

    /// Sets the tabu search parameters.
    pub fn with_tabu(mut self, config: TabuConfig) -> Self {
        self.tabu = config;
        self
    }

    /// Sets the neighbor operator.
    pub fn with_neighbor_operator(mut self, neighbor: NeighborOperator) -> Self {
        self.neighbor = neighbor;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates every driver config.
    pub fn validate(&self) -> Result<()> {
        self.annealing.validate()?;
        self.hill_climbing.validate()?;
        self.tabu.validate()
    }
}

/// Outcome of one [`solve`] call.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The heuristic that produced this result.
    pub heuristic: Heuristic,
    /// Final makespan.
    pub makespan: Time,
    /// Final schedule.
    pub schedule: Schedule,
    /// Encoded form of the final schedule.
    pub solution: EncodedSolution,
    /// Search counters (metaheuristics only).
    pub statistics: Option<SearchStatistics>,
    /// Best makespan per iteration (metaheuristics only).
    pub trace: Vec<Time>,
}

impl SolveReport {
    /// KPIs of the final schedule.
    pub fn kpi(&self, instance: &Instance) -> ScheduleKpi {
        ScheduleKpi::calculate(&self.schedule, instance)
    }
}

/// Runs `heuristic` with the RNG described by `config.seed`.
///
/// The simulator is reset first and left holding the final schedule.
pub fn solve(sim: &mut ShopSimulator, heuristic: Heuristic, config: &SolverConfig) -> Result<SolveReport> {
    match config.seed {
        Some(seed) => solve_with_rng(sim, heuristic, config, &mut SmallRng::seed_from_u64(seed)),
        None => solve_with_rng(sim, heuristic, config, &mut rand::rng()),
    }
}

/// Runs `heuristic` with a caller-supplied RNG.
pub fn solve_with_rng<R: Rng>(
    sim: &mut ShopSimulator,
    heuristic: Heuristic,
    config: &SolverConfig,
    rng: &mut R,
) -> Result<SolveReport> {
    config.validate()?;

    let report = match heuristic {
        Heuristic::Spt | Heuristic::Lpt | Heuristic::Mwr | Heuristic::Lwr => {
            run_dispatching(sim, heuristic)?
        }
        Heuristic::SimulatedAnnealing => {
            let driver = SimulatedAnnealing::new(config.annealing)
                .with_neighbor_operator(config.neighbor);
            run_search(sim, heuristic, &driver, rng)?
        }
        Heuristic::HillClimbing => {
            let driver = HillClimbing::new(config.hill_climbing)
                .with_neighbor_operator(config.neighbor);
            run_search(sim, heuristic, &driver, rng)?
        }
        Heuristic::TabuSearch => {
            let driver = TabuSearch::new(config.tabu).with_neighbor_operator(config.neighbor);
            run_search(sim, heuristic, &driver, rng)?
        }
    };

    info!(heuristic = %heuristic, makespan = report.makespan, "solve finished");
    Ok(report)
}

fn run_dispatching(sim: &mut ShopSimulator, heuristic: Heuristic) -> Result<SolveReport> {
    let Some(rule) = heuristic.dispatching_rule() else {
        return Err(ScheduleError::InvalidConfig(format!(
            "{heuristic} is not a dispatching rule"
        )));
    };
    let makespan = DispatchEngine::from_shared(rule).run(sim)?;
    let solution = EncodedSolution::from_schedule(sim.schedule(), sim.instance())?;
    Ok(SolveReport {
        heuristic,
        makespan,
        schedule: sim.schedule().clone(),
        solution,
        statistics: None,
        trace: Vec::new(),
    })
}

/// Starts `driver` from a random solution.
fn run_search<S: LocalSearch, R: Rng>(
    sim: &mut ShopSimulator,
    heuristic: Heuristic,
    driver: &S,
    rng: &mut R,
) -> Result<SolveReport> {
    let initial = EncodedSolution::random(sim.instance(), rng);
    let outcome = driver.search(sim, &initial, rng)?;
    Ok(SolveReport {
        heuristic,
        makespan: outcome.best_makespan,
        schedule: sim.schedule().clone(),
        solution: outcome.best,
        statistics: Some(outcome.statistics),
        trace: outcome.trace,
    })
}

/// Runs every heuristic in [`Heuristic::ALL`] order.
///
/// Seeded configs give each heuristic its own stream, so results do not
/// depend on which heuristics ran before.
pub fn solve_all(sim: &mut ShopSimulator, config: &SolverConfig) -> Result<Vec<SolveReport>> {
    Heuristic::ALL
        .into_iter()
        .enumerate()
        .map(|(i, heuristic)| {
            let run_config = match config.seed {
                Some(seed) => config.clone().with_seed(seed.wrapping_add(i as u64)),
                None => config.clone(),
            };
            solve(sim, heuristic, &run_config)
        })
        .collect()
}
