//! Flexible job-shop scheduling for the U-Engine ecosystem.
//!
//! Jobs are chains of operations; every operation may run on one of several
//! machines, each with its own duration. The crate builds schedules that
//! respect job order and machine exclusivity while minimizing the makespan.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Instance`, `Job`, `Operation`,
//!   `Alternative`, `Schedule`, `Assignment`
//! - **`validation`**: Instance integrity checks (ids, alternatives, durations)
//! - **`loader`**: Plain-text instance format
//! - **`scheduler`**: `ShopSimulator` (batch and incremental modes) and KPIs
//! - **`dispatching`**: SPT, LPT, MWR, LWR rules and the dispatch loop
//! - **`encoding`**: OSV/MAV encoded solutions and the neighbor operator
//! - **`search`**: Simulated annealing, hill climbing, tabu search
//! - **`solve`**: Run any heuristic by tag
//!
//! # Example
//!
//! ```
//! use u_fjsp::loader::parse_instance;
//! use u_fjsp::scheduler::ShopSimulator;
//! use u_fjsp::solve::{solve, Heuristic, SolverConfig};
//!
//! let instance = parse_instance("2 2\n[0 3 1 5] [1 2]\n[0 4] [1 6 0 1]\n").unwrap();
//! let mut sim = ShopSimulator::new(&instance);
//!
//! let report = solve(&mut sim, Heuristic::Mwr, &SolverConfig::default()).unwrap();
//! assert!(report.schedule.verify(&instance).is_empty());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

pub mod dispatching;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod models;
pub mod scheduler;
pub mod search;
pub mod solve;
pub mod validation;

pub use error::{Result, ScheduleError};
