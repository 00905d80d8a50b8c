//! Dispatching rules and the greedy dispatch loop.
//!
//! A dispatching rule looks at the live simulator state and names the one
//! (job, alternative) pair to commit next. [`DispatchEngine`] repeats
//! "select, commit" until every job is complete.
//!
//! # Usage
//!
//! ```
//! use u_fjsp::dispatching::{rules, DispatchEngine};
//! use u_fjsp::models::{Instance, Job, Operation};
//! use u_fjsp::scheduler::ShopSimulator;
//!
//! let instance = Instance::new(
//!     1,
//!     vec![
//!         Job::new(0).with_operation(Operation::single(0, 3)),
//!         Job::new(1).with_operation(Operation::single(0, 5)),
//!     ],
//! )
//! .unwrap();
//! let mut sim = ShopSimulator::new(&instance);
//!
//! let makespan = DispatchEngine::new(rules::Spt).run(&mut sim).unwrap();
//! assert_eq!(makespan, 8);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::DispatchEngine;

use crate::models::Alternative;
use std::fmt::Debug;

/// Score used to rank candidates.
///
/// Lower scores = higher priority. Ties keep the first candidate seen.
pub type RuleScore = i64;

/// The (job, alternative) pair a rule wants committed next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Job whose next operation is scheduled.
    pub job: usize,
    /// Concrete machine/duration chosen for that operation.
    pub alternative: Alternative,
}

/// A greedy next-operation policy.
///
/// # Score Convention
/// Built-in rules rank candidates with a [`RuleScore`] where **lower score
/// = higher priority**, scanning jobs in index order and keeping the first
/// candidate on ties.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "MWR").
    fn name(&self) -> &'static str;

    /// Picks the next (job, alternative) to commit.
    ///
    /// Returns `None` once every job is complete.
    fn select(&self, context: &DispatchContext<'_>) -> Option<Selection>;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
