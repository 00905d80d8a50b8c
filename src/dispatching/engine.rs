//! Dispatch engine: drives a rule against the simulator until done.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::sync::Arc;

use tracing::debug;

use super::DispatchingRule;
use crate::error::Result;
use crate::models::Time;
use crate::scheduler::ShopSimulator;

/// Greedy, non-backtracking list scheduler.
///
/// Each step asks the rule for one (job, alternative) pair and commits it
/// through the simulator's incremental mode. Every step advances exactly
/// one job cursor, so the loop ends after `total_operations` steps.
///
/// # Example
/// ```
/// use u_fjsp::dispatching::{rules, DispatchEngine};
///
/// let engine = DispatchEngine::new(rules::Mwr);
/// assert_eq!(engine.rule().name(), "MWR");
/// ```
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    rule: Arc<dyn DispatchingRule>,
}

impl DispatchEngine {
    /// Creates an engine for the given rule.
    pub fn new<R: DispatchingRule + 'static>(rule: R) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }

    /// Creates an engine from a shared rule.
    pub fn from_shared(rule: Arc<dyn DispatchingRule>) -> Self {
        Self { rule }
    }

    /// The rule in use.
    pub fn rule(&self) -> &dyn DispatchingRule {
        self.rule.as_ref()
    }

    /// Resets the simulator and schedules every operation.
    ///
    /// Returns the makespan. The schedule stays readable through
    /// [`ShopSimulator::schedule`].
    pub fn run(&self, sim: &mut ShopSimulator) -> Result<Time> {
        sim.reset();
        let mut steps = 0usize;
        loop {
            let next = self.rule.select(&sim.dispatch_context());
            let Some(selection) = next else {
                break;
            };
            sim.schedule_next(selection.job, selection.alternative)?;
            steps += 1;
        }
        debug!(
            rule = self.rule.name(),
            steps,
            makespan = sim.makespan(),
            "dispatch finished"
        );
        Ok(sim.makespan())
    }
}
