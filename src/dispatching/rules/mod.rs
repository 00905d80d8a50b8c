//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Alternative-level**: SPT, LPT rank every alternative of every
//!   pending job's next operation and commit the winner directly.
//! - **Job-level**: MWR, LWR rank pending jobs by remaining work, then run
//!   the chosen job's next operation on its fastest alternative.
//!
//! # Score Convention
//! All rules return lower scores for higher priority candidates. Jobs are
//! scanned in index order and alternatives in listed order; the first
//! candidate with the best score wins.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::{DispatchContext, DispatchingRule, RuleScore, Selection};
use crate::models::{Alternative, Time};

/// Returns the first candidate with the strictly lowest score.
fn first_best<T>(candidates: impl IntoIterator<Item = (T, RuleScore)>) -> Option<T> {
    let mut best: Option<(T, RuleScore)> = None;
    for (candidate, score) in candidates {
        let better = best.as_ref().map_or(true, |(_, b)| score < *b);
        if better {
            best = Some((candidate, score));
        }
    }
    best.map(|(c, _)| c)
}

fn select_alternative(
    context: &DispatchContext<'_>,
    score: impl Fn(&Alternative) -> RuleScore,
) -> Option<Selection> {
    let score = &score;
    first_best(context.pending().flat_map(|(job, op)| {
        op.alternatives.iter().map(move |alt| {
            (
                Selection {
                    job,
                    alternative: *alt,
                },
                score(alt),
            )
        })
    }))
}

fn select_job(context: &DispatchContext<'_>, score: impl Fn(Time) -> RuleScore) -> Option<Selection> {
    let job = first_best(
        context
            .pending()
            .map(|(job, _)| (job, score(context.work_remaining(job)))),
    )?;
    let alternative = *context.next_operation(job)?.shortest()?;
    Some(Selection { job, alternative })
}

// ======================== Alternative-level rules ========================

/// Shortest Processing Time.
///
/// Commits the globally shortest alternative among all pending jobs' next
/// operations.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn select(&self, context: &DispatchContext<'_>) -> Option<Selection> {
        select_alternative(context, |alt| alt.duration)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
///
/// Commits the globally longest alternative among all pending jobs' next
/// operations.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn select(&self, context: &DispatchContext<'_>) -> Option<Selection> {
        select_alternative(context, |alt| -alt.duration)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

// ======================== Job-level rules ========================

/// Most Work Remaining.
///
/// Advances the job with the most remaining work, on the fastest machine
/// for its next operation. Keeps long jobs from finishing last.
#[derive(Debug, Clone, Copy)]
pub struct Mwr;

impl DispatchingRule for Mwr {
    fn name(&self) -> &'static str {
        "MWR"
    }

    fn select(&self, context: &DispatchContext<'_>) -> Option<Selection> {
        select_job(context, |remaining| -remaining)
    }

    fn description(&self) -> &'static str {
        "Most Work Remaining"
    }
}

/// Least Work Remaining.
///
/// Advances the job closest to completion, on the fastest machine for its
/// next operation.
#[derive(Debug, Clone, Copy)]
pub struct Lwr;

impl DispatchingRule for Lwr {
    fn name(&self) -> &'static str {
        "LWR"
    }

    fn select(&self, context: &DispatchContext<'_>) -> Option<Selection> {
        select_job(context, |remaining| remaining)
    }

    fn description(&self) -> &'static str {
        "Least Work Remaining"
    }
}
