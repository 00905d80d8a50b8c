//! Schedule simulation and KPI evaluation.
//!
//! # Simulator
//!
//! `ShopSimulator` holds the mutable working copy of jobs and machines.
//! Dispatching rules drive it one operation at a time; metaheuristics replay
//! whole encoded solutions through it to score them.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, loads, utilization and the simple lower
//! bounds a schedule can be compared against.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"

mod kpi;
mod simulator;

pub use kpi::ScheduleKpi;
pub use simulator::ShopSimulator;
