//! Schedule quality metrics (KPIs).
//!
//! Computes standard indicators from a completed schedule and its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Processing | Sum of booked durations |
//! | Machine Load | Booked time per machine |
//! | Utilization | Load / makespan, per machine and averaged |
//! | Idle Time | machines × makespan − total processing |
//! | Job Bound | Longest job under its chosen machines |
//! | Machine Bound | Largest machine load |
//! | Instance Bound | Longest job at its fastest alternatives |
//!
//! The makespan is never below `job_bound`, `machine_bound` or
//! `instance_bound`.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::{Instance, Schedule, Time};

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: Time,
    /// Sum of all booked durations.
    pub total_processing: Time,
    /// Booked time per machine.
    pub machine_loads: Vec<Time>,
    /// Per-machine utilization (0.0..1.0).
    pub utilization_by_machine: Vec<f64>,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Idle machine time inside the makespan horizon.
    pub idle_time: Time,
    /// Longest job, summing the durations actually scheduled.
    pub job_bound: Time,
    /// Largest machine load.
    pub machine_bound: Time,
    /// Longest job at its fastest alternatives.
    pub instance_bound: Time,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let makespan = schedule.makespan();
        let machine_count = instance.machine_count();

        let machine_loads: Vec<Time> = (0..machine_count)
            .map(|m| schedule.machine_load(m))
            .collect();
        let total_processing: Time = machine_loads.iter().sum();

        let utilization_by_machine: Vec<f64> = (0..machine_count)
            .map(|m| schedule.machine_utilization(m).unwrap_or(0.0))
            .collect();
        let avg_utilization = if machine_count == 0 {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / machine_count as f64
        };

        let job_bound = (0..instance.job_count())
            .map(|j| {
                schedule
                    .assignments_for_job(j)
                    .iter()
                    .map(|a| a.duration())
                    .sum::<Time>()
            })
            .max()
            .unwrap_or(0);
        let machine_bound = machine_loads.iter().copied().max().unwrap_or(0);
        let instance_bound = instance
            .jobs()
            .iter()
            .map(|j| j.min_total_duration())
            .max()
            .unwrap_or(0);

        Self {
            makespan,
            total_processing,
            machine_loads,
            utilization_by_machine,
            avg_utilization,
            idle_time: makespan * machine_count as Time - total_processing,
            job_bound,
            machine_bound,
            instance_bound,
        }
    }

    /// Best lower bound known for this schedule's machine assignment.
    pub fn lower_bound(&self) -> Time {
        self.job_bound.max(self.machine_bound)
    }

    /// Whether the makespan equals the lower bound (provably optimal for
    /// the chosen machines).
    pub fn is_tight(&self) -> bool {
        self.makespan == self.lower_bound()
    }
}
