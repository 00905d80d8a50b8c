//! Search driver parameters.
//!
//! Every config has documented defaults, `with_*` builders, and a
//! `validate` method that drivers call before running.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

fn positive_f64(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScheduleError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn positive_count(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(ScheduleError::InvalidConfig(format!("{name} must be at least 1")))
    }
}

/// Simulated annealing parameters.
///
/// # Defaults
/// | Field | Value |
/// |-------|-------|
/// | `initial_temperature` | 1000 |
/// | `cooling_rate` | 0.95 |
/// | `min_temperature` | 1 |
/// | `max_iterations` | 10000 |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Geometric cooling factor in `(0, 1)`.
    pub cooling_rate: f64,
    /// The run stops once the temperature is at or below this value.
    pub min_temperature: f64,
    /// Hard iteration cap.
    pub max_iterations: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            min_temperature: 1.0,
            max_iterations: 10_000,
        }
    }
}

impl AnnealingConfig {
    /// Sets the starting temperature.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets the stopping temperature.
    pub fn with_min_temperature(mut self, temperature: f64) -> Self {
        self.min_temperature = temperature;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        positive_f64("initial_temperature", self.initial_temperature)?;
        positive_f64("min_temperature", self.min_temperature)?;
        positive_count("max_iterations", self.max_iterations)?;
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ScheduleError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }
}

/// Hill climbing parameters.
///
/// # Defaults
/// | Field | Value |
/// |-------|-------|
/// | `max_iterations` | 1000 |
/// | `improvement_budget` | 10 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimbingConfig {
    /// Hard iteration cap.
    pub max_iterations: usize,
    /// Consecutive non-improving neighbors tolerated before stopping.
    pub improvement_budget: usize,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            improvement_budget: 10,
        }
    }
}

impl HillClimbingConfig {
    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the number of consecutive non-improving neighbors tolerated.
    pub fn with_improvement_budget(mut self, budget: usize) -> Self {
        self.improvement_budget = budget;
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        positive_count("max_iterations", self.max_iterations)?;
        positive_count("improvement_budget", self.improvement_budget)
    }
}

/// Tabu search parameters.
///
/// # Defaults
/// | Field | Value |
/// |-------|-------|
/// | `tenure` | 5 |
/// | `max_iterations` | 1000 |
/// | `neighbor_batch_size` | 10 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuConfig {
    /// Capacity of the tabu list.
    pub tenure: usize,
    /// Hard iteration cap.
    pub max_iterations: usize,
    /// Neighbors sampled per iteration.
    pub neighbor_batch_size: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tenure: 5,
            max_iterations: 1000,
            neighbor_batch_size: 10,
        }
    }
}

impl TabuConfig {
    /// Sets the tabu list capacity.
    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = tenure;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the number of neighbors sampled per iteration.
    pub fn with_neighbor_batch_size(mut self, size: usize) -> Self {
        self.neighbor_batch_size = size;
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        positive_count("tenure", self.tenure)?;
        positive_count("max_iterations", self.max_iterations)?;
        positive_count("neighbor_batch_size", self.neighbor_batch_size)
    }
}
