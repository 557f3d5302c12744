//! Evolutionary algorithm configuration.
//!
//! [`EaConfig`] holds the numeric parameters of a generational run. The
//! operators themselves are supplied through [`EaBuilder`](super::EaBuilder).

use crate::error::SearchError;

/// Configuration for a [`GenerationalEa`](super::GenerationalEa).
///
/// # Defaults
///
/// ```
/// use u_evosearch::evo::EaConfig;
///
/// let config = EaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.elite_count, 0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evosearch::evo::EaConfig;
///
/// let config = EaConfig::default()
///     .with_population_size(200)
///     .with_elite_count(2)
///     .with_crossover_rate(0.8)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EaConfig {
    /// Number of candidates in the population. Must be at least 1.
    pub population_size: usize,

    /// Number of fittest members carried into each new generation.
    ///
    /// Must be less than the population size. 0 disables elitism.
    pub elite_count: usize,

    /// Probability of applying crossover to each pair of children.
    ///
    /// Values of 1 or more always cross. Must not be negative.
    pub crossover_rate: f64,

    /// Probability of applying the mutation operator to each child (0.0–1.0).
    pub mutation_rate: f64,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked before each generation, so a run may overshoot by up to one
    /// generation's worth of work. `None` disables the limit.
    pub time_limit_ms: Option<u64>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_count: 0,
            crossover_rate: 0.9,
            mutation_rate: 1.0,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl EaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_count(mut self, k: usize) -> Self {
        self.elite_count = k;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the per-child mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.population_size == 0 {
            return Err(SearchError::PopulationSize {
                size: self.population_size,
            });
        }
        if self.elite_count >= self.population_size {
            return Err(SearchError::EliteCount {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.crossover_rate.is_nan() || self.crossover_rate < 0.0 {
            return Err(SearchError::CrossoverRate {
                rate: self.crossover_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SearchError::probability(
                "mutation_rate",
                self.mutation_rate,
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(SearchError::TimeLimit);
        }
        Ok(())
    }
}
