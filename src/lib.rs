//! Generic evolutionary algorithms and stochastic constructive sampling.
//!
//! - **Evolutionary algorithms** ([`evo`]): a representation-agnostic
//!   generational EA over any candidate type, with pluggable initializer,
//!   selection, crossover and mutation, a double-buffered population with
//!   elitism, and fitness derived from a problem's cost.
//! - **Stochastic sampling** ([`ss`]): randomized constructive search
//!   driven by a problem-specific heuristic, as value-biased stochastic
//!   sampling or acceptance-band sampling.
//! - **Multistart** ([`parallel`], feature `parallel`): runs independent
//!   forks of any search on the rayon thread pool, sharing one
//!   [`ProgressTracker`].
//!
//! # Architecture
//!
//! Every search minimizes the cost of a [`Problem`]. Search instances own
//! their state and random number generator exclusively; the only state
//! shared between a search and its forks is the [`ProgressTracker`], which
//! records the best solution and carries the cooperative stop flag.
//!
//! # Example
//!
//! ```
//! use u_evosearch::evo::{EaConfig, GeneticAlgorithm, NegativeCostFitness, Selection};
//! use u_evosearch::operators::bits::UniformCrossover;
//! use u_evosearch::problems::OneMax;
//!
//! let config = EaConfig::default()
//!     .with_population_size(30)
//!     .with_elite_count(2)
//!     .with_seed(7);
//! let mut ga = GeneticAlgorithm::new(
//!     config,
//!     24,
//!     1.0 / 24.0,
//!     NegativeCostFitness::new(OneMax),
//!     Selection::Tournament(3),
//!     UniformCrossover::default(),
//! )
//! .unwrap();
//! let result = ga.run(200);
//! assert!(result.best.is_some());
//! ```

pub mod error;
pub mod evo;
pub mod operators;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod problem;
pub mod problems;
pub mod random;
pub mod search;
pub mod ss;
pub mod tracker;

pub use error::{ErrorKind, SearchError};
pub use problem::{Cost, Problem, SolutionCostPair};
pub use search::Metaheuristic;
pub use tracker::ProgressTracker;
