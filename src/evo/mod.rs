//! Evolutionary algorithm framework.
//!
//! A generic, representation-agnostic generational EA. Users supply the
//! operators from [`operators`](crate::operators) and a
//! [`FitnessFunction`]; the engine manages the population, selection,
//! elitism and progress reporting.
//!
//! # Core Traits
//!
//! - [`Fitness`]: fitness values (`f64` or `i32`), higher is better
//! - [`FitnessFunction`]: maps candidates to fitness via a problem's cost
//! - [`SelectionOperator`]: fills the child buffer from the population
//!
//! # Key Types
//!
//! - [`Population`]: double-buffered population with elitism
//! - [`EaConfig`]: population size, elite count, rates, time limit, seed
//! - [`EaBuilder`]: assembles a [`GenerationalEa`] from its operators
//! - [`GenerationalEa`]: executes the evolutionary loop
//! - [`GeneticAlgorithm`]: bit-vector specialization
//! - [`EaResult`]: run result with statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod elitism;
mod population;
mod runner;
mod selection;
mod types;

pub use config::EaConfig;
pub use population::{CostOf, Population, PopulationState, TrackerOf};
pub use runner::{EaBuilder, EaResult, GenerationalEa, GeneticAlgorithm, StopReason};
pub use selection::{BoltzmannSelection, CoolingSchedule, Selection, SelectionOperator};
pub use types::{Fitness, FitnessFunction, InverseCostFitness, NegativeCostFitness};
