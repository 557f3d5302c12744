//! Stochastic sampling of constructive heuristics.
//!
//! A [`ConstructiveHeuristic`] builds a solution one element at a time,
//! scoring every possible extension of a [`Partial`] solution. A greedy
//! construction always takes the best-scoring extension; the samplers here
//! randomize that choice and repeat the construction, keeping the best
//! complete solution.
//!
//! # Samplers
//!
//! - [`ValueBiasedStochasticSampling`]: draws an extension with probability
//!   proportional to a [`BiasFunction`] of its heuristic value
//! - [`AcceptanceBandSampling`]: draws uniformly among the extensions whose
//!   value is within a band below the best
//!
//! Both share the construction loop: heuristic values are skipped when one
//! extension remains, and the [`IncrementalEvaluation`] is updated before
//! the partial solution is extended.

mod acceptance_band;
mod bias;
mod sampler;
mod types;
mod vbss;

pub use acceptance_band::{AcceptanceBandSampling, DEFAULT_BETA};
pub use bias::{BiasFunction, ExponentialBias, PolynomialBias};
pub use sampler::{HeuristicCost, HeuristicTracker};
pub use types::{ConstructiveHeuristic, IncrementalEvaluation, Partial, PartialPermutation};
pub use vbss::ValueBiasedStochasticSampling;
