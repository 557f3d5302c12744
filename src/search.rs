//! Common interface of the search engines.
//!
//! [`Metaheuristic`] lets generic code (see [`parallel`](crate::parallel))
//! drive an evolutionary algorithm or a stochastic sampler the same way:
//! fork independent workers, run each for a budget, and read the shared
//! tracker.

use crate::problem::{Cost, SolutionCostPair};
use crate::tracker::ProgressTracker;
use std::sync::Arc;

/// A search that can be run for a budget and forked into workers.
///
/// The unit of budget is engine-specific: generations for
/// [`GenerationalEa`](crate::evo::GenerationalEa), complete samples for the
/// samplers in [`ss`](crate::ss).
pub trait Metaheuristic: Sized + Send {
    type Solution: Clone + Send + Sync;
    type Cost: Cost;

    /// Runs for `budget` units and returns the best solution of this run.
    fn search(&mut self, budget: usize) -> Option<SolutionCostPair<Self::Solution, Self::Cost>>;

    /// An independent worker sharing this search's progress tracker.
    fn fork(&mut self) -> Self;

    fn tracker(&self) -> &Arc<ProgressTracker<Self::Solution, Self::Cost>>;

    /// Total budget consumed by this instance.
    fn run_length(&self) -> usize;
}
