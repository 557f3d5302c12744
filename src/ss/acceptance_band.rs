//! Acceptance-band sampling.
//!
//! At every construction step the extensions whose heuristic value lies in
//! a band below the best value are accepted, and one of them is chosen
//! uniformly at random. The band threshold is
//! `τ = hMax − (1 − β)·|hMax|`, which is `β·hMax` for non-negative values:
//! `β = 1` accepts only the extensions tied for the maximum, `β = 0` accepts
//! every extension with a non-negative value.

use super::sampler::{HeuristicCost, HeuristicTracker, SamplerCore};
use super::types::ConstructiveHeuristic;
use crate::error::SearchError;
use crate::problem::SolutionCostPair;
use crate::random::create_rng;
use crate::search::Metaheuristic;
use rand::Rng;
use std::sync::Arc;

/// Band parameter used by [`AcceptanceBandSampling::new`].
pub const DEFAULT_BETA: f64 = 0.9;

/// Stochastic sampler choosing uniformly among near-best extensions.
///
/// # Examples
///
/// ```
/// use u_evosearch::problems::{NearestNeighborHeuristic, TspMatrix};
/// use u_evosearch::ss::AcceptanceBandSampling;
/// use std::sync::Arc;
///
/// let tsp = Arc::new(TspMatrix::random(6, 20, true, true, 1).unwrap());
/// let mut sampler =
///     AcceptanceBandSampling::with_beta(NearestNeighborHeuristic::new(tsp), 0.75).unwrap();
/// let best = sampler.optimize_samples(10).unwrap();
/// assert_eq!(best.solution().len(), 6);
/// ```
pub struct AcceptanceBandSampling<T, H>
where
    H: ConstructiveHeuristic<T>,
{
    core: SamplerCore<T, H>,
    beta: f64,
    accepted: Vec<usize>,
}

impl<T, H> AcceptanceBandSampling<T, H>
where
    T: Clone,
    H: ConstructiveHeuristic<T>,
{
    /// Creates a sampler with [`DEFAULT_BETA`].
    pub fn new(heuristic: H) -> Self {
        Self::from_parts(Arc::new(heuristic), DEFAULT_BETA)
    }

    /// # Errors
    /// Returns [`SearchError::AcceptanceBand`] if `beta` is outside `[0, 1]`.
    pub fn with_beta(heuristic: H, beta: f64) -> Result<Self, SearchError> {
        Self::from_shared(Arc::new(heuristic), beta)
    }

    /// Like [`with_beta`](Self::with_beta) over a shared heuristic.
    pub fn from_shared(heuristic: Arc<H>, beta: f64) -> Result<Self, SearchError> {
        if !(0.0..=1.0).contains(&beta) {
            return Err(SearchError::AcceptanceBand { beta });
        }
        Ok(Self::from_parts(heuristic, beta))
    }

    fn from_parts(heuristic: Arc<H>, beta: f64) -> Self {
        Self {
            core: SamplerCore::new(heuristic),
            beta,
            accepted: Vec::new(),
        }
    }

    pub fn with_progress_tracker(mut self, tracker: HeuristicTracker<T, H>) -> Self {
        self.core.set_tracker(tracker);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(create_rng(seed));
        self
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Constructs a single solution.
    pub fn optimize(&mut self) -> Option<SolutionCostPair<T, HeuristicCost<T, H>>> {
        self.optimize_samples(1)
    }

    /// Constructs up to `count` solutions and returns the best of them.
    ///
    /// Returns `None` if the tracker is stopped before sampling starts.
    pub fn optimize_samples(
        &mut self,
        count: usize,
    ) -> Option<SolutionCostPair<T, HeuristicCost<T, H>>> {
        let beta = self.beta;
        let accepted = &mut self.accepted;
        self.core.optimize_samples(count, |values, rng| {
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            choose_in_band(beta, values, max, accepted, rng)
        })
    }

    /// Chooses an index of `values` uniformly among those in the band.
    ///
    /// `max` is the largest entry of `values`. On return `accepted` holds the
    /// accepted indices in increasing order.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        values: &[f64],
        max: f64,
        accepted: &mut Vec<usize>,
        rng: &mut R,
    ) -> usize {
        choose_in_band(self.beta, values, max, accepted, rng)
    }

    pub fn problem(&self) -> &H::Problem {
        self.core.heuristic().problem()
    }

    pub fn heuristic(&self) -> &H {
        self.core.heuristic()
    }

    pub fn progress_tracker(&self) -> &HeuristicTracker<T, H> {
        self.core.tracker()
    }

    pub fn set_progress_tracker(&mut self, tracker: HeuristicTracker<T, H>) {
        self.core.set_tracker(tracker);
    }

    pub fn total_run_length(&self) -> usize {
        self.core.run_length()
    }

    /// An independent sampler sharing the heuristic and progress tracker.
    pub fn split(&mut self) -> Self {
        Self {
            core: self.core.split(),
            beta: self.beta,
            accepted: Vec::new(),
        }
    }
}

fn choose_in_band<R: Rng + ?Sized>(
    beta: f64,
    values: &[f64],
    max: f64,
    accepted: &mut Vec<usize>,
    rng: &mut R,
) -> usize {
    let threshold = max - (1.0 - beta) * max.abs();
    accepted.clear();
    accepted.extend(
        values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= threshold)
            .map(|(i, _)| i),
    );
    match accepted.len() {
        0 => rng.random_range(0..values.len()),
        1 => accepted[0],
        n => accepted[rng.random_range(0..n)],
    }
}

impl<T, H> Metaheuristic for AcceptanceBandSampling<T, H>
where
    T: Clone + Send + Sync,
    H: ConstructiveHeuristic<T>,
{
    type Solution = T;
    type Cost = HeuristicCost<T, H>;

    fn search(&mut self, budget: usize) -> Option<SolutionCostPair<T, Self::Cost>> {
        self.optimize_samples(budget)
    }

    fn fork(&mut self) -> Self {
        self.split()
    }

    fn tracker(&self) -> &HeuristicTracker<T, H> {
        self.progress_tracker()
    }

    fn run_length(&self) -> usize {
        self.total_run_length()
    }
}
