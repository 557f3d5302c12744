//! Construction loop shared by the stochastic samplers.

use super::types::{ConstructiveHeuristic, IncrementalEvaluation, Partial};
use crate::problem::{Problem, SolutionCostPair};
use crate::random::{rng_from_option, split_rng, SearchRng};
use crate::tracker::ProgressTracker;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cost type of the problem a heuristic is built for.
pub type HeuristicCost<T, H> =
    <<H as ConstructiveHeuristic<T>>::Problem as Problem<T>>::Cost;

/// Shared tracker type of a sampler built on heuristic `H`.
pub type HeuristicTracker<T, H> = Arc<ProgressTracker<T, HeuristicCost<T, H>>>;

pub(crate) struct SamplerCore<T, H: ConstructiveHeuristic<T>> {
    heuristic: Arc<H>,
    tracker: HeuristicTracker<T, H>,
    rng: SearchRng,
    values: Vec<f64>,
    run_length: usize,
}

impl<T, H> SamplerCore<T, H>
where
    T: Clone,
    H: ConstructiveHeuristic<T>,
{
    pub(crate) fn new(heuristic: Arc<H>) -> Self {
        Self {
            heuristic,
            tracker: ProgressTracker::shared(),
            rng: rng_from_option(None),
            values: Vec::new(),
            run_length: 0,
        }
    }

    pub(crate) fn reseed(&mut self, rng: SearchRng) {
        self.rng = rng;
    }

    pub(crate) fn heuristic(&self) -> &Arc<H> {
        &self.heuristic
    }

    pub(crate) fn tracker(&self) -> &HeuristicTracker<T, H> {
        &self.tracker
    }

    pub(crate) fn set_tracker(&mut self, tracker: HeuristicTracker<T, H>) {
        self.tracker = tracker;
    }

    pub(crate) fn run_length(&self) -> usize {
        self.run_length
    }

    /// A fresh core sharing the heuristic and tracker, with its own rng.
    pub(crate) fn split(&mut self) -> Self {
        Self {
            heuristic: Arc::clone(&self.heuristic),
            tracker: Arc::clone(&self.tracker),
            rng: split_rng(&mut self.rng),
            values: Vec::new(),
            run_length: 0,
        }
    }

    /// Builds one complete solution.
    ///
    /// `choose` receives the heuristic values of the current extensions and
    /// returns the index of the extension to append. It is not called when
    /// a single extension remains.
    fn construct<C>(&mut self, choose: &mut C) -> T
    where
        C: FnMut(&mut [f64], &mut SearchRng) -> usize,
    {
        let heuristic = &*self.heuristic;
        let mut partial = heuristic.create_partial(heuristic.complete_length());
        let mut incremental = heuristic.create_incremental_evaluation();
        while !partial.is_complete() {
            let k = partial.num_extensions();
            let i = if k == 1 {
                0
            } else {
                self.values.clear();
                self.values.extend(
                    (0..k).map(|j| heuristic.h(&partial, partial.extension(j), &incremental)),
                );
                choose(self.values.as_mut_slice(), &mut self.rng)
            };
            let element = partial.extension(i);
            incremental.extend(&partial, element);
            partial.extend(i);
        }
        partial.to_complete()
    }

    /// Generates up to `count` solutions and returns the best of them.
    ///
    /// Returns `None` when the tracker is stopped before the first sample.
    /// Sampling ends early once the tracker is stopped or records a
    /// solution with the problem's minimum cost.
    #[instrument(level = "debug", skip(self, choose))]
    pub(crate) fn optimize_samples<C>(
        &mut self,
        count: usize,
        mut choose: C,
    ) -> Option<SolutionCostPair<T, HeuristicCost<T, H>>>
    where
        C: FnMut(&mut [f64], &mut SearchRng) -> usize,
    {
        if self.tracker.is_stopped() {
            return None;
        }
        let mut best: Option<SolutionCostPair<T, HeuristicCost<T, H>>> = None;
        let mut samples = 0;
        while samples < count && !self.tracker.is_stopped() && !self.tracker.did_find_best() {
            let solution = self.construct(&mut choose);
            let problem = self.heuristic.problem();
            let cost = problem.cost(&solution);
            samples += 1;
            self.run_length += 1;
            let improved = match &best {
                Some(b) => cost < b.cost(),
                None => true,
            };
            if improved {
                self.tracker
                    .update(cost, &solution, problem.is_min_cost(cost));
                best = Some(SolutionCostPair::new(solution, cost));
            }
        }
        debug!(
            samples,
            best_cost = best.as_ref().map(SolutionCostPair::cost_f64),
            "sampling finished"
        );
        best
    }
}
