//! Multistart search on the rayon thread pool.
//!
//! Each worker is a [`fork`](Metaheuristic::fork) of the original search:
//! it owns its population or construction state and its random number
//! generator, and shares only the progress tracker. Workers stop
//! cooperatively when any of them finds an optimal solution or the tracker
//! is stopped.

use crate::problem::SolutionCostPair;
use crate::search::Metaheuristic;
use rayon::prelude::*;
use tracing::{info, instrument};

/// Runs `workers` forks of `search` in parallel, each for `budget` units.
///
/// Returns the best solution recorded by the shared tracker, which also
/// includes anything found before this call.
///
/// # Examples
///
/// ```
/// use u_evosearch::parallel::run_parallel;
/// use u_evosearch::problems::{NearestNeighborHeuristic, TspMatrix};
/// use u_evosearch::ss::ValueBiasedStochasticSampling;
/// use std::sync::Arc;
///
/// let tsp = Arc::new(TspMatrix::random(10, 100, true, true, 7).unwrap());
/// let mut vbss = ValueBiasedStochasticSampling::new(NearestNeighborHeuristic::new(tsp));
/// let best = run_parallel(&mut vbss, 4, 25).unwrap();
/// assert_eq!(best.cost(), vbss.progress_tracker().cost());
/// ```
#[instrument(level = "debug", skip(search))]
pub fn run_parallel<M: Metaheuristic>(
    search: &mut M,
    workers: usize,
    budget: usize,
) -> Option<SolutionCostPair<M::Solution, M::Cost>> {
    let mut forks: Vec<M> = (0..workers).map(|_| search.fork()).collect();
    forks.par_iter_mut().for_each(|worker| {
        worker.search(budget);
    });
    let run_length: usize = forks.iter().map(Metaheuristic::run_length).sum();
    let tracker = search.tracker();
    info!(
        workers,
        run_length,
        best_cost = tracker.cost_f64(),
        found_best = tracker.did_find_best(),
        "parallel search finished"
    );
    tracker.best()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evo::{EaConfig, GeneticAlgorithm, NegativeCostFitness, Selection};
    use crate::operators::bits::SinglePointCrossover;
    use crate::problem::Problem;
    use crate::problems::{NearestNeighborHeuristic, OneMax, TspMatrix};
    use crate::ss::{AcceptanceBandSampling, ValueBiasedStochasticSampling};
    use std::sync::Arc;

    #[test]
    fn test_parallel_ga_finds_onemax_optimum() {
        let config = EaConfig::default().with_population_size(40).with_seed(3);
        let mut ga = GeneticAlgorithm::new(
            config,
            12,
            0.05,
            NegativeCostFitness::new(OneMax),
            Selection::Tournament(2),
            SinglePointCrossover,
        )
        .unwrap();
        let best = run_parallel(&mut ga, 4, 500).unwrap();
        assert_eq!(best.cost(), 0);
        assert!(ga.progress_tracker().did_find_best());
        assert_eq!(ga.total_run_length(), 0);
    }

    #[test]
    fn test_parallel_samplers_share_tracker() {
        let tsp = Arc::new(TspMatrix::random(9, 50, true, false, 11).unwrap());
        let mut vbss = ValueBiasedStochasticSampling::new(NearestNeighborHeuristic::new(
            Arc::clone(&tsp),
        ))
        .with_seed(1);
        let best = run_parallel(&mut vbss, 3, 20).unwrap();
        assert_eq!(best.cost(), tsp.cost(best.solution()));
        assert_eq!(best.cost(), vbss.progress_tracker().cost());

        let mut band = AcceptanceBandSampling::new(NearestNeighborHeuristic::new(Arc::clone(&tsp)))
            .with_progress_tracker(Arc::clone(vbss.progress_tracker()))
            .with_seed(2);
        let combined = run_parallel(&mut band, 3, 20).unwrap();
        assert!(combined.cost() <= best.cost());
    }

    #[test]
    fn test_stopped_tracker_keeps_previous_best() {
        let tsp = Arc::new(TspMatrix::random(6, 20, true, false, 4).unwrap());
        let mut vbss = ValueBiasedStochasticSampling::new(NearestNeighborHeuristic::new(tsp));
        assert!(run_parallel(&mut vbss, 2, 0).is_none());
        vbss.optimize_samples(3);
        let before = vbss.progress_tracker().best();
        vbss.progress_tracker().stop();
        assert_eq!(run_parallel(&mut vbss, 2, 10), before);
    }
}
