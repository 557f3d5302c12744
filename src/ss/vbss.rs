//! Value-biased stochastic sampling (VBSS).
//!
//! At every construction step the heuristic values of the remaining
//! extensions are passed through a bias function and one extension is drawn
//! with probability proportional to its biased value. A steep bias makes
//! the construction nearly greedy; a flat one makes it nearly uniform.
//!
//! # Reference
//!
//! Bresina (1996), "Heuristic-Biased Stochastic Sampling", *AAAI-96*.
//! Cicirello & Smith (2005), "Enhancing Stochastic Search Performance by
//! Value-Biased Randomization of Heuristics", *Journal of Heuristics* 11(1).

use super::bias::{BiasFunction, ExponentialBias};
use super::sampler::{HeuristicCost, HeuristicTracker, SamplerCore};
use super::types::ConstructiveHeuristic;
use crate::problem::SolutionCostPair;
use crate::random::{cumulative_index, create_rng};
use crate::search::Metaheuristic;
use rand::Rng;
use std::sync::Arc;

/// Stochastic sampler biased by heuristic values.
///
/// # Examples
///
/// ```
/// use u_evosearch::problems::{NearestNeighborHeuristic, TspMatrix};
/// use u_evosearch::ss::ValueBiasedStochasticSampling;
/// use std::sync::Arc;
///
/// let tsp = Arc::new(TspMatrix::random(8, 50, true, false, 3).unwrap());
/// let mut vbss = ValueBiasedStochasticSampling::new(NearestNeighborHeuristic::new(tsp))
///     .with_seed(11);
/// let best = vbss.optimize_samples(20).unwrap();
/// assert_eq!(best.solution().len(), 8);
/// assert_eq!(vbss.total_run_length(), 20);
/// ```
pub struct ValueBiasedStochasticSampling<T, H, B = ExponentialBias>
where
    H: ConstructiveHeuristic<T>,
{
    core: SamplerCore<T, H>,
    bias: B,
}

impl<T, H> ValueBiasedStochasticSampling<T, H, ExponentialBias>
where
    T: Clone,
    H: ConstructiveHeuristic<T>,
{
    /// Creates a sampler with the default bias, `exp(value)`.
    pub fn new(heuristic: H) -> Self {
        Self::with_bias(heuristic, ExponentialBias::default())
    }
}

impl<T, H, B> ValueBiasedStochasticSampling<T, H, B>
where
    T: Clone,
    H: ConstructiveHeuristic<T>,
    B: BiasFunction,
{
    pub fn with_bias(heuristic: H, bias: B) -> Self {
        Self::from_shared(Arc::new(heuristic), bias)
    }

    /// Creates a sampler over a heuristic that other samplers may also use.
    pub fn from_shared(heuristic: Arc<H>, bias: B) -> Self {
        Self {
            core: SamplerCore::new(heuristic),
            bias,
        }
    }

    /// Replaces the sampler's own tracker with a shared one.
    pub fn with_progress_tracker(mut self, tracker: HeuristicTracker<T, H>) -> Self {
        self.core.set_tracker(tracker);
        self
    }

    /// Seeds the sampler's random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(create_rng(seed));
        self
    }

    /// Constructs a single solution.
    pub fn optimize(&mut self) -> Option<SolutionCostPair<T, HeuristicCost<T, H>>> {
        self.optimize_samples(1)
    }

    /// Constructs up to `count` solutions and returns the best of them.
    ///
    /// Returns `None` if the tracker is stopped before sampling starts.
    /// Stops early once the tracker is stopped or holds an optimal solution.
    pub fn optimize_samples(
        &mut self,
        count: usize,
    ) -> Option<SolutionCostPair<T, HeuristicCost<T, H>>> {
        let bias = &self.bias;
        self.core.optimize_samples(count, |values, rng| {
            biased_cumulative(bias, values);
            cumulative_index(values, rng.random::<f64>())
        })
    }

    /// Replaces heuristic values with normalized cumulative biased weights.
    ///
    /// Afterwards `values` is non-decreasing and its last entry is exactly 1.
    /// Weights that overflow to infinity share all of the probability. If the
    /// weights sum to zero or are not numbers, the weights become uniform.
    pub fn adjust_for_bias(&self, values: &mut [f64]) {
        biased_cumulative(&self.bias, values);
    }

    /// Index of the first cumulative weight greater than `u`.
    ///
    /// `u` at or beyond the last weight selects the last index.
    pub fn select(&self, cumulative: &[f64], u: f64) -> usize {
        cumulative_index(cumulative, u)
    }

    pub fn problem(&self) -> &H::Problem {
        self.core.heuristic().problem()
    }

    pub fn heuristic(&self) -> &H {
        self.core.heuristic()
    }

    pub fn bias(&self) -> &B {
        &self.bias
    }

    pub fn progress_tracker(&self) -> &HeuristicTracker<T, H> {
        self.core.tracker()
    }

    pub fn set_progress_tracker(&mut self, tracker: HeuristicTracker<T, H>) {
        self.core.set_tracker(tracker);
    }

    /// Number of solutions constructed by this instance.
    pub fn total_run_length(&self) -> usize {
        self.core.run_length()
    }
}

impl<T, H, B> ValueBiasedStochasticSampling<T, H, B>
where
    T: Clone,
    H: ConstructiveHeuristic<T>,
    B: BiasFunction + Clone,
{
    /// An independent sampler sharing the heuristic and progress tracker.
    pub fn split(&mut self) -> Self {
        Self {
            core: self.core.split(),
            bias: self.bias.clone(),
        }
    }
}

fn biased_cumulative<B: BiasFunction + ?Sized>(bias: &B, values: &mut [f64]) {
    bias.bias_all(values);
    if values.iter().any(|w| *w == f64::INFINITY) {
        // Overflowed weights dominate every finite one.
        for w in values.iter_mut() {
            *w = if *w == f64::INFINITY { 1.0 } else { 0.0 };
        }
    } else {
        let max = values.iter().copied().fold(0.0, f64::max);
        if max > 0.0 && max.is_finite() {
            for w in values.iter_mut() {
                *w /= max;
            }
        }
    }

    let total: f64 = values.iter().sum();
    if total > 0.0 && total.is_finite() {
        let mut acc = 0.0;
        for w in values.iter_mut() {
            acc += *w;
            *w = acc / total;
        }
    } else {
        let k = values.len() as f64;
        for (i, w) in values.iter_mut().enumerate() {
            *w = (i + 1) as f64 / k;
        }
    }
    if let Some(last) = values.last_mut() {
        *last = 1.0;
    }
}

impl<T, H, B> Metaheuristic for ValueBiasedStochasticSampling<T, H, B>
where
    T: Clone + Send + Sync,
    H: ConstructiveHeuristic<T>,
    B: BiasFunction + Clone,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ss::bias::PolynomialBias;
    use crate::ss::sampler::fixtures::*;
    use crate::tracker::ProgressTracker;

    #[test]
    fn test_costs_and_run_lengths() {
        for n in 0..10 {
            let mut vbss = ValueBiasedStochasticSampling::new(int_heuristic(n)).with_seed(n as u64);
            assert_eq!(vbss.total_run_length(), 0);
            let first = vbss.optimize().unwrap();
            assert_eq!(vbss.total_run_length(), 1);
            assert_eq!(first.cost(), expected_cost(n) as i32);
            assert_eq!(vbss.progress_tracker().cost(), expected_cost(n) as i32);
            assert_eq!(first.solution().len(), n);
            let second = vbss.optimize().unwrap();
            assert_eq!(vbss.total_run_length(), 2);
            assert_eq!(second.cost(), expected_cost(n) as i32);

            let tracker = ProgressTracker::shared();
            vbss.set_progress_tracker(Arc::clone(&tracker));
            assert!(Arc::ptr_eq(&tracker, vbss.progress_tracker()));
        }
    }

    #[test]
    fn test_double_costs_multiple_samples() {
        for n in 0..10 {
            let mut vbss = ValueBiasedStochasticSampling::new(double_heuristic(n));
            let best = vbss.optimize_samples(5).unwrap();
            assert_eq!(vbss.total_run_length(), 5);
            assert!((best.cost() - expected_cost(n) as f64).abs() < 1e-10);
            vbss.optimize_samples(2);
            assert_eq!(vbss.total_run_length(), 7);
            assert!((vbss.progress_tracker().cost() - expected_cost(n) as f64).abs() < 1e-10);
        }
    }

    #[test]
    fn test_with_progress_tracker() {
        let tracker = ProgressTracker::shared();
        let mut vbss = ValueBiasedStochasticSampling::new(int_heuristic(5))
            .with_progress_tracker(Arc::clone(&tracker));
        assert!(Arc::ptr_eq(&tracker, vbss.progress_tracker()));
        vbss.optimize();
        assert_eq!(tracker.cost(), expected_cost(5) as i32);
    }

    #[test]
    fn test_split() {
        let mut vbss = ValueBiasedStochasticSampling::new(int_heuristic(6));
        vbss.optimize();
        let mut copy = vbss.split();
        assert_eq!(copy.total_run_length(), 0);
        assert!(Arc::ptr_eq(vbss.progress_tracker(), copy.progress_tracker()));
        assert!(std::ptr::eq(vbss.problem(), copy.problem()));
        let best = copy.optimize().unwrap();
        assert_eq!(best.cost(), expected_cost(6) as i32);
        assert_eq!(copy.total_run_length(), 1);
        assert_eq!(vbss.total_run_length(), 1);
    }

    #[test]
    fn test_stopped_tracker_returns_none() {
        let mut vbss = ValueBiasedStochasticSampling::new(int_heuristic(4));
        vbss.progress_tracker().stop();
        assert!(vbss.optimize_samples(3).is_none());
        assert_eq!(vbss.total_run_length(), 0);
    }

    #[test]
    fn test_adjust_for_bias() {
        let vbss = ValueBiasedStochasticSampling::with_bias(
            int_heuristic(4),
            PolynomialBias::new(1.0).unwrap(),
        );
        for k in 2..8 {
            let mut values = vec![0.0; k];
            let mut w = 1.0;
            for i in 0..k {
                values[k - 1 - i] = w;
                w *= 2.0;
            }
            vbss.adjust_for_bias(&mut values);
            assert_eq!(values[k - 1], 1.0);
            for i in (0..k.saturating_sub(2)).rev() {
                let outer = values[i + 1] - values[i];
                let inner = values[i + 2] - values[i + 1];
                assert!((outer - 2.0 * inner).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_adjust_for_bias_degenerate_total() {
        let vbss = ValueBiasedStochasticSampling::with_bias(int_heuristic(4), |_: f64| 0.0);
        let mut values = vec![3.0, 1.0, 2.0, 5.0];
        vbss.adjust_for_bias(&mut values);
        assert_eq!(values, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_adjust_for_bias_large_values_stay_greedy() {
        let vbss = ValueBiasedStochasticSampling::new(int_heuristic(4));
        for top in [700.0, 1000.0, 1e6] {
            let mut values = vec![top, 0.0, 0.0];
            vbss.adjust_for_bias(&mut values);
            assert!(values[0] > 0.99, "index 0 weight {} for {top}", values[0]);
            assert_eq!(values[2], 1.0);
        }

        let mut values = vec![0.0, 1001.0, 1000.0];
        vbss.adjust_for_bias(&mut values);
        let expected = 1.0 / (1.0 + (-1f64).exp());
        assert!(values[0] < 1e-300);
        assert!((values[1] - expected).abs() < 1e-12);
        assert_eq!(values[2], 1.0);
    }

    #[test]
    fn test_adjust_for_bias_infinite_weights_share_probability() {
        let vbss = ValueBiasedStochasticSampling::with_bias(int_heuristic(4), |v: f64| {
            if v > 1.0 { f64::INFINITY } else { v }
        });
        let mut values = vec![0.5, 2.0, 0.75, 3.0];
        vbss.adjust_for_bias(&mut values);
        assert_eq!(values, vec![0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_select() {
        let vbss = ValueBiasedStochasticSampling::new(int_heuristic(4));
        for k in 2..8 {
            let inc = 1.0 / k as f64;
            let mut cumulative = vec![inc; k];
            for i in 1..k {
                cumulative[i] = cumulative[i - 1] + inc;
            }
            let mut u = 0.0;
            for i in 0..k {
                assert_eq!(vbss.select(&cumulative, u), i);
                u += inc;
            }
            u = inc / 2.0;
            for i in 0..k {
                assert_eq!(vbss.select(&cumulative, u), i);
                u += inc;
            }
            u = 1.0 - 1e-10;
            for i in (0..k).rev() {
                assert_eq!(vbss.select(&cumulative, u), i);
                u -= inc;
            }
        }
    }

    #[test]
    fn test_custom_bias_closure() {
        for n in 0..10 {
            let mut vbss =
                ValueBiasedStochasticSampling::with_bias(int_heuristic(n), |v: f64| v * v);
            let best = vbss.optimize().unwrap();
            assert_eq!(best.cost(), expected_cost(n) as i32);
            assert_eq!(best.solution().len(), n);
            let mut copy = vbss.split();
            assert!(copy.optimize().is_some());
        }
    }

    #[test]
    fn test_polynomial_bias_samples() {
        for n in 0..10 {
            let mut vbss = ValueBiasedStochasticSampling::with_bias(
                double_heuristic(n),
                PolynomialBias::new(2.0).unwrap(),
            );
            let best = vbss.optimize_samples(3).unwrap();
            assert!((best.cost() - expected_cost(n) as f64).abs() < 1e-10);
            assert_eq!(vbss.total_run_length(), 3);
        }
    }

    #[test]
    fn test_steep_bias_is_greedy() {
        let bias = ExponentialBias::new(0.05).unwrap();
        let mut vbss = ValueBiasedStochasticSampling::with_bias(int_heuristic(6), bias).with_seed(5);
        for _ in 0..10 {
            let best = vbss.optimize().unwrap();
            assert_eq!(best.solution(), &vec![4, 2, 0, 5, 3, 1]);
        }
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let mut a = ValueBiasedStochasticSampling::new(int_heuristic(8)).with_seed(42);
        let mut b = ValueBiasedStochasticSampling::new(int_heuristic(8)).with_seed(42);
        for _ in 0..5 {
            assert_eq!(
                a.optimize().unwrap().solution(),
                b.optimize().unwrap().solution()
            );
        }
    }
}
