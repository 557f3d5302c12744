//! Selection operators for the evolutionary loop.
//!
//! Selection decides which members of the current population are copied
//! into the child buffer. Strategies differ in selection pressure; all of
//! them select with replacement and treat **higher fitness as better**.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"
//! - Goldberg (1990), "A Note on Boltzmann Tournament Selection for Genetic
//!   Algorithms and Population-Oriented Simulated Annealing"

use super::types::{compare, Fitness};
use crate::error::SearchError;
use crate::operators::Splittable;
use crate::random::cumulative_index;
use rand::seq::SliceRandom;
use rand::Rng;

/// Chooses population members to become parents of the next generation.
pub trait SelectionOperator: Splittable {
    /// Fills every slot of `selected` with an index into `fitnesses`.
    ///
    /// # Panics
    /// Implementations panic if `fitnesses` is empty.
    fn select<F: Fitness, R: Rng + ?Sized>(
        &mut self,
        fitnesses: &[F],
        selected: &mut [usize],
        rng: &mut R,
    );

    /// Called once before a run with the number of generations expected.
    fn init(&mut self, _expected_generations: usize) {}
}

/// Stateless selection strategies.
///
/// # Examples
///
/// ```
/// use u_evosearch::evo::{Selection, SelectionOperator};
/// use u_evosearch::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let mut selected = [0usize; 6];
/// Selection::Tournament(2).select(&[1.0, 4.0, 2.0], &mut selected, &mut rng);
/// assert!(selected.iter().all(|&i| i < 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` members at random, keep the fittest.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    ///
    /// # Complexity
    /// O(k) per slot
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Fitness is shifted so the least fit member keeps a tiny positive
    /// weight when any fitness is zero or negative.
    ///
    /// # Complexity
    /// O(n) per generation, O(log n) per slot
    FitnessProportional,

    /// Stochastic universal sampling (Baker 1987).
    ///
    /// Same expected counts as roulette wheel selection with minimal
    /// spread: one random offset, evenly spaced pointers. The result is
    /// shuffled so crossover pairs are not sorted by index.
    ///
    /// # Complexity
    /// O(n + m) per generation
    StochasticUniversal,

    /// Linear rank selection.
    ///
    /// The member of rank `r` (0 = least fit) has weight `r + 1`, so raw
    /// fitness scaling does not matter.
    ///
    /// # Complexity
    /// O(n log n) per generation (sort), O(log n) per slot
    LinearRank,

    /// Truncation selection: uniform among the `k` fittest members.
    Truncation(usize),

    /// Uniform random selection, no pressure.
    Random,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Splittable for Selection {
    fn split(&self) -> Self {
        *self
    }
}

impl SelectionOperator for Selection {
    fn select<F: Fitness, R: Rng + ?Sized>(
        &mut self,
        fitnesses: &[F],
        selected: &mut [usize],
        rng: &mut R,
    ) {
        assert!(!fitnesses.is_empty(), "cannot select from empty population");
        let n = fitnesses.len();

        match *self {
            Selection::Tournament(k) => {
                for slot in selected.iter_mut() {
                    *slot = tournament(fitnesses, k, rng);
                }
            }
            Selection::FitnessProportional => {
                let cumulative = running_sum(shifted_weights(fitnesses));
                roulette(&cumulative, selected, rng);
            }
            Selection::StochasticUniversal => {
                let cumulative = running_sum(shifted_weights(fitnesses));
                stochastic_universal(&cumulative, selected, rng);
            }
            Selection::LinearRank => {
                let cumulative = running_sum(rank_weights(fitnesses));
                roulette(&cumulative, selected, rng);
            }
            Selection::Truncation(k) => {
                let k = k.clamp(1, n);
                let order = order_by_fitness_desc(fitnesses);
                for slot in selected.iter_mut() {
                    *slot = order[rng.random_range(0..k)];
                }
            }
            Selection::Random => {
                for slot in selected.iter_mut() {
                    *slot = rng.random_range(0..n);
                }
            }
        }
    }
}

/// Temperature update applied after each generation of Boltzmann selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T ← alpha · T`, with `0 < alpha < 1`.
    Exponential { alpha: f64 },
    /// `T ← T − rate`, with `rate >= 0`.
    Linear { rate: f64 },
}

impl CoolingSchedule {
    fn next(self, temperature: f64) -> f64 {
        match self {
            CoolingSchedule::Exponential { alpha } => temperature * alpha,
            CoolingSchedule::Linear { rate } => temperature - rate,
        }
    }
}

/// Fitness-proportionate selection on Boltzmann weights `exp(f / T)`.
///
/// The temperature starts at `t0` when [`init`](SelectionOperator::init)
/// is called and cools once per generation, never dropping below `t_min`.
/// Low temperatures approach greedy selection; high temperatures approach
/// uniform selection.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltzmannSelection {
    t0: f64,
    t_min: f64,
    schedule: CoolingSchedule,
    temperature: f64,
}

impl BoltzmannSelection {
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] unless `t0 > 0`,
    /// `0 < t_min <= t0`, and the schedule's parameter is valid.
    pub fn new(t0: f64, t_min: f64, schedule: CoolingSchedule) -> Result<Self, SearchError> {
        if !(t0 > 0.0 && t0.is_finite()) {
            return Err(SearchError::invalid_parameter(
                "initial temperature",
                "must be positive and finite",
                t0,
            ));
        }
        if !(t_min > 0.0 && t_min <= t0) {
            return Err(SearchError::invalid_parameter(
                "minimum temperature",
                "must be positive and at most the initial temperature",
                t_min,
            ));
        }
        match schedule {
            CoolingSchedule::Exponential { alpha } if !(alpha > 0.0 && alpha < 1.0) => {
                return Err(SearchError::invalid_parameter(
                    "cooling alpha",
                    "must be in (0, 1)",
                    alpha,
                ));
            }
            CoolingSchedule::Linear { rate } if !(rate >= 0.0 && rate.is_finite()) => {
                return Err(SearchError::invalid_parameter(
                    "cooling rate",
                    "must be non-negative and finite",
                    rate,
                ));
            }
            _ => {}
        }
        Ok(Self {
            t0,
            t_min,
            schedule,
            temperature: t0,
        })
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn schedule(&self) -> CoolingSchedule {
        self.schedule
    }
}

impl Splittable for BoltzmannSelection {
    fn split(&self) -> Self {
        self.clone()
    }
}

impl SelectionOperator for BoltzmannSelection {
    fn select<F: Fitness, R: Rng + ?Sized>(
        &mut self,
        fitnesses: &[F],
        selected: &mut [usize],
        rng: &mut R,
    ) {
        assert!(!fitnesses.is_empty(), "cannot select from empty population");

        // Subtracting the maximum keeps exp() in (0, 1].
        let max = fitnesses
            .iter()
            .map(|f| f.to_f64())
            .fold(f64::NEG_INFINITY, f64::max);
        let t = self.temperature;
        let weights = fitnesses
            .iter()
            .map(|f| ((f.to_f64() - max) / t).exp())
            .collect();
        roulette(&running_sum(weights), selected, rng);

        self.temperature = self.schedule.next(t).max(self.t_min);
    }

    fn init(&mut self, _expected_generations: usize) {
        self.temperature = self.t0;
    }
}

/// Tournament of `k` uniformly drawn members; ties keep the earlier draw.
fn tournament<F: Fitness, R: Rng + ?Sized>(fitnesses: &[F], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitnesses.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitnesses[idx] > fitnesses[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// Weights proportional to fitness, shifted to be strictly positive.
fn shifted_weights<F: Fitness>(fitnesses: &[F]) -> Vec<f64> {
    let epsilon = 1e-10;
    let min = fitnesses
        .iter()
        .map(|f| f.to_f64())
        .fold(f64::INFINITY, f64::min);
    let shift = if min > 0.0 { 0.0 } else { epsilon - min };
    fitnesses.iter().map(|f| f.to_f64() + shift).collect()
}

/// Rank `r` (0 = least fit) gets weight `r + 1`.
fn rank_weights<F: Fitness>(fitnesses: &[F]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..fitnesses.len()).collect();
    order.sort_by(|&a, &b| compare(fitnesses[a], fitnesses[b]));
    let mut weights = vec![0.0; fitnesses.len()];
    for (rank, &idx) in order.iter().enumerate() {
        weights[idx] = (rank + 1) as f64;
    }
    weights
}

/// Indices sorted fittest first; ties keep index order.
fn order_by_fitness_desc<F: Fitness>(fitnesses: &[F]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitnesses.len()).collect();
    order.sort_by(|&a, &b| compare(fitnesses[b], fitnesses[a]));
    order
}

fn running_sum(mut weights: Vec<f64>) -> Vec<f64> {
    let mut total = 0.0;
    for w in weights.iter_mut() {
        total += *w;
        *w = total;
    }
    weights
}

fn roulette<R: Rng + ?Sized>(cumulative: &[f64], selected: &mut [usize], rng: &mut R) {
    let n = cumulative.len();
    let total = cumulative[n - 1];
    if !(total > 0.0 && total.is_finite()) {
        for slot in selected.iter_mut() {
            *slot = rng.random_range(0..n);
        }
        return;
    }
    for slot in selected.iter_mut() {
        *slot = cumulative_index(cumulative, rng.random::<f64>() * total);
    }
}

fn stochastic_universal<R: Rng + ?Sized>(
    cumulative: &[f64],
    selected: &mut [usize],
    rng: &mut R,
) {
    let n = cumulative.len();
    let total = cumulative[n - 1];
    if selected.is_empty() || !(total > 0.0 && total.is_finite()) {
        return roulette(cumulative, selected, rng);
    }

    let step = total / selected.len() as f64;
    let start = rng.random::<f64>() * step;
    let mut idx = 0;
    for (i, slot) in selected.iter_mut().enumerate() {
        let pointer = start + i as f64 * step;
        while idx + 1 < n && cumulative[idx] <= pointer {
            idx += 1;
        }
        *slot = idx;
    }
    selected.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn counts<S: SelectionOperator>(op: &mut S, fitnesses: &[f64], draws: usize) -> Vec<u32> {
        let mut rng = create_rng(42);
        let mut selected = vec![0usize; draws];
        op.select(fitnesses, &mut selected, &mut rng);
        let mut counts = vec![0u32; fitnesses.len()];
        for &i in &selected {
            counts[i] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let c = counts(&mut Selection::Tournament(4), &[10.0, 5.0, 1.0, 8.0], 10_000);
        // Index 0 (fitness=10.0) should dominate
        assert!(
            c[0] > 6000,
            "expected best to be selected >60% of the time, got {c:?}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let c = counts(&mut Selection::Tournament(1), &[10.0, 5.0, 1.0, 8.0], 10_000);
        for &x in &c {
            assert!(x > 1500, "expected uniform, got counts: {c:?}");
        }
    }

    #[test]
    fn test_proportional_matches_weights() {
        let c = counts(&mut Selection::FitnessProportional, &[1.0, 3.0], 10_000);
        assert!((2200..2800).contains(&c[0]), "got {c:?}");
    }

    #[test]
    fn test_proportional_handles_negative_fitness() {
        let c = counts(
            &mut Selection::FitnessProportional,
            &[-100.0, -50.0, -1.0, -80.0],
            10_000,
        );
        assert!(c[2] > c[1] && c[1] > c[3] && c[3] >= c[0], "got {c:?}");
    }

    #[test]
    fn test_stochastic_universal_equal_fitness_is_exact() {
        let c = counts(&mut Selection::StochasticUniversal, &[2.0; 5], 10);
        assert_eq!(c, vec![2; 5]);
    }

    #[test]
    fn test_stochastic_universal_expected_counts() {
        // Weights 1:3 over 8 slots give exactly 2 and 6.
        let c = counts(&mut Selection::StochasticUniversal, &[1.0, 3.0], 8);
        assert_eq!(c, vec![2, 6]);
    }

    #[test]
    fn test_rank_favors_best() {
        let c = counts(&mut Selection::LinearRank, &[100.0, 50.0, 1.0, 80.0], 10_000);
        assert!(c[0] > c[3] && c[3] > c[1] && c[1] > c[2], "got {c:?}");
    }

    #[test]
    fn test_truncation_only_picks_top_k() {
        let c = counts(&mut Selection::Truncation(2), &[3.0, 9.0, 1.0, 7.0], 1_000);
        assert_eq!(c[0] + c[2], 0);
        assert!(c[1] > 0 && c[3] > 0);
    }

    #[test]
    fn test_random_covers_all() {
        let c = counts(&mut Selection::Random, &[1.0, 100.0, 1.0], 3_000);
        assert!(c.iter().all(|&x| x > 800), "got {c:?}");
    }

    #[test]
    fn test_integer_fitness() {
        let mut rng = create_rng(1);
        let mut selected = [0usize; 50];
        Selection::Tournament(3).select(&[-3i32, -1, -2], &mut selected, &mut rng);
        assert!(selected.iter().all(|&i| i < 3));
        assert!(selected.contains(&1));
    }

    #[test]
    fn test_single_member() {
        let mut rng = create_rng(42);
        for mut op in [
            Selection::Tournament(3),
            Selection::FitnessProportional,
            Selection::StochasticUniversal,
            Selection::LinearRank,
            Selection::Truncation(5),
            Selection::Random,
        ] {
            let mut selected = [9usize; 4];
            op.select(&[5.0], &mut selected, &mut rng);
            assert_eq!(selected, [0; 4], "{op:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = create_rng(42);
        let mut selected = [0usize; 2];
        Selection::Tournament(3).select::<f64, _>(&[], &mut selected, &mut rng);
    }

    #[test]
    fn test_boltzmann_validation() {
        let exp = CoolingSchedule::Exponential { alpha: 0.9 };
        assert!(BoltzmannSelection::new(10.0, 0.1, exp).is_ok());
        assert!(BoltzmannSelection::new(0.0, 0.1, exp).is_err());
        assert!(BoltzmannSelection::new(1.0, 2.0, exp).is_err());
        assert!(
            BoltzmannSelection::new(1.0, 0.1, CoolingSchedule::Exponential { alpha: 1.0 })
                .is_err()
        );
        assert!(
            BoltzmannSelection::new(1.0, 0.1, CoolingSchedule::Linear { rate: -1.0 }).is_err()
        );
    }

    #[test]
    fn test_boltzmann_cools_to_floor() {
        let mut op =
            BoltzmannSelection::new(1.0, 0.25, CoolingSchedule::Linear { rate: 0.3 }).unwrap();
        let mut rng = create_rng(42);
        let mut selected = [0usize; 4];
        op.select(&[1.0, 2.0], &mut selected, &mut rng);
        assert!((op.temperature() - 0.7).abs() < 1e-12);
        op.select(&[1.0, 2.0], &mut selected, &mut rng);
        op.select(&[1.0, 2.0], &mut selected, &mut rng);
        assert!((op.temperature() - 0.25).abs() < 1e-12);

        op.init(100);
        assert_eq!(op.temperature(), 1.0);
    }

    #[test]
    fn test_boltzmann_low_temperature_is_greedy() {
        let mut op = BoltzmannSelection::new(
            0.01,
            0.01,
            CoolingSchedule::Exponential { alpha: 0.5 },
        )
        .unwrap();
        let c = counts(&mut op, &[1.0, 2.0, 1.5], 1_000);
        assert_eq!(c, vec![0, 1_000, 0]);
    }
}
