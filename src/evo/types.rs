//! Fitness values and the transforms that derive them from costs.
//!
//! Problems report a cost to minimize. Evolutionary selection works the other
//! way round: higher fitness is better. A [`FitnessFunction`] bridges the two.

use crate::error::SearchError;
use crate::problem::{Cost, Problem};
use std::cmp::Ordering;

/// Numeric type of a fitness value.
///
/// Higher fitness is better. Implemented for `f64` and `i32`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the fitness to `f64` for weighting and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Total order used wherever fitness values are ranked.
///
/// Incomparable values (NaN) compare equal.
pub(crate) fn compare<F: Fitness>(a: F, b: F) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Index of the first maximum in `fitnesses`.
pub(crate) fn index_of_max<F: Fitness>(fitnesses: &[F]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &f) in fitnesses.iter().enumerate() {
        match best {
            Some(b) if compare(f, fitnesses[b]) != Ordering::Greater => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Maps candidate solutions to a fitness value.
///
/// Implementations must be pure: the same candidate always yields the same
/// fitness.
pub trait FitnessFunction<T>: Send + Sync {
    type Fitness: Fitness;
    type Problem: Problem<T>;

    fn fitness(&self, candidate: &T) -> Self::Fitness;

    /// The problem whose cost this fitness is derived from.
    fn problem(&self) -> &Self::Problem;
}

/// Fitness equal to the negated cost.
///
/// Keeps the cost flavor: `i32` costs produce `i32` fitness (saturating at
/// `i32::MIN`), `f64` costs produce `f64` fitness.
///
/// # Examples
///
/// ```
/// use u_evosearch::evo::{FitnessFunction, NegativeCostFitness};
/// use u_evosearch::problems::OneMax;
///
/// let f = NegativeCostFitness::new(OneMax);
/// assert_eq!(f.fitness(&vec![true, false, true, false]), -2);
/// ```
#[derive(Debug, Clone)]
pub struct NegativeCostFitness<P> {
    problem: P,
}

impl<P> NegativeCostFitness<P> {
    pub fn new(problem: P) -> Self {
        Self { problem }
    }
}

impl<T, P> FitnessFunction<T> for NegativeCostFitness<P>
where
    P: Problem<T>,
    P::Cost: Fitness,
{
    type Fitness = P::Cost;
    type Problem = P;

    fn fitness(&self, candidate: &T) -> P::Cost {
        self.problem.cost(candidate).negated()
    }

    fn problem(&self) -> &P {
        &self.problem
    }
}

/// Fitness `c / (c + cost - min_cost)`, in `(0, 1]`.
///
/// The optimum maps to 1 and fitness decays toward 0 as cost grows.
/// Requires a problem with a finite [`Problem::min_cost`].
#[derive(Debug, Clone)]
pub struct InverseCostFitness<P> {
    problem: P,
    scale: f64,
    min_cost: f64,
}

impl<P> InverseCostFitness<P> {
    /// Creates the transform with `c = 1`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] if the problem does not
    /// declare a finite minimum cost.
    pub fn new<T>(problem: P) -> Result<Self, SearchError>
    where
        P: Problem<T>,
    {
        Self::with_scale(problem, 1.0)
    }

    /// Creates the transform with a custom positive scale `c`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] if `scale <= 0` or the
    /// problem's minimum cost is not finite.
    pub fn with_scale<T>(problem: P, scale: f64) -> Result<Self, SearchError>
    where
        P: Problem<T>,
    {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(SearchError::invalid_parameter(
                "fitness scale",
                "must be positive and finite",
                scale,
            ));
        }
        let bound = problem.min_cost();
        let min_cost = bound.to_f64();
        if bound == P::Cost::unbounded_min() || !min_cost.is_finite() {
            return Err(SearchError::invalid_parameter(
                "min_cost",
                "must be finite for inverse cost fitness",
                min_cost,
            ));
        }
        Ok(Self {
            problem,
            scale,
            min_cost,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl<T, P: Problem<T>> FitnessFunction<T> for InverseCostFitness<P> {
    type Fitness = f64;
    type Problem = P;

    fn fitness(&self, candidate: &T) -> f64 {
        let cost = self.problem.cost(candidate).to_f64();
        self.scale / (self.scale + cost - self.min_cost)
    }

    fn problem(&self) -> &P {
        &self.problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Distance;

    impl Problem<f64> for Distance {
        type Cost = f64;
        fn cost(&self, x: &f64) -> f64 {
            x.abs()
        }
        fn min_cost(&self) -> f64 {
            0.0
        }
    }

    #[derive(Debug)]
    struct Unbounded;

    impl Problem<i32> for Unbounded {
        type Cost = i32;
        fn cost(&self, x: &i32) -> i32 {
            *x
        }
    }

    #[test]
    fn test_negative_cost_fitness() {
        let f = NegativeCostFitness::new(Distance);
        assert_eq!(f.fitness(&3.5), -3.5);
        assert_eq!(f.fitness(&0.0), 0.0);

        let g = NegativeCostFitness::new(Unbounded);
        assert_eq!(g.fitness(&7), -7);
        assert_eq!(g.fitness(&i32::MIN), i32::MAX);
    }

    #[test]
    fn test_inverse_cost_fitness() {
        let f = InverseCostFitness::new(Distance).unwrap();
        assert!((f.fitness(&0.0) - 1.0).abs() < 1e-12);
        assert!((f.fitness(&1.0) - 0.5).abs() < 1e-12);
        assert!((f.fitness(&3.0) - 0.25).abs() < 1e-12);

        let g = InverseCostFitness::with_scale(Distance, 2.0).unwrap();
        assert!((g.fitness(&2.0) - 0.5).abs() < 1e-12);
        assert_eq!(g.scale(), 2.0);
    }

    #[test]
    fn test_inverse_cost_requires_finite_min() {
        let err = InverseCostFitness::new(Unbounded).unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidParameter {
                name: "min_cost",
                ..
            }
        ));
        assert!(InverseCostFitness::with_scale(Distance, 0.0).is_err());
    }

    #[test]
    fn test_index_of_max_prefers_first() {
        assert_eq!(index_of_max(&[1, 5, 3, 5]), Some(1));
        assert_eq!(index_of_max(&[2.0, 1.0]), Some(0));
        assert_eq!(index_of_max::<i32>(&[]), None);
    }
}
