//! Optimization problems and the values they produce.
//!
//! A [`Problem`] maps candidate solutions to a cost that search minimizes.
//! Costs come in two flavors, `f64` and `i32`, unified by the [`Cost`]
//! trait so that every engine can be written once.

use std::fmt::Debug;
use std::sync::Arc;

/// Numeric type of a problem's cost.
///
/// Lower cost is better. Implemented for `f64` and `i32`.
pub trait Cost: PartialOrd + Copy + Send + Sync + Debug + 'static {
    /// The largest representable cost, used before anything is recorded.
    fn worst() -> Self;

    /// Default lower bound for problems that do not know their optimum.
    fn unbounded_min() -> Self;

    /// Converts the cost to `f64` for logging and statistics.
    fn to_f64(self) -> f64;

    /// Arithmetic negation, saturating for integer costs.
    fn negated(self) -> Self;
}

impl Cost for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn unbounded_min() -> Self {
        f64::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn negated(self) -> Self {
        -self
    }
}

impl Cost for i32 {
    fn worst() -> Self {
        i32::MAX
    }

    fn unbounded_min() -> Self {
        i32::MIN
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn negated(self) -> Self {
        self.saturating_neg()
    }
}

/// An optimization problem over candidate solutions of type `T`.
///
/// # Implementing
///
/// ```
/// use u_evosearch::Problem;
///
/// struct CountOnes;
///
/// impl Problem<Vec<bool>> for CountOnes {
///     type Cost = i32;
///     fn cost(&self, bits: &Vec<bool>) -> i32 {
///         bits.iter().filter(|&&b| b).count() as i32
///     }
///     fn min_cost(&self) -> i32 {
///         0
///     }
/// }
///
/// assert_eq!(CountOnes.cost(&vec![true, false, true]), 2);
/// assert!(CountOnes.is_min_cost(0));
/// ```
pub trait Problem<T>: Send + Sync {
    /// Cost flavor, `f64` or `i32`.
    type Cost: Cost;

    /// Cost of a candidate; lower is better.
    fn cost(&self, candidate: &T) -> Self::Cost;

    /// The problem's objective value for a candidate.
    ///
    /// Defaults to the cost. Maximization problems return the original
    /// objective here and a transformed one from [`cost`](Problem::cost).
    fn value(&self, candidate: &T) -> Self::Cost {
        self.cost(candidate)
    }

    /// A lower bound on the cost of any candidate.
    fn min_cost(&self) -> Self::Cost {
        Self::Cost::unbounded_min()
    }

    /// Whether `cost` equals the lower bound, i.e. the search can stop.
    fn is_min_cost(&self, cost: Self::Cost) -> bool {
        cost == self.min_cost()
    }
}

impl<T, P: Problem<T> + ?Sized> Problem<T> for Arc<P> {
    type Cost = P::Cost;

    fn cost(&self, candidate: &T) -> Self::Cost {
        (**self).cost(candidate)
    }

    fn value(&self, candidate: &T) -> Self::Cost {
        (**self).value(candidate)
    }

    fn min_cost(&self) -> Self::Cost {
        (**self).min_cost()
    }

    fn is_min_cost(&self, cost: Self::Cost) -> bool {
        (**self).is_min_cost(cost)
    }
}

/// A complete candidate solution together with its cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionCostPair<T, C> {
    solution: T,
    cost: C,
}

impl<T, C: Cost> SolutionCostPair<T, C> {
    pub fn new(solution: T, cost: C) -> Self {
        Self { solution, cost }
    }

    pub fn solution(&self) -> &T {
        &self.solution
    }

    pub fn cost(&self) -> C {
        self.cost
    }

    pub fn cost_f64(&self) -> f64 {
        self.cost.to_f64()
    }

    pub fn into_solution(self) -> T {
        self.solution
    }

    pub fn into_parts(self) -> (T, C) {
        (self.solution, self.cost)
    }

    /// Whether this pair has strictly lower cost than `other`.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.cost < other.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sum;

    impl Problem<Vec<i32>> for Sum {
        type Cost = i32;
        fn cost(&self, c: &Vec<i32>) -> i32 {
            c.iter().sum()
        }
    }

    #[test]
    fn test_default_min_cost_is_unbounded() {
        assert_eq!(Sum.min_cost(), i32::MIN);
        assert!(!Sum.is_min_cost(0));
        assert_eq!(Sum.value(&vec![1, 2]), 3);
    }

    #[test]
    fn test_cost_flavors() {
        assert_eq!(<f64 as Cost>::worst(), f64::INFINITY);
        assert_eq!(<i32 as Cost>::worst(), i32::MAX);
        assert_eq!(7i32.to_f64(), 7.0);
        assert_eq!(i32::MIN.negated(), i32::MAX);
        assert_eq!(2.5f64.negated(), -2.5);
    }

    #[test]
    fn test_shared_problem_delegates() {
        let shared = Arc::new(Sum);
        assert_eq!(shared.cost(&vec![4, 5]), 9);
        assert_eq!(shared.min_cost(), i32::MIN);
    }

    #[test]
    fn test_solution_cost_pair() {
        let a = SolutionCostPair::new(vec![1, 2], 3);
        let b = SolutionCostPair::new(vec![0], 1);
        assert!(b.is_better_than(&a));
        assert!(!a.is_better_than(&a));
        assert_eq!(a.cost_f64(), 3.0);
        assert_eq!(a.solution(), &vec![1, 2]);
        let (s, c) = b.into_parts();
        assert_eq!((s, c), (vec![0], 1));
    }
}
