//! Operators for bit-vector candidates (`Vec<bool>`).

use super::{CrossoverOperator, Initializer, MutationOperator, Splittable};
use crate::error::{check_probability, SearchError};
use rand::Rng;

/// Creates uniformly random bit vectors of a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitVectorInitializer {
    length: usize,
}

impl BitVectorInitializer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Splittable for BitVectorInitializer {
    fn split(&self) -> Self {
        *self
    }
}

impl Initializer<Vec<bool>> for BitVectorInitializer {
    fn create_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<bool> {
        (0..self.length).map(|_| rng.random_bool(0.5)).collect()
    }
}

/// Flips each bit independently with probability `rate`.
///
/// # Complexity
/// O(n) per mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitFlipMutation {
    rate: f64,
}

impl BitFlipMutation {
    /// Creates the operator.
    ///
    /// # Errors
    /// Returns [`SearchError::MutationRate`] unless `0 <= rate < 1`.
    pub fn new(rate: f64) -> Result<Self, SearchError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(SearchError::MutationRate { rate });
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Splittable for BitFlipMutation {
    fn split(&self) -> Self {
        *self
    }
}

impl MutationOperator<Vec<bool>> for BitFlipMutation {
    fn mutate<R: Rng + ?Sized>(&self, candidate: &mut Vec<bool>, rng: &mut R) {
        if self.rate <= 0.0 {
            return;
        }
        for bit in candidate.iter_mut() {
            if rng.random_bool(self.rate) {
                *bit = !*bit;
            }
        }
    }
}

/// Exchanges the tails of two bit vectors after a random cut point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinglePointCrossover;

impl Splittable for SinglePointCrossover {
    fn split(&self) -> Self {
        *self
    }
}

impl<G> CrossoverOperator<Vec<G>> for SinglePointCrossover {
    fn cross<R: Rng + ?Sized>(&self, first: &mut Vec<G>, second: &mut Vec<G>, rng: &mut R) {
        let n = first.len().min(second.len());
        if n < 2 {
            return;
        }
        let point = rng.random_range(1..n);
        first[point..n].swap_with_slice(&mut second[point..n]);
    }
}

/// Exchanges each position independently with probability `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformCrossover {
    rate: f64,
}

impl UniformCrossover {
    /// # Errors
    /// Returns [`SearchError::ProbabilityOutOfRange`] unless `0 <= rate <= 1`.
    pub fn new(rate: f64) -> Result<Self, SearchError> {
        Ok(Self {
            rate: check_probability("uniform crossover rate", rate)?,
        })
    }
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self { rate: 0.5 }
    }
}

impl Splittable for UniformCrossover {
    fn split(&self) -> Self {
        *self
    }
}

impl<G> CrossoverOperator<Vec<G>> for UniformCrossover {
    fn cross<R: Rng + ?Sized>(&self, first: &mut Vec<G>, second: &mut Vec<G>, rng: &mut R) {
        for (a, b) in first.iter_mut().zip(second.iter_mut()) {
            if rng.random_bool(self.rate) {
                std::mem::swap(a, b);
            }
        }
    }
}
