//! Bias functions for value-biased stochastic sampling.
//!
//! A bias function maps a heuristic value to a non-negative selection
//! weight. Steeper functions concentrate the choice on the best extensions.

use crate::error::SearchError;

/// Maps a heuristic value to a selection weight.
///
/// Implemented for any `Fn(f64) -> f64 + Send + Sync` closure.
pub trait BiasFunction: Send + Sync {
    fn bias(&self, value: f64) -> f64;

    /// Replaces every value with its weight.
    ///
    /// Only the ratios between the weights matter. Implementations may scale
    /// all of them by a common positive factor to stay within `f64` range.
    fn bias_all(&self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = self.bias(*v);
        }
    }
}

impl<Func> BiasFunction for Func
where
    Func: Fn(f64) -> f64 + Send + Sync,
{
    fn bias(&self, value: f64) -> f64 {
        self(value)
    }
}

/// `exp(value / beta)`.
///
/// # Examples
///
/// ```
/// use u_evosearch::ss::{BiasFunction, ExponentialBias};
///
/// let bias = ExponentialBias::new(4.0).unwrap();
/// assert!((bias.bias(8.0) - 2f64.exp()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentialBias {
    beta: f64,
}

impl ExponentialBias {
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] unless `beta` is positive
    /// and finite.
    pub fn new(beta: f64) -> Result<Self, SearchError> {
        if !(beta > 0.0 && beta.is_finite()) {
            return Err(SearchError::invalid_parameter(
                "exponential bias beta",
                "must be positive and finite",
                beta,
            ));
        }
        Ok(Self { beta })
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Default for ExponentialBias {
    fn default() -> Self {
        Self { beta: 1.0 }
    }
}

impl BiasFunction for ExponentialBias {
    fn bias(&self, value: f64) -> f64 {
        (value / self.beta).exp()
    }

    /// Weights relative to the largest value, so large heuristic values
    /// cannot overflow `exp`.
    fn bias_all(&self, values: &mut [f64]) {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let shift = if max.is_finite() { max } else { 0.0 };
        for v in values.iter_mut() {
            *v = ((*v - shift) / self.beta).exp();
        }
    }
}

/// `value ^ exponent`. An exponent of 1 weights by the raw heuristic value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolynomialBias {
    exponent: f64,
}

impl PolynomialBias {
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] unless `exponent` is
    /// positive and finite.
    pub fn new(exponent: f64) -> Result<Self, SearchError> {
        if !(exponent > 0.0 && exponent.is_finite()) {
            return Err(SearchError::invalid_parameter(
                "polynomial bias exponent",
                "must be positive and finite",
                exponent,
            ));
        }
        Ok(Self { exponent })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl BiasFunction for PolynomialBias {
    fn bias(&self, value: f64) -> f64 {
        if self.exponent == 1.0 {
            value
        } else if self.exponent == 2.0 {
            value * value
        } else {
            value.powf(self.exponent)
        }
    }
}
