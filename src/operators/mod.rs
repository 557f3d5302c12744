//! Operator interfaces consumed by the search engines.
//!
//! The engines never inspect candidate solutions. Everything they do to a
//! candidate goes through one of the traits below, which users implement
//! for their own representation.
//!
//! # Core Traits
//!
//! - [`Initializer`]: creates random candidates
//! - [`MutationOperator`]: perturbs one candidate in place
//! - [`CrossoverOperator`]: recombines two candidates in place
//! - [`Splittable`]: produces an independent copy for a parallel worker
//!
//! # Submodules
//!
//! - [`bits`]: operators on `Vec<bool>` bit vectors
//! - [`permutations`]: operators on `Vec<usize>` permutations of `0..n`

pub mod bits;
pub mod permutations;

use rand::Rng;

/// Produces an independent copy of a stateful component.
///
/// A split copy must be safe to use on another thread at the same time as
/// the original. Immutable configuration may be shared; mutable state may not.
pub trait Splittable {
    fn split(&self) -> Self;
}

/// Creates candidate solutions for the initial population.
pub trait Initializer<T>: Splittable {
    fn create_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> T;
}

/// Perturbs a candidate solution in place.
pub trait MutationOperator<T>: Splittable {
    fn mutate<R: Rng + ?Sized>(&self, candidate: &mut T, rng: &mut R);
}

/// Recombines two candidate solutions in place.
///
/// After the call both operands must be valid, complete candidates. No
/// other relationship to the parents is assumed.
pub trait CrossoverOperator<T>: Splittable {
    fn cross<R: Rng + ?Sized>(&self, first: &mut T, second: &mut T, rng: &mut R);
}
