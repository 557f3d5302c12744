//! Random number generation helpers.
//!
//! Every stateful search component owns one [`SearchRng`]. Copies made by
//! `split` draw their seed from the parent's stream, so a seeded run and
//! all of its workers are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The generator type owned by populations, algorithms and samplers.
pub type SearchRng = StdRng;

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> SearchRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from a random seed when `None`.
pub fn rng_from_option(seed: Option<u64>) -> SearchRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Derives an independent generator for a split copy.
pub fn split_rng(rng: &mut SearchRng) -> SearchRng {
    create_rng(rng.random())
}

/// Index of the first cumulative weight strictly greater than `u`.
///
/// `cumulative` must be non-decreasing and non-empty. Values of `u` at or
/// past the last weight map to the last index.
pub(crate) fn cumulative_index(cumulative: &[f64], u: f64) -> usize {
    cumulative
        .partition_point(|&c| c <= u)
        .min(cumulative.len().saturating_sub(1))
}
