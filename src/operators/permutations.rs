//! Operators for permutation candidates (`Vec<usize>` holding `0..n`).
//!
//! These are domain-agnostic: TSP tours, job sequences and any other
//! ordering problem can use them.
//!
//! # Crossover Operators
//!
//! - [`OrderCrossover`] (OX): Davis (1985), preserves relative order
//! - [`PartiallyMatchedCrossover`] (PMX): Goldberg & Lingle (1985), preserves absolute position
//!
//! # Mutation Operators
//!
//! - [`SwapMutation`]: exchange two random positions, O(1)
//! - [`InsertionMutation`]: remove and reinsert at a random position, O(n)
//! - [`ReversalMutation`]: reverse a random segment (2-opt), O(n)
//! - [`ScrambleMutation`]: shuffle a random segment, O(n)
//! - [`BlockInterchangeMutation`]: swap two non-overlapping blocks, O(n)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::{CrossoverOperator, Initializer, MutationOperator, Splittable};
use rand::seq::SliceRandom;
use rand::Rng;

macro_rules! stateless_operator {
    ($($name:ident),* $(,)?) => {
        $(
            impl Splittable for $name {
                fn split(&self) -> Self {
                    *self
                }
            }
        )*
    };
}

stateless_operator!(
    PermutationInitializer,
    SwapMutation,
    InsertionMutation,
    ReversalMutation,
    ScrambleMutation,
    BlockInterchangeMutation,
    OrderCrossover,
    PartiallyMatchedCrossover,
);

/// Creates uniformly random permutations of `0..length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermutationInitializer {
    length: usize,
}

impl PermutationInitializer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Initializer<Vec<usize>> for PermutationInitializer {
    fn create_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..self.length).collect();
        perm.shuffle(rng);
        perm
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Order Crossover (OX).
///
/// # Algorithm (Davis, 1985)
///
/// 1. Select a random segment `[start, end]`
/// 2. Each child keeps its own parent's segment in place
/// 3. Remaining positions are filled with the other parent's elements in
///    their original order, starting after the segment and wrapping around
///
/// # Panics
/// Panics if the parents have different lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderCrossover;

impl CrossoverOperator<Vec<usize>> for OrderCrossover {
    fn cross<R: Rng + ?Sized>(&self, first: &mut Vec<usize>, second: &mut Vec<usize>, rng: &mut R) {
        let n = first.len();
        assert_eq!(n, second.len(), "parents must have equal length");
        if n < 2 {
            return;
        }
        let (start, end) = random_segment(n, rng);
        let child1 = ox_build_child(first, second, start, end);
        let child2 = ox_build_child(second, first, start, end);
        *first = child1;
        *second = child2;
    }
}

/// Build one OX child: copy segment from `template`, fill from `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let val = donor[(end + 1 + offset) % n];
        if !in_segment[val] {
            child[pos] = val;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Partially Matched Crossover (PMX).
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Select a random segment `[start, end]`
/// 2. Each child keeps its own parent's segment in place
/// 3. Elements of the other parent's segment that are missing are placed by
///    following the segment mapping until a free position is reached
/// 4. Remaining positions are copied from the other parent
///
/// # Panics
/// Panics if the parents have different lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartiallyMatchedCrossover;

impl CrossoverOperator<Vec<usize>> for PartiallyMatchedCrossover {
    fn cross<R: Rng + ?Sized>(&self, first: &mut Vec<usize>, second: &mut Vec<usize>, rng: &mut R) {
        let n = first.len();
        assert_eq!(n, second.len(), "parents must have equal length");
        if n < 2 {
            return;
        }
        let (start, end) = random_segment(n, rng);
        let child1 = pmx_build_child(first, second, start, end);
        let child2 = pmx_build_child(second, first, start, end);
        *first = child1;
        *second = child2;
    }
}

/// Build one PMX child: copy segment from `template`, map from `donor`.
fn pmx_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];
    let mut donor_pos = vec![0usize; n];
    for (i, &v) in donor.iter().enumerate() {
        donor_pos[v] = i;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    for i in start..=end {
        let donor_val = donor[i];
        if placed[donor_val] {
            continue;
        }
        let mut pos = i;
        loop {
            let next = donor_pos[template[pos]];
            if next < start || next > end {
                child[next] = donor_val;
                placed[donor_val] = true;
                break;
            }
            pos = next;
        }
    }

    for i in 0..n {
        if child[i] == usize::MAX {
            child[i] = donor[i];
        }
    }

    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Exchanges two distinct random positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapMutation;

impl MutationOperator<Vec<usize>> for SwapMutation {
    fn mutate<R: Rng + ?Sized>(&self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        let (i, j) = distinct_pair(n, rng);
        perm.swap(i, j);
    }
}

/// Removes an element and reinserts it at a different position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionMutation;

impl MutationOperator<Vec<usize>> for InsertionMutation {
    fn mutate<R: Rng + ?Sized>(&self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        let (from, to) = distinct_pair(n, rng);
        if from < to {
            perm[from..=to].rotate_left(1);
        } else {
            perm[to..=from].rotate_right(1);
        }
    }
}

/// Reverses a random segment of length at least two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReversalMutation;

impl MutationOperator<Vec<usize>> for ReversalMutation {
    fn mutate<R: Rng + ?Sized>(&self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        let (i, j) = distinct_pair(n, rng);
        let (start, end) = if i < j { (i, j) } else { (j, i) };
        perm[start..=end].reverse();
    }
}

/// Randomizes the order of a random segment of length at least two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrambleMutation;

impl MutationOperator<Vec<usize>> for ScrambleMutation {
    fn mutate<R: Rng + ?Sized>(&self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        let (i, j) = distinct_pair(n, rng);
        let (start, end) = if i < j { (i, j) } else { (j, i) };
        perm[start..=end].shuffle(rng);
    }
}

/// Swaps two non-overlapping blocks, keeping the order within each block.
///
/// Blocks may have length one, and the elements between them stay in
/// order: `[a | B1 | m | B2 | z]` becomes `[a | B2 | m | B1 | z]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockInterchangeMutation;

impl MutationOperator<Vec<usize>> for BlockInterchangeMutation {
    fn mutate<R: Rng + ?Sized>(&self, perm: &mut Vec<usize>, rng: &mut R) {
        let n = perm.len();
        if n < 2 {
            return;
        }
        let [a, b, c, d] = block_bounds(n, rng);
        swap_blocks(perm, a, b, c, d);
    }
}

/// Picks `a <= b < c <= d` in `0..n`, allowing single-element blocks.
///
/// Four distinct values are drawn from `0..n + 2`; the two values past
/// the end mark a block of length one.
fn block_bounds<R: Rng + ?Sized>(n: usize, rng: &mut R) -> [usize; 4] {
    let mut idx = rand::seq::index::sample(rng, n + 2, 4).into_vec();
    idx.sort_unstable();
    let [i0, i1, i2, i3] = [idx[0], idx[1], idx[2], idx[3]];
    if i3 == n {
        [i0, i0, i1, i2]
    } else if i2 == n {
        [i0, i0, i1, i1]
    } else if i3 == n + 1 {
        [i0, i1, i2, i2]
    } else {
        [i0, i1, i2, i3]
    }
}

/// Swaps blocks `[a..=b]` and `[c..=d]`, where `b < c`.
fn swap_blocks(perm: &mut [usize], a: usize, b: usize, c: usize, d: usize) {
    let first_len = b - a + 1;
    let second_len = d - c + 1;
    let middle_len = c - b - 1;
    let seg = &mut perm[a..=d];
    seg.rotate_left(first_len);
    seg[..middle_len + second_len].rotate_right(second_len);
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pick two distinct indices in `0..n`, `n >= 2`.
fn distinct_pair<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{create_rng, SearchRng};
    use std::collections::HashSet;

    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        if perm.len() != n {
            return false;
        }
        let set: HashSet<usize> = perm.iter().copied().collect();
        set.len() == n && perm.iter().all(|&v| v < n)
    }

    #[test]
    fn test_initializer_produces_permutations() {
        let mut rng = create_rng(42);
        let init = PermutationInitializer::new(12);
        for _ in 0..20 {
            assert!(is_valid_permutation(&init.create_candidate(&mut rng), 12));
        }
    }

    #[test]
    fn test_ox_produces_valid_permutations() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut c1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
            let mut c2 = vec![7, 6, 5, 4, 3, 2, 1, 0];
            OrderCrossover.cross(&mut c1, &mut c2, &mut rng);
            assert!(is_valid_permutation(&c1, 8), "OX child1 not valid: {c1:?}");
            assert!(is_valid_permutation(&c2, 8), "OX child2 not valid: {c2:?}");
        }
    }

    #[test]
    fn test_ox_identical_parents() {
        let mut rng = create_rng(5);
        let p: Vec<usize> = vec![3, 1, 4, 0, 2];
        let (mut c1, mut c2) = (p.clone(), p.clone());
        OrderCrossover.cross(&mut c1, &mut c2, &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_pmx_produces_valid_permutations() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut c1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
            let mut c2 = vec![3, 7, 5, 1, 6, 0, 2, 4];
            PartiallyMatchedCrossover.cross(&mut c1, &mut c2, &mut rng);
            assert!(is_valid_permutation(&c1, 8), "PMX child1 not valid: {c1:?}");
            assert!(is_valid_permutation(&c2, 8), "PMX child2 not valid: {c2:?}");
        }
    }

    #[test]
    fn test_pmx_single_element() {
        let mut rng = create_rng(42);
        let (mut c1, mut c2) = (vec![0], vec![0]);
        PartiallyMatchedCrossover.cross(&mut c1, &mut c2, &mut rng);
        assert_eq!((c1, c2), (vec![0], vec![0]));
    }

    fn assert_preserves<M: MutationOperator<Vec<usize>>>(name: &str, op: M, rng: &mut SearchRng) {
        for _ in 0..100 {
            let mut perm: Vec<usize> = (0..10).collect();
            op.mutate(&mut perm, rng);
            assert!(is_valid_permutation(&perm, 10), "{name} broke {perm:?}");
        }
    }

    #[test]
    fn test_mutations_preserve_permutation() {
        let mut rng = create_rng(42);
        assert_preserves("swap", SwapMutation, &mut rng);
        assert_preserves("insert", InsertionMutation, &mut rng);
        assert_preserves("reverse", ReversalMutation, &mut rng);
        assert_preserves("scramble", ScrambleMutation, &mut rng);
        assert_preserves("block", BlockInterchangeMutation, &mut rng);
    }

    #[test]
    fn test_swap_always_changes() {
        let mut rng = create_rng(1);
        for _ in 0..50 {
            let mut perm: Vec<usize> = (0..5).collect();
            SwapMutation.mutate(&mut perm, &mut rng);
            assert_ne!(perm, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_insertion_always_changes() {
        let mut rng = create_rng(1);
        for _ in 0..50 {
            let mut perm: Vec<usize> = (0..5).collect();
            InsertionMutation.mutate(&mut perm, &mut rng);
            assert_ne!(perm, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_short_permutations_untouched() {
        let mut rng = create_rng(1);
        let mut perm = vec![0];
        SwapMutation.mutate(&mut perm, &mut rng);
        ReversalMutation.mutate(&mut perm, &mut rng);
        BlockInterchangeMutation.mutate(&mut perm, &mut rng);
        assert_eq!(perm, vec![0]);
    }

    #[test]
    fn test_swap_blocks() {
        let mut perm: Vec<usize> = (0..8).collect();
        swap_blocks(&mut perm, 1, 2, 5, 7);
        assert_eq!(perm, vec![0, 5, 6, 7, 3, 4, 1, 2]);

        let mut perm: Vec<usize> = (0..4).collect();
        swap_blocks(&mut perm, 0, 0, 1, 1);
        assert_eq!(perm, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_block_bounds_are_ordered() {
        let mut rng = create_rng(42);
        for n in 2..8 {
            for _ in 0..200 {
                let [a, b, c, d] = block_bounds(n, &mut rng);
                assert!(a <= b && b < c && c <= d && d < n, "{n}: {a} {b} {c} {d}");
            }
        }
    }

    #[test]
    fn test_distinct_pair() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (i, j) = distinct_pair(3, &mut rng);
            assert_ne!(i, j);
            assert!(i < 3 && j < 3);
        }
    }
}
