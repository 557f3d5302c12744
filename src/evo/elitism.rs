//! Bounded-heap selection of elites and replacement victims.
//!
//! Both helpers keep at most `k` entries in a [`BinaryHeap`] whose maximum
//! is the entry to evict next, so a pass over `n` fitness values costs
//! O(n log k).

use super::types::{compare, Fitness};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered so that the *weakest* elite is the maximum.
///
/// Lower fitness is weaker; among equal fitness the higher index is weaker,
/// which keeps the earliest of tied members.
struct Elite<F> {
    fitness: F,
    index: usize,
}

impl<F: Fitness> Ord for Elite<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(other.fitness, self.fitness).then(self.index.cmp(&other.index))
    }
}

impl<F: Fitness> PartialOrd for Elite<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Fitness> PartialEq for Elite<F> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Fitness> Eq for Elite<F> {}

/// Heap entry ordered so that the member *least* deserving replacement is
/// the maximum.
///
/// Lower fitness is replaced first; among equal fitness the lower index is
/// replaced first.
struct Victim<F> {
    fitness: F,
    index: usize,
}

impl<F: Fitness> Ord for Victim<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self.fitness, other.fitness).then(self.index.cmp(&other.index))
    }
}

impl<F: Fitness> PartialOrd for Victim<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Fitness> PartialEq for Victim<F> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Fitness> Eq for Victim<F> {}

/// Keeps the `k` smallest entries under `E`'s order, returned ascending.
fn smallest_k<E: Ord>(entries: impl Iterator<Item = E>, k: usize) -> Vec<E> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for entry in entries {
        if heap.len() < k {
            heap.push(entry);
        } else if heap.peek().is_some_and(|top| entry < *top) {
            heap.pop();
            heap.push(entry);
        }
    }
    heap.into_sorted_vec()
}

/// Indices of the `k` fittest members, fittest first.
///
/// Ties in fitness favor the lower index.
pub(crate) fn fittest_indices<F: Fitness>(fitnesses: &[F], k: usize) -> Vec<usize> {
    let entries = fitnesses
        .iter()
        .enumerate()
        .map(|(index, &fitness)| Elite { fitness, index });
    smallest_k(entries, k).into_iter().map(|e| e.index).collect()
}

/// Indices of the `k` least-fit members, least fit first.
///
/// Ties in fitness pick the lower index first.
pub(crate) fn least_fit_indices<F: Fitness>(fitnesses: &[F], k: usize) -> Vec<usize> {
    let entries = fitnesses
        .iter()
        .enumerate()
        .map(|(index, &fitness)| Victim { fitness, index });
    smallest_k(entries, k).into_iter().map(|e| e.index).collect()
}
