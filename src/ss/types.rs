//! Partial solutions and the constructive heuristics that extend them.

use crate::problem::Problem;

/// A solution under construction, extended one element at a time.
///
/// Elements are integers in `0..n`. At every step the partial exposes the
/// set of elements that may be appended next (its *extensions*), indexed
/// `0..num_extensions()`. Extending by an index consumes that extension and
/// may reorder the rest.
pub trait Partial<T> {
    /// Converts a complete partial into a solution.
    ///
    /// # Panics
    /// Implementations may panic if the partial is not complete.
    fn to_complete(&self) -> T;

    fn is_complete(&self) -> bool {
        self.num_extensions() == 0
    }

    /// Number of elements placed so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at position `index` of the partial.
    fn get(&self, index: usize) -> usize;

    /// The most recently placed element.
    fn last(&self) -> Option<usize>;

    fn num_extensions(&self) -> usize;

    /// Element of extension `i`, for `i < num_extensions()`.
    fn extension(&self, i: usize) -> usize;

    /// Whether `element` has already been placed.
    fn contains(&self, element: usize) -> bool;

    /// Appends the element of extension `i`.
    fn extend(&mut self, i: usize);
}

const PLACED: usize = usize::MAX;

/// A permutation of `0..n` built front to back.
///
/// Extensions are the elements not yet placed. Removing one is O(1): the
/// last extension moves into the vacated slot.
///
/// # Examples
///
/// ```
/// use u_evosearch::ss::{Partial, PartialPermutation};
///
/// let mut p = PartialPermutation::new(3);
/// assert_eq!(p.num_extensions(), 3);
/// p.extend(0);
/// assert_eq!(p.last(), Some(0));
/// assert_eq!(p.extension(0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialPermutation {
    placed: Vec<usize>,
    remaining: Vec<usize>,
    slot: Vec<usize>,
}

impl PartialPermutation {
    pub fn new(n: usize) -> Self {
        Self {
            placed: Vec::with_capacity(n),
            remaining: (0..n).collect(),
            slot: (0..n).collect(),
        }
    }

    /// Elements placed so far, in order.
    pub fn as_slice(&self) -> &[usize] {
        &self.placed
    }
}

impl Partial<Vec<usize>> for PartialPermutation {
    fn to_complete(&self) -> Vec<usize> {
        assert!(
            self.is_complete(),
            "partial permutation has {} unplaced elements",
            self.remaining.len()
        );
        self.placed.clone()
    }

    fn len(&self) -> usize {
        self.placed.len()
    }

    fn get(&self, index: usize) -> usize {
        self.placed[index]
    }

    fn last(&self) -> Option<usize> {
        self.placed.last().copied()
    }

    fn num_extensions(&self) -> usize {
        self.remaining.len()
    }

    fn extension(&self, i: usize) -> usize {
        self.remaining[i]
    }

    fn contains(&self, element: usize) -> bool {
        self.slot.get(element).is_some_and(|&s| s == PLACED)
    }

    fn extend(&mut self, i: usize) {
        let element = self.remaining.swap_remove(i);
        if let Some(&moved) = self.remaining.get(i) {
            self.slot[moved] = i;
        }
        self.slot[element] = PLACED;
        self.placed.push(element);
    }
}

/// Running state that makes a heuristic cheaper to evaluate.
///
/// The construction loop calls [`extend`](Self::extend) with the partial
/// *before* the element is appended to it. Use `()` when the heuristic needs
/// no such state.
pub trait IncrementalEvaluation<P> {
    fn extend(&mut self, partial: &P, element: usize);
}

impl<P> IncrementalEvaluation<P> for () {
    fn extend(&mut self, _partial: &P, _element: usize) {}
}

/// A problem-specific heuristic guiding solution construction.
///
/// Higher heuristic values mark more promising extensions. Samplers assume
/// values are positive.
pub trait ConstructiveHeuristic<T>: Send + Sync {
    type Problem: Problem<T>;
    type Partial: Partial<T>;
    type Incremental: IncrementalEvaluation<Self::Partial>;

    /// Heuristic value of appending `element` to `partial`.
    fn h(&self, partial: &Self::Partial, element: usize, incremental: &Self::Incremental) -> f64;

    fn create_incremental_evaluation(&self) -> Self::Incremental;

    /// Number of elements in a complete solution.
    fn complete_length(&self) -> usize;

    /// An empty partial solution for `n` elements.
    fn create_partial(&self, n: usize) -> Self::Partial;

    fn problem(&self) -> &Self::Problem;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_permutation_extends_in_order() {
        let mut p = PartialPermutation::new(5);
        assert!(p.is_empty());
        assert_eq!(p.last(), None);
        p.extend(2);
        p.extend(0);
        assert_eq!(p.as_slice(), &[2, 0]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.get(1), 0);
        assert_eq!(p.last(), Some(0));
        assert!(p.contains(2) && p.contains(0));
        assert!(!p.contains(1) && !p.contains(99));

        let mut rest: Vec<usize> = (0..p.num_extensions()).map(|i| p.extension(i)).collect();
        rest.sort_unstable();
        assert_eq!(rest, vec![1, 3, 4]);
    }

    #[test]
    fn test_swap_remove_keeps_slots_consistent() {
        let mut p = PartialPermutation::new(6);
        while !p.is_complete() {
            let last = p.num_extensions() - 1;
            p.extend(last / 2);
            for i in 0..p.num_extensions() {
                assert!(!p.contains(p.extension(i)));
            }
        }
        let mut done = p.to_complete();
        assert_eq!(done.len(), 6);
        done.sort_unstable();
        assert_eq!(done, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_permutation_is_complete() {
        let p = PartialPermutation::new(0);
        assert!(p.is_complete());
        assert_eq!(p.to_complete(), Vec::<usize>::new());
    }

    #[test]
    #[should_panic(expected = "unplaced elements")]
    fn test_incomplete_to_complete_panics() {
        PartialPermutation::new(2).to_complete();
    }
}
