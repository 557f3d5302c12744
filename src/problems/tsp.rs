use crate::error::SearchError;
use crate::problem::Problem;
use crate::random::create_rng;
use crate::ss::{ConstructiveHeuristic, Partial, PartialPermutation};
use rand::Rng;
use std::sync::Arc;

/// Traveling salesperson problem over an integer distance matrix.
///
/// A candidate is a permutation of the cities. Its cost is the length of
/// the closed tour, including the edge from the last city back to the
/// first. Tour lengths saturate at `i32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspMatrix {
    distances: Vec<Vec<i32>>,
}

impl TspMatrix {
    /// Wraps an explicit distance matrix.
    ///
    /// # Errors
    /// Returns [`SearchError::StructuralMismatch`] if the matrix has fewer
    /// than two rows or is not square.
    pub fn from_matrix(distances: Vec<Vec<i32>>) -> Result<Self, SearchError> {
        let n = distances.len();
        if n < 2 {
            return Err(SearchError::StructuralMismatch(format!(
                "distance matrix must be at least 2 by 2, got {n} rows"
            )));
        }
        if let Some((row, r)) = distances.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(SearchError::StructuralMismatch(format!(
                "distance matrix must be square: row {row} has {} columns, expected {n}",
                r.len()
            )));
        }
        Ok(Self { distances })
    }

    /// Generates a random instance with distances in `1..=max_distance`.
    ///
    /// When `triangle_inequality` is set, every distance is shortened to the
    /// length of the shortest path between its endpoints.
    ///
    /// # Errors
    /// Returns [`SearchError::StructuralMismatch`] for `n < 2` and
    /// [`SearchError::InvalidParameter`] for `max_distance < 1`.
    pub fn random(
        n: usize,
        max_distance: i32,
        symmetric: bool,
        triangle_inequality: bool,
        seed: u64,
    ) -> Result<Self, SearchError> {
        if n < 2 {
            return Err(SearchError::StructuralMismatch(format!(
                "instance must have at least 2 cities, got {n}"
            )));
        }
        if max_distance < 1 {
            return Err(SearchError::invalid_parameter(
                "max_distance",
                "must be at least 1",
                f64::from(max_distance),
            ));
        }
        let mut rng = create_rng(seed);
        let mut d = vec![vec![0; n]; n];
        for i in 0..n {
            let start = if symmetric { i + 1 } else { 0 };
            for j in start..n {
                if i == j {
                    continue;
                }
                d[i][j] = rng.random_range(1..=max_distance);
                if symmetric {
                    d[j][i] = d[i][j];
                }
            }
        }
        if triangle_inequality {
            close_under_shortest_paths(&mut d);
        }
        Ok(Self { distances: d })
    }

    /// Distance from city `i` to city `j`.
    pub fn distance(&self, i: usize, j: usize) -> i32 {
        self.distances[i][j]
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

// Floyd-Warshall; preserves symmetry of a symmetric matrix.
fn close_under_shortest_paths(d: &mut [Vec<i32>]) {
    let n = d.len();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = d[i][k].saturating_add(d[k][j]);
                if through < d[i][j] {
                    d[i][j] = through;
                }
            }
        }
    }
}

impl Problem<Vec<usize>> for TspMatrix {
    type Cost = i32;

    fn cost(&self, tour: &Vec<usize>) -> i32 {
        match (tour.first(), tour.last()) {
            (Some(&first), Some(&last)) => tour
                .windows(2)
                .fold(self.distance(last, first), |total, edge| {
                    total.saturating_add(self.distance(edge[0], edge[1]))
                }),
            _ => 0,
        }
    }

    fn min_cost(&self) -> i32 {
        0
    }
}

/// Constructs tours by preferring the city nearest to the last one placed.
///
/// `h = 1 / (1 + d(last, city))`; every city scores 1 for the first
/// position.
#[derive(Debug, Clone)]
pub struct NearestNeighborHeuristic {
    tsp: Arc<TspMatrix>,
}

impl NearestNeighborHeuristic {
    pub fn new(tsp: Arc<TspMatrix>) -> Self {
        Self { tsp }
    }
}

impl ConstructiveHeuristic<Vec<usize>> for NearestNeighborHeuristic {
    type Problem = Arc<TspMatrix>;
    type Partial = PartialPermutation;
    type Incremental = ();

    fn h(&self, partial: &PartialPermutation, city: usize, _incremental: &()) -> f64 {
        match partial.last() {
            Some(last) => 1.0 / (1.0 + f64::from(self.tsp.distance(last, city))),
            None => 1.0,
        }
    }

    fn create_incremental_evaluation(&self) {}

    fn complete_length(&self) -> usize {
        self.tsp.len()
    }

    fn create_partial(&self, n: usize) -> PartialPermutation {
        PartialPermutation::new(n)
    }

    fn problem(&self) -> &Arc<TspMatrix> {
        &self.tsp
    }
}
