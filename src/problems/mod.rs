//! Benchmark problems for exercising the search engines.
//!
//! - [`OneMax`]: bit vectors, maximize the number of ones
//! - [`TspMatrix`]: traveling salesperson over a distance matrix, with a
//!   [`NearestNeighborHeuristic`] for the samplers in [`ss`](crate::ss)

mod onemax;
mod tsp;

pub use onemax::OneMax;
pub use tsp::{NearestNeighborHeuristic, TspMatrix};
