use crate::problem::Problem;

/// Maximize the number of one bits.
///
/// Cost is the number of zero bits, so the all-ones vector has cost 0.
/// [`value`](Problem::value) reports the number of one bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneMax;

impl Problem<Vec<bool>> for OneMax {
    type Cost = i32;

    fn cost(&self, bits: &Vec<bool>) -> i32 {
        bits.iter().filter(|&&b| !b).count() as i32
    }

    fn value(&self, bits: &Vec<bool>) -> i32 {
        bits.iter().filter(|&&b| b).count() as i32
    }

    fn min_cost(&self) -> i32 {
        0
    }
}
