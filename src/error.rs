//! Error types shared by every search component.
//!
//! All errors are raised at construction time. Misuse at run time (an
//! out-of-range slot index, calling `replace` before `select`) panics at
//! the call site instead, the same way slice indexing does.

/// Broad category of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A numeric parameter is outside its valid range.
    InvalidArgument,
    /// A required collaborator (operator, initializer, ...) was not supplied.
    MissingDependency,
    /// Input data has the wrong shape, e.g. a ragged distance matrix.
    StructuralMismatch,
}

/// Errors reported when building populations, algorithms, samplers and problems.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("PopulationSize: population size must be at least 1. size={size}")]
    PopulationSize { size: usize },

    #[error("EliteCount: elite count must be less than population size. elite_count={elite_count}, population_size={population_size}")]
    EliteCount {
        elite_count: usize,
        population_size: usize,
    },

    #[error("MutationRate: mutation rate must be in [0, 1). rate={rate}")]
    MutationRate { rate: f64 },

    #[error("CrossoverRate: crossover rate must be non-negative. rate={rate}")]
    CrossoverRate { rate: f64 },

    #[error("ProbabilityOutOfRange: {name} must be in [0, 1]. value={value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("AcceptanceBand: acceptance band parameter must be in [0, 1]. beta={beta}")]
    AcceptanceBand { beta: f64 },

    #[error("InvalidParameter: {name} {reason}. value={value}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
        value: f64,
    },

    #[error("TimeLimit: time limit must be positive when set")]
    TimeLimit,

    #[error("MissingDependency: no {0} was supplied")]
    MissingDependency(&'static str),

    #[error("StructuralMismatch: {0}")]
    StructuralMismatch(String),
}

impl SearchError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::MissingDependency(_) => ErrorKind::MissingDependency,
            SearchError::StructuralMismatch(_) => ErrorKind::StructuralMismatch,
            _ => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            name,
            reason,
            value,
        }
    }

    pub(crate) fn probability(name: &'static str, value: f64) -> Self {
        Self::ProbabilityOutOfRange { name, value }
    }
}

/// Checks that `value` lies in the closed unit interval.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64, SearchError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SearchError::probability(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            SearchError::PopulationSize { size: 0 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            SearchError::MissingDependency("initializer").kind(),
            ErrorKind::MissingDependency
        );
        assert_eq!(
            SearchError::StructuralMismatch("ragged".into()).kind(),
            ErrorKind::StructuralMismatch
        );
    }

    #[test]
    fn test_check_probability() {
        assert_eq!(check_probability("p", 0.0), Ok(0.0));
        assert_eq!(check_probability("p", 1.0), Ok(1.0));
        assert!(check_probability("p", -0.01).is_err());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        let err = SearchError::EliteCount {
            elite_count: 10,
            population_size: 10,
        };
        assert!(err.to_string().contains("elite_count=10"));
    }
}
