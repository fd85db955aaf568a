//! Error types for circuit modeling and analysis.

use thiserror::Error;

/// Errors raised while building or analyzing a circuit model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    #[error("Invalid parameter {what} = {value}: must be finite and strictly positive")]
    InvalidParameter { what: &'static str, value: f64 },

    #[error("Eigen analysis not performed: expected 2 eigenvalues, found {found}")]
    NotAnalyzed { found: usize },
}

pub type CircuitResult<T> = Result<T, CircuitError>;

