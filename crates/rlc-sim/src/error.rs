//! Error types for simulation operations.

use rlc_circuit::CircuitError;
use thiserror::Error;

/// Errors encountered while configuring or running a transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("'{kind}' not supported: expected one of zero, step, sinusoidal")]
    UnsupportedSignalType { kind: String },

    #[error("Numerical solve failed: {message}")]
    IntegrationFailed { message: String },

    #[error("No solution available")]
    NoSolution,

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn integration(message: impl Into<String>) -> Self {
        SimError::IntegrationFailed {
            message: message.into(),
        }
    }
}
