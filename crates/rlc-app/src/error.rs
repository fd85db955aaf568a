//! Error types for the rlc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported scenario file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Circuit error: {0}")]
    Circuit(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rlc-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<rlc_project::ProjectError> for AppError {
    fn from(err: rlc_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<rlc_circuit::CircuitError> for AppError {
    fn from(err: rlc_circuit::CircuitError) -> Self {
        AppError::Circuit(err.to_string())
    }
}

impl From<rlc_sim::SimError> for AppError {
    fn from(err: rlc_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
