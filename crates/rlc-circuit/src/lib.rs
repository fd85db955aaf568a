//! Series RLC circuit modeling.
//!
//! Provides:
//! - Physical parameters (R, L, C) with derived frequencies
//! - Continuous-time state-space model `x' = A x + B u` over `x = [v_C, i_L]`
//! - Eigen decomposition of the 2x2 system matrix
//! - Damping classification from the eigenvalue structure

pub mod eigen;
pub mod error;
pub mod params;
pub mod state_space;

pub use eigen::{DAMPING_TOLERANCES, DampingClass, EigenAnalyzer, EigenResult, classify_damping};
pub use error::{CircuitError, CircuitResult};
pub use nalgebra::Complex;
pub use params::CircuitParameters;
pub use state_space::{InputVector, StateSpaceModel, StateVector, SystemMatrix};
