//! Transient simulation of the series RLC circuit.
//!
//! Provides:
//! - Forcing functions (zero, step, sinusoid)
//! - `TransientModel` seam between the integrator and the circuit equations
//! - Adaptive Dormand-Prince 5(4) integrator with dense output
//! - Sampled trajectories with energy bookkeeping
//! - `TrajectorySolver` with an explicit configured/solved/failed state
//! - Parallel sweeps over independent scenarios

pub mod error;
pub mod integrator;
pub mod model;
pub mod signal;
pub mod sim;
pub mod solver;
pub mod sweep;
pub mod trajectory;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{DenseSegment, DormandPrince54, StepAttempt};
pub use model::{FnModel, ForcedCircuit, TransientModel};
pub use signal::{InputSignal, SignalKind};
pub use sim::{SimOptions, run_sim};
pub use solver::{SolverState, TrajectorySolver};
pub use sweep::{CaseOutcome, SweepCase, run_sweep};
pub use trajectory::{EnergySeries, SimStats, TimeSeries, Trajectory};
