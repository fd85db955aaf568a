//! Shared application service layer for the RLC tools.
//!
//! Turns scenario files into circuit models, runs the analysis and the
//! transient solve, and condenses the results into reports the CLI prints.

pub mod error;
pub mod run_service;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use run_service::{
    AnalysisReport, ResolvedScenario, ScenarioReport, SimulationRun, SimulationSummary, SweepRow,
    analyze, resolve_scenario, run_scenario, sweep_resistance,
};
pub use scenario_service::{builtin_scenario, load_scenario, save_scenario};
