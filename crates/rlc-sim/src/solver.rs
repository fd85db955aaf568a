//! Trajectory solver: one circuit, one initial state, one sampling grid.

use rlc_circuit::{StateSpaceModel, StateVector};
use rlc_core::linspace;
use tracing::info;

use crate::error::{SimError, SimResult};
use crate::model::ForcedCircuit;
use crate::signal::InputSignal;
use crate::sim::{SimOptions, run_sim};
use crate::trajectory::{TimeSeries, Trajectory};

/// Lifecycle of a [`TrajectorySolver`].
#[derive(Clone, Debug, PartialEq)]
pub enum SolverState {
    /// Constructed, not yet run.
    Configured,
    /// Last run succeeded.
    Solved(Trajectory),
    /// Last run failed with this message.
    Failed(String),
}

/// Integrates `x' = A x + B u(t)` for a fixed model and sampling grid.
///
/// Borrows the model, so any number of solvers can share one set of
/// matrices. Each call to [`run`](Self::run) replaces the stored result.
#[derive(Clone, Debug)]
pub struct TrajectorySolver<'m> {
    model: &'m StateSpaceModel,
    initial_state: StateVector,
    t_start: f64,
    t_end: f64,
    num_points: usize,
    options: SimOptions,
    state: SolverState,
}

impl<'m> TrajectorySolver<'m> {
    /// `initial_state` is `[v_C(t_start), i_L(t_start)]`; results are sampled
    /// at `num_points` evenly spaced times covering `[t_start, t_end]`.
    pub fn new(
        model: &'m StateSpaceModel,
        initial_state: StateVector,
        t_start: f64,
        t_end: f64,
        num_points: usize,
    ) -> SimResult<Self> {
        if !(t_start.is_finite() && t_end.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "time span must be finite",
            });
        }
        if t_end <= t_start {
            return Err(SimError::InvalidArg {
                what: "t_end must be greater than t_start",
            });
        }
        if num_points < 2 {
            return Err(SimError::InvalidArg {
                what: "num_points must be at least 2",
            });
        }
        Ok(Self {
            model,
            initial_state,
            t_start,
            t_end,
            num_points,
            options: SimOptions::default(),
            state: SolverState::Configured,
        })
    }

    pub fn with_options(mut self, options: SimOptions) -> SimResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn sample_times(&self) -> Vec<f64> {
        linspace(self.t_start, self.t_end, self.num_points)
    }

    /// Integrate under `input`. On failure nothing from this run is kept and
    /// the solver moves to [`SolverState::Failed`].
    pub fn run(&mut self, input: &InputSignal) -> SimResult<&Trajectory> {
        let system = ForcedCircuit::new(self.model, input);
        let t_eval = self.sample_times();

        match run_sim(
            &system,
            self.initial_state,
            self.t_start,
            self.t_end,
            &t_eval,
            &self.options,
        ) {
            Ok(trajectory) => {
                let stats = trajectory.stats();
                info!(
                    input = %input,
                    samples = trajectory.len(),
                    steps = stats.accepted_steps,
                    rejected = stats.rejected_steps,
                    "trajectory solved"
                );
                self.state = SolverState::Solved(trajectory);
            }
            Err(e) => {
                self.state = SolverState::Failed(e.to_string());
                return Err(e);
            }
        }
        self.trajectory().ok_or(SimError::NoSolution)
    }

    /// The last successful trajectory, if the solver is in the solved state.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match &self.state {
            SolverState::Solved(trajectory) => Some(trajectory),
            _ => None,
        }
    }

    /// Time, voltage and current columns, if solved.
    pub fn time_series(&self) -> Option<TimeSeries> {
        self.trajectory().map(Trajectory::time_series)
    }

    /// Take ownership of the last solution, returning the solver to the
    /// configured state.
    pub fn take_trajectory(&mut self) -> SimResult<Trajectory> {
        match std::mem::replace(&mut self.state, SolverState::Configured) {
            SolverState::Solved(trajectory) => Ok(trajectory),
            other => {
                self.state = other;
                Err(SimError::NoSolution)
            }
        }
    }
}
