//! TransientModel trait for pluggable dynamic systems.

use rlc_circuit::{InputVector, StateSpaceModel, StateVector, SystemMatrix};

use crate::error::SimResult;
use crate::signal::InputSignal;

/// Right-hand side of `x' = f(t, x)` over the two-element circuit state.
///
/// Implementations must be pure in `t`: the integrator probes intermediate
/// and repeated times while it searches for an acceptable step.
pub trait TransientModel {
    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &StateVector) -> SimResult<StateVector>;
}

/// Linear circuit under a time-varying input: `A x + B u(t)`.
///
/// Borrows the model matrices and the forcing function so each run owns
/// nothing shared and mutable.
#[derive(Clone, Copy, Debug)]
pub struct ForcedCircuit<'a> {
    a: &'a SystemMatrix,
    b: &'a InputVector,
    input: &'a InputSignal,
}

impl<'a> ForcedCircuit<'a> {
    pub fn new(model: &'a StateSpaceModel, input: &'a InputSignal) -> Self {
        Self {
            a: model.a(),
            b: model.b(),
            input,
        }
    }

    pub fn input(&self) -> &InputSignal {
        self.input
    }
}

impl TransientModel for ForcedCircuit<'_> {
    fn rhs(&self, t: f64, x: &StateVector) -> SimResult<StateVector> {
        Ok(self.a * x + self.b * self.input.value_at(t))
    }
}

/// Adapter for plain closures, mostly for tests and quick experiments.
pub struct FnModel<F>(pub F);

impl<F> TransientModel for FnModel<F>
where
    F: Fn(f64, &StateVector) -> StateVector,
{
    fn rhs(&self, t: f64, x: &StateVector) -> SimResult<StateVector> {
        Ok((self.0)(t, x))
    }
}
