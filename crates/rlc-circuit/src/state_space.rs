//! Continuous-time state-space representation of the series RLC circuit.

use crate::params::CircuitParameters;
use nalgebra::{Matrix2, Vector2};
use rlc_core::Real;

/// 2x2 system matrix `A`.
pub type SystemMatrix = Matrix2<Real>;
/// 2x1 input matrix `B`.
pub type InputVector = Vector2<Real>;
/// State `[v_C, i_L]`.
pub type StateVector = Vector2<Real>;

/// `x' = A x + B u` for `x = [v_C, i_L]`.
///
/// ```text
/// A = | 0      1/C  |     B = |  0   |
///     | -1/L  -R/L  |         | -1/L |
/// ```
///
/// Both matrices are built once on construction. A different circuit needs a
/// new model.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpaceModel {
    params: CircuitParameters,
    a: SystemMatrix,
    b: InputVector,
}

impl StateSpaceModel {
    pub fn new(params: CircuitParameters) -> Self {
        let (r, l, c) = (params.resistance(), params.inductance(), params.capacitance());
        #[rustfmt::skip]
        let a = SystemMatrix::new(
            0.0,       1.0 / c,
            -1.0 / l,  -r / l,
        );
        let b = InputVector::new(0.0, -1.0 / l);
        Self { params, a, b }
    }

    pub fn params(&self) -> &CircuitParameters {
        &self.params
    }

    pub fn a(&self) -> &SystemMatrix {
        &self.a
    }

    pub fn b(&self) -> &InputVector {
        &self.b
    }

    pub fn trace(&self) -> Real {
        self.a.trace()
    }

    pub fn determinant(&self) -> Real {
        self.a[(0, 0)] * self.a[(1, 1)] - self.a[(0, 1)] * self.a[(1, 0)]
    }

    /// Equilibrium `x_ss = -A^-1 B u` for a constant input `u`.
    ///
    /// With `B = [0, -1/L]` the capacitor settles at `v_C = -u` and the loop
    /// current at zero.
    pub fn steady_state(&self, u: Real) -> Option<StateVector> {
        self.a.try_inverse().map(|inv| -(inv * self.b) * u)
    }

    /// Both eigenvalues strictly in the left half plane (trace < 0, det > 0).
    pub fn is_stable(&self) -> bool {
        self.trace() < 0.0 && self.determinant() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_entries() {
        let params = CircuitParameters::new(3.0, 2.0, 0.5).unwrap();
        let model = StateSpaceModel::new(params);
        let a = model.a();
        assert_eq!(a[(0, 0)], 0.0);
        assert_eq!(a[(0, 1)], 1.0 / 0.5);
        assert_eq!(a[(1, 0)], -1.0 / 2.0);
        assert_eq!(a[(1, 1)], -3.0 / 2.0);
        assert_eq!(*model.b(), InputVector::new(0.0, -0.5));
    }

    #[test]
    fn trace_and_determinant() {
        let params = CircuitParameters::new(1.0, 1.0, 0.1).unwrap();
        let model = StateSpaceModel::new(params);
        assert!((model.trace() + 1.0).abs() < 1e-12);
        assert!((model.determinant() - 10.0).abs() < 1e-12);
        assert!(model.is_stable());
    }

    #[test]
    fn steady_state_for_constant_input() {
        let params = CircuitParameters::new(1.0, 1.0, 0.1).unwrap();
        let model = StateSpaceModel::new(params);
        let x_ss = model.steady_state(10.0).unwrap();
        assert!((x_ss[0] + 10.0).abs() < 1e-9);
        assert!(x_ss[1].abs() < 1e-9);
        // equilibrium: A x + B u = 0
        let residual = model.a() * x_ss + model.b() * 10.0;
        assert!(residual.norm() < 1e-9);
    }

    #[test]
    fn model_keeps_its_parameters() {
        let params = CircuitParameters::new(2.0, 1.0, 1.0).unwrap();
        let model = StateSpaceModel::new(params);
        assert_eq!(*model.params(), params);
    }
}
