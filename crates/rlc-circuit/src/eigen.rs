//! Eigen decomposition of the 2x2 system matrix and damping classification.
//!
//! The eigenvalues come from the characteristic polynomial
//! `lambda^2 - tr(A) lambda + det(A) = 0`, solved with the cancellation-free
//! form of the quadratic formula so that a repeated root stays exactly
//! repeated whenever the discriminant is exactly zero.

use std::fmt;

use nalgebra::{Complex, Vector2};
use rlc_core::{Real, Tolerances, nearly_equal};

use crate::error::{CircuitError, CircuitResult};
use crate::state_space::SystemMatrix;

/// Closeness used to decide "imaginary part is zero" and "real parts coincide".
///
/// `abs = 1e-8`, `rel = 1e-5`. These are numerical-noise thresholds, not
/// physical constants; pass other values through
/// [`EigenAnalyzer::damping_type_with`] when a circuit needs it.
pub const DAMPING_TOLERANCES: Tolerances = Tolerances {
    abs: 1e-8,
    rel: 1e-5,
};

/// Qualitative transient regime of a second-order system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DampingClass {
    /// Complex-conjugate eigenvalues: oscillatory decay.
    Underdamped,
    /// Repeated real eigenvalue: fastest non-oscillatory decay.
    CriticallyDamped,
    /// Distinct real eigenvalues: slow non-oscillatory decay.
    Overdamped,
}

impl DampingClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underdamped => "Underdamped",
            Self::CriticallyDamped => "Critically Damped",
            Self::Overdamped => "Overdamped",
        }
    }
}

impl fmt::Display for DampingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Eigenvalues of `A` and the matching unit-norm eigenvectors.
#[derive(Clone, Debug, PartialEq)]
pub struct EigenResult {
    pub eigenvalues: [Complex<Real>; 2],
    pub eigenvectors: [Vector2<Complex<Real>>; 2],
}

impl EigenResult {
    pub fn sum(&self) -> Complex<Real> {
        self.eigenvalues[0] + self.eigenvalues[1]
    }

    pub fn product(&self) -> Complex<Real> {
        self.eigenvalues[0] * self.eigenvalues[1]
    }

    /// All eigenvalues strictly in the open left half plane.
    pub fn is_stable(&self) -> bool {
        self.eigenvalues.iter().all(|l| l.re < 0.0)
    }

    /// Smallest decay rate `min |Re(lambda)|`; governs settling time.
    pub fn slowest_decay_rate(&self) -> Real {
        self.eigenvalues
            .iter()
            .map(|l| l.re.abs())
            .fold(Real::INFINITY, Real::min)
    }
}

/// Eagerly decomposes a 2x2 real matrix on construction.
#[derive(Clone, Debug)]
pub struct EigenAnalyzer {
    a: SystemMatrix,
    result: EigenResult,
}

impl EigenAnalyzer {
    pub fn new(a: &SystemMatrix) -> Self {
        let trace = a.trace();
        let det = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)];
        let eigenvalues = characteristic_roots(trace, det);
        let eigenvectors = [
            eigenvector(a, eigenvalues[0], 0),
            eigenvector(a, eigenvalues[1], 1),
        ];
        Self {
            a: *a,
            result: EigenResult {
                eigenvalues,
                eigenvectors,
            },
        }
    }

    pub fn matrix(&self) -> &SystemMatrix {
        &self.a
    }

    pub fn eigenvalues(&self) -> &[Complex<Real>; 2] {
        &self.result.eigenvalues
    }

    pub fn eigenvectors(&self) -> &[Vector2<Complex<Real>>; 2] {
        &self.result.eigenvectors
    }

    pub fn result(&self) -> &EigenResult {
        &self.result
    }

    /// Classify with [`DAMPING_TOLERANCES`].
    pub fn damping_type(&self) -> CircuitResult<DampingClass> {
        self.damping_type_with(DAMPING_TOLERANCES)
    }

    pub fn damping_type_with(&self, tol: Tolerances) -> CircuitResult<DampingClass> {
        classify_damping(&self.result.eigenvalues, tol)
    }
}

/// Classify a second-order response from its two eigenvalues.
///
/// Fails with [`CircuitError::NotAnalyzed`] unless exactly two eigenvalues
/// are supplied.
pub fn classify_damping(
    eigenvalues: &[Complex<Real>],
    tol: Tolerances,
) -> CircuitResult<DampingClass> {
    let [l1, l2] = eigenvalues else {
        return Err(CircuitError::NotAnalyzed {
            found: eigenvalues.len(),
        });
    };

    if !nearly_equal(l1.im, 0.0, tol) || !nearly_equal(l2.im, 0.0, tol) {
        return Ok(DampingClass::Underdamped);
    }

    if nearly_equal(l1.re, l2.re, tol) {
        Ok(DampingClass::CriticallyDamped)
    } else {
        Ok(DampingClass::Overdamped)
    }
}

fn characteristic_roots(trace: Real, det: Real) -> [Complex<Real>; 2] {
    let half = 0.5 * trace;
    let disc = half * half - det;

    if disc < 0.0 {
        let w = (-disc).sqrt();
        return [Complex::new(half, w), Complex::new(half, -w)];
    }

    // q carries the larger-magnitude root; the other follows from det = l1 * l2
    let q = half + disc.sqrt().copysign(half);
    if q == 0.0 {
        return [Complex::new(0.0, 0.0); 2];
    }
    [Complex::new(q, 0.0), Complex::new(det / q, 0.0)]
}

/// Unit vector spanning the null space of `A - lambda I`.
fn eigenvector(a: &SystemMatrix, lambda: Complex<Real>, index: usize) -> Vector2<Complex<Real>> {
    let re = |x: Real| Complex::new(x, 0.0);

    // Each row of (A - lambda I) gives an orthogonal candidate; keep the larger.
    let from_row0 = Vector2::new(re(a[(0, 1)]), lambda - re(a[(0, 0)]));
    let from_row1 = Vector2::new(lambda - re(a[(1, 1)]), re(a[(1, 0)]));
    let v = if from_row0.norm() >= from_row1.norm() {
        from_row0
    } else {
        from_row1
    };

    if v.norm() > 0.0 {
        v.normalize()
    } else {
        // A = lambda I: every vector qualifies
        let mut e = Vector2::zeros();
        e[index] = re(1.0);
        e
    }
}
