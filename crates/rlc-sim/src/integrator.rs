//! Dormand-Prince 5(4) explicit Runge-Kutta step with dense output.
//!
//! Seven stages, 5th-order propagation, embedded 4th-order error estimate.
//! The last stage is evaluated at the accepted point, so the caller can reuse
//! it as the first stage of the next step (FSAL).
//!
//! Dense output uses the 4th-order continuous extension of Dormand & Prince
//! (Hairer, Norsett & Wanner, sec. II.6).

use rlc_circuit::StateVector;
use rlc_core::Tolerances;

use crate::error::SimResult;
use crate::model::TransientModel;

const STAGES: usize = 6;

const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

#[rustfmt::skip]
const A: [[f64; 5]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0],
];

/// 5th-order propagation weights.
const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Difference between the 5th- and 4th-order solutions, including the FSAL stage.
const E: [f64; STAGES + 1] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

/// Continuous-extension coefficients: row `i` gives the weight of stage `i`
/// as a polynomial in `theta` (powers 1..=4).
#[rustfmt::skip]
const P: [[f64; 4]; STAGES + 1] = [
    [1.0, -8048581381.0 / 2820520608.0, 8663915743.0 / 2820520608.0, -12715105075.0 / 11282082432.0],
    [0.0, 0.0, 0.0, 0.0],
    [0.0, 131558114200.0 / 32700410799.0, -68118460800.0 / 10900136933.0, 87487479700.0 / 32700410799.0],
    [0.0, -1754552775.0 / 470086768.0, 14199869525.0 / 1410260304.0, -10690763975.0 / 1880347072.0],
    [0.0, 127303824393.0 / 49829197408.0, -318862633887.0 / 49829197408.0, 701980252875.0 / 199316789632.0],
    [0.0, -282668133.0 / 205662961.0, 2019193451.0 / 616988883.0, -1453857185.0 / 822651844.0],
    [0.0, 40617522.0 / 29380423.0, -110615467.0 / 29380423.0, 69997945.0 / 29380423.0],
];

/// Dormand-Prince 5(4) stepper.
#[derive(Clone, Copy, Debug, Default)]
pub struct DormandPrince54;

/// Result of a single trial step, accepted or not.
#[derive(Clone, Debug)]
pub struct StepAttempt {
    pub t_new: f64,
    pub x_new: StateVector,
    /// Derivative at `(t_new, x_new)`; first stage of the next step.
    pub f_new: StateVector,
    /// Scaled RMS error; the step is acceptable when this is below 1.
    pub error_norm: f64,
    stages: [StateVector; STAGES + 1],
}

impl DormandPrince54 {
    /// Order of the embedded error estimator, which drives step-size control.
    pub const ERROR_ESTIMATOR_ORDER: usize = 4;
    /// Number of right-hand-side evaluations per attempt (FSAL reuses one).
    pub const EVALS_PER_STEP: usize = STAGES;

    /// Attempt one step of size `h` from `(t, x)` where `f = rhs(t, x)`.
    ///
    /// Error scale per component is `tol.abs + tol.rel * max(|x|, |x_new|)`.
    pub fn attempt<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &StateVector,
        f: &StateVector,
        h: f64,
        tol: Tolerances,
    ) -> SimResult<StepAttempt> {
        let mut k = [StateVector::zeros(); STAGES + 1];
        k[0] = *f;

        for s in 1..STAGES {
            let mut dx = StateVector::zeros();
            for (j, kj) in k.iter().enumerate().take(s) {
                dx += kj * A[s][j];
            }
            k[s] = model.rhs(t + C[s] * h, &(x + dx * h))?;
        }

        let mut incr = StateVector::zeros();
        for (kj, bj) in k.iter().zip(B.iter()) {
            incr += kj * *bj;
        }
        let x_new = x + incr * h;
        let t_new = t + h;
        let f_new = model.rhs(t_new, &x_new)?;
        k[STAGES] = f_new;

        let mut err = StateVector::zeros();
        for (kj, ej) in k.iter().zip(E.iter()) {
            err += kj * *ej;
        }
        err *= h;

        let scale = x.abs().sup(&x_new.abs()) * tol.rel + StateVector::repeat(tol.abs);
        let error_norm = rms_norm(&err.component_div(&scale));

        Ok(StepAttempt {
            t_new,
            x_new,
            f_new,
            error_norm,
            stages: k,
        })
    }
}

impl StepAttempt {
    /// Continuous solution over the step `[t_old, t_new]`.
    pub fn dense(&self, t_old: f64, x_old: StateVector) -> DenseSegment {
        let mut q = [StateVector::zeros(); 4];
        for (ki, pi) in self.stages.iter().zip(P.iter()) {
            for (qj, pij) in q.iter_mut().zip(pi.iter()) {
                *qj += ki * *pij;
            }
        }
        DenseSegment {
            t_old,
            h: self.t_new - t_old,
            x_old,
            q,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x_new.iter().all(|v| v.is_finite())
            && self.f_new.iter().all(|v| v.is_finite())
            && !self.error_norm.is_nan()
    }
}

/// 4th-order interpolant valid on one accepted step.
#[derive(Clone, Debug)]
pub struct DenseSegment {
    t_old: f64,
    h: f64,
    x_old: StateVector,
    q: [StateVector; 4],
}

impl DenseSegment {
    pub fn t_start(&self) -> f64 {
        self.t_old
    }

    pub fn t_end(&self) -> f64 {
        self.t_old + self.h
    }

    pub fn eval(&self, t: f64) -> StateVector {
        let theta = (t - self.t_old) / self.h;
        let mut acc = StateVector::zeros();
        let mut power = theta;
        for qj in &self.q {
            acc += qj * power;
            power *= theta;
        }
        self.x_old + acc * self.h
    }
}

/// Root-mean-square norm, the error measure used for step control.
pub(crate) fn rms_norm(v: &StateVector) -> f64 {
    v.norm() / (v.len() as f64).sqrt()
}
