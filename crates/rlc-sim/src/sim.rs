//! Adaptive integration driver and sampled recording.

use rlc_circuit::StateVector;
use rlc_core::Tolerances;
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince54, rms_norm};
use crate::model::TransientModel;
use crate::trajectory::{SimStats, Trajectory};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Relative tolerance of the local error test
    pub rtol: f64,
    /// Absolute tolerance of the local error test
    pub atol: f64,
    /// Upper bound on the internal step (seconds)
    pub max_step: f64,
    /// Initial step (seconds); chosen automatically when `None`
    pub first_step: Option<f64>,
    /// Maximum number of accepted steps (safety limit)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 500_000,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.rtol.is_finite() && self.rtol >= 100.0 * f64::EPSILON) {
            return Err(SimError::InvalidArg {
                what: "rtol must be finite and at least 100 * machine epsilon",
            });
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "atol must be finite and non-negative",
            });
        }
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "max_step must be positive",
            });
        }
        if let Some(h) = self.first_step {
            if !(h.is_finite() && h > 0.0) {
                return Err(SimError::InvalidArg {
                    what: "first_step must be positive",
                });
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    fn tolerances(&self) -> Tolerances {
        Tolerances {
            abs: self.atol,
            rel: self.rtol,
        }
    }
}

/// Integrate `model` from `(t_start, x0)` to `t_end` and sample the solution
/// at `t_eval`.
///
/// `t_eval` must be strictly increasing and lie inside `[t_start, t_end]`.
/// The run is all-or-nothing: any failure returns
/// [`SimError::IntegrationFailed`] and no samples.
pub fn run_sim<M: TransientModel>(
    model: &M,
    x0: StateVector,
    t_start: f64,
    t_end: f64,
    t_eval: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    opts.validate()?;
    if !(t_start.is_finite() && t_end.is_finite() && t_end > t_start) {
        return Err(SimError::InvalidArg {
            what: "time span must be finite with t_end > t_start",
        });
    }
    if t_eval.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SimError::InvalidArg {
            what: "t_eval must be strictly increasing",
        });
    }
    if t_eval
        .first()
        .zip(t_eval.last())
        .is_some_and(|(&a, &b)| a < t_start || b > t_end)
    {
        return Err(SimError::InvalidArg {
            what: "t_eval must lie within [t_start, t_end]",
        });
    }

    debug!(
        t_start,
        t_end,
        samples = t_eval.len(),
        rtol = opts.rtol,
        atol = opts.atol,
        "starting Dormand-Prince integration"
    );

    let result = integrate(model, x0, t_start, t_end, t_eval, opts);
    if let Err(e) = &result {
        warn!(error = %e, "integration failed");
    }
    result
}

fn integrate<M: TransientModel>(
    model: &M,
    x0: StateVector,
    t_start: f64,
    t_end: f64,
    t_eval: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let stepper = DormandPrince54;
    let tol = opts.tolerances();
    let mut stats = SimStats::default();

    if !x0.iter().all(|v| v.is_finite()) {
        return Err(SimError::integration(
            "initial state contains non-finite values",
        ));
    }

    let mut t = t_start;
    let mut x = x0;
    let mut f = model.rhs(t, &x)?;
    stats.rhs_evaluations += 1;
    if !f.iter().all(|v| v.is_finite()) {
        return Err(SimError::integration(format!(
            "non-finite derivative at t = {t}"
        )));
    }

    let mut h = match opts.first_step {
        Some(h) => h.min(t_end - t_start),
        None => {
            stats.rhs_evaluations += 1;
            initial_step(model, t, &x, &f, t_end, opts)?
        }
    };

    let mut t_record = Vec::with_capacity(t_eval.len());
    let mut x_record = Vec::with_capacity(t_eval.len());
    let mut next = 0;
    while next < t_eval.len() && t_eval[next] <= t {
        t_record.push(t_eval[next]);
        x_record.push(x);
        next += 1;
    }

    while t < t_end {
        if stats.accepted_steps >= opts.max_steps {
            return Err(SimError::integration(format!(
                "maximum number of steps ({}) exceeded at t = {t:e} before reaching t_end = {t_end}",
                opts.max_steps
            )));
        }

        let min_step = 10.0 * spacing(t);
        h = h.min(opts.max_step).max(min_step);

        let mut rejected = false;
        let step = loop {
            if h < min_step {
                return Err(SimError::integration(format!(
                    "required step size is less than spacing between numbers at t = {t:e}"
                )));
            }

            let t_new = (t + h).min(t_end);
            let h_try = t_new - t;
            let trial = stepper.attempt(model, t, &x, &f, h_try, tol)?;
            stats.rhs_evaluations += DormandPrince54::EVALS_PER_STEP;

            if !trial.is_finite() {
                return Err(SimError::integration(format!(
                    "non-finite state encountered at t = {t:e}"
                )));
            }

            let err = trial.error_norm;
            if err < 1.0 {
                let mut factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * err.powf(error_exponent()))
                };
                if rejected {
                    factor = factor.min(1.0);
                }
                h = h_try * factor;
                break trial;
            }

            h = h_try * MIN_FACTOR.max(SAFETY * err.powf(error_exponent()));
            rejected = true;
            stats.rejected_steps += 1;
        };

        if next < t_eval.len() && t_eval[next] <= step.t_new {
            let segment = step.dense(t, x);
            while next < t_eval.len() && t_eval[next] <= step.t_new {
                let tq = t_eval[next];
                let xq = if tq == step.t_new {
                    step.x_new
                } else {
                    segment.eval(tq)
                };
                t_record.push(tq);
                x_record.push(xq);
                next += 1;
            }
        }

        t = step.t_new;
        x = step.x_new;
        f = step.f_new;
        stats.accepted_steps += 1;
    }

    debug!(
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        nfev = stats.rhs_evaluations,
        "integration complete"
    );

    Ok(Trajectory::new(t_record, x_record, stats))
}

fn error_exponent() -> f64 {
    -1.0 / (DormandPrince54::ERROR_ESTIMATOR_ORDER as f64 + 1.0)
}

/// Distance from `t` to the next representable float away from zero.
fn spacing(t: f64) -> f64 {
    let a = t.abs();
    if a == 0.0 {
        f64::from_bits(1)
    } else {
        f64::from_bits(a.to_bits() + 1) - a
    }
}

/// Empirical initial step (Hairer, Norsett & Wanner, sec. II.4).
fn initial_step<M: TransientModel>(
    model: &M,
    t0: f64,
    x0: &StateVector,
    f0: &StateVector,
    t_end: f64,
    opts: &SimOptions,
) -> SimResult<f64> {
    let interval = t_end - t0;
    let scale = x0.abs() * opts.rtol + StateVector::repeat(opts.atol);

    let d0 = rms_norm(&x0.component_div(&scale));
    let d1 = rms_norm(&f0.component_div(&scale));
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(interval);

    let x1 = x0 + f0 * h0;
    let f1 = model.rhs(t0 + h0, &x1)?;
    let d2 = rms_norm(&(f1 - f0).component_div(&scale)) / h0;

    let order = DormandPrince54::ERROR_ESTIMATOR_ORDER as f64;
    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (order + 1.0))
    };

    Ok((100.0 * h0).min(h1).min(interval).min(opts.max_step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnModel;
    use rlc_core::linspace;

    fn decay() -> FnModel<impl Fn(f64, &StateVector) -> StateVector> {
        FnModel(|_t: f64, x: &StateVector| -x)
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.rtol, 1e-3);
        assert_eq!(opts.atol, 1e-6);
        assert_eq!(opts.max_step, f64::INFINITY);
        assert_eq!(opts.first_step, None);
        assert_eq!(opts.max_steps, 500_000);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn sim_options_invalid() {
        let bad = [
            SimOptions {
                rtol: 0.0,
                ..SimOptions::default()
            },
            SimOptions {
                atol: -1.0,
                ..SimOptions::default()
            },
            SimOptions {
                max_step: 0.0,
                ..SimOptions::default()
            },
            SimOptions {
                first_step: Some(-1.0),
                ..SimOptions::default()
            },
            SimOptions {
                max_steps: 0,
                ..SimOptions::default()
            },
        ];
        for opts in bad {
            assert!(matches!(opts.validate(), Err(SimError::InvalidArg { .. })));
        }
    }

    #[test]
    fn exponential_decay_accuracy() {
        let t_eval = linspace(0.0, 2.0, 21);
        let opts = SimOptions {
            rtol: 1e-8,
            atol: 1e-10,
            ..SimOptions::default()
        };
        let traj = run_sim(&decay(), StateVector::new(1.0, -3.0), 0.0, 2.0, &t_eval, &opts).unwrap();

        assert_eq!(traj.len(), 21);
        for (t, x) in traj.times().iter().zip(traj.states()) {
            assert!((x[0] - (-t).exp()).abs() < 1e-7, "t={t}");
            assert!((x[1] + 3.0 * (-t).exp()).abs() < 1e-7, "t={t}");
        }
        assert!(traj.stats().accepted_steps > 0);
    }

    #[test]
    fn samples_hit_requested_times_exactly() {
        let t_eval = linspace(1.0, 3.0, 7);
        let traj = run_sim(
            &decay(),
            StateVector::new(1.0, 1.0),
            1.0,
            3.0,
            &t_eval,
            &SimOptions::default(),
        )
        .unwrap();
        assert_eq!(traj.times(), t_eval.as_slice());
        assert_eq!(traj.states()[0], StateVector::new(1.0, 1.0));
    }

    #[test]
    fn max_step_is_respected() {
        let t_eval = linspace(0.0, 1.0, 2);
        let opts = SimOptions {
            max_step: 0.01,
            ..SimOptions::default()
        };
        let traj = run_sim(&decay(), StateVector::new(1.0, 0.0), 0.0, 1.0, &t_eval, &opts).unwrap();
        assert!(traj.stats().accepted_steps >= 100);
    }

    #[test]
    fn step_budget_exhaustion_fails() {
        let t_eval = linspace(0.0, 10.0, 5);
        let opts = SimOptions {
            max_step: 1e-3,
            max_steps: 50,
            ..SimOptions::default()
        };
        let err = run_sim(&decay(), StateVector::new(1.0, 0.0), 0.0, 10.0, &t_eval, &opts)
            .unwrap_err();
        match err {
            SimError::IntegrationFailed { message } => {
                assert!(message.contains("maximum number of steps"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_finite_initial_state_fails() {
        let t_eval = linspace(0.0, 1.0, 3);
        let err = run_sim(
            &decay(),
            StateVector::new(f64::NAN, 0.0),
            0.0,
            1.0,
            &t_eval,
            &SimOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::IntegrationFailed { .. }));
    }

    #[test]
    fn blow_up_is_reported_not_returned() {
        // x' = x^2 escapes to infinity at t = 1
        let model = FnModel(|_t: f64, x: &StateVector| x.component_mul(x));
        let t_eval = linspace(0.0, 2.0, 5);
        let err = run_sim(
            &model,
            StateVector::new(1.0, 0.0),
            0.0,
            2.0,
            &t_eval,
            &SimOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::IntegrationFailed { .. }));
    }

    #[test]
    fn rejects_bad_grids() {
        let opts = SimOptions::default();
        let x0 = StateVector::zeros();
        assert!(run_sim(&decay(), x0, 1.0, 1.0, &[1.0], &opts).is_err());
        assert!(run_sim(&decay(), x0, 0.0, 1.0, &[0.5, 0.2], &opts).is_err());
        assert!(run_sim(&decay(), x0, 0.0, 1.0, &[0.0, 1.5], &opts).is_err());
    }

    #[test]
    fn spacing_is_one_ulp() {
        assert_eq!(spacing(1.0), f64::EPSILON);
        assert!(spacing(0.0) > 0.0);
        assert_eq!(spacing(-2.0), 2.0 * f64::EPSILON);
    }
}
