//! Parallel execution of independent simulation scenarios.
//!
//! Each case runs its own parameters -> model -> analysis -> trajectory
//! pipeline. Nothing mutable is shared between cases, so they run on the
//! rayon pool and come back in input order.

use rayon::prelude::*;
use rlc_circuit::{
    CircuitParameters, DampingClass, EigenAnalyzer, EigenResult, StateSpaceModel, StateVector,
};

use crate::error::SimResult;
use crate::signal::InputSignal;
use crate::sim::SimOptions;
use crate::solver::TrajectorySolver;
use crate::trajectory::Trajectory;

/// One scenario in a sweep.
#[derive(Clone, Debug)]
pub struct SweepCase {
    pub label: String,
    pub params: CircuitParameters,
    pub initial_state: StateVector,
    pub t_start: f64,
    pub t_end: f64,
    pub num_points: usize,
    pub input: InputSignal,
    pub options: SimOptions,
}

impl SweepCase {
    /// Copy of this case with a different resistance.
    pub fn with_resistance(&self, r: f64) -> SimResult<Self> {
        let params =
            CircuitParameters::new(r, self.params.inductance(), self.params.capacitance())?;
        Ok(Self {
            label: format!("R={r}"),
            params,
            ..self.clone()
        })
    }
}

/// Outcome of one case. Analysis results survive a failed integration.
#[derive(Clone, Debug)]
pub struct CaseOutcome {
    pub label: String,
    pub params: CircuitParameters,
    pub eigen: EigenResult,
    pub damping: DampingClass,
    pub trajectory: SimResult<Trajectory>,
}

/// Run every case on the rayon pool. Output order matches `cases`.
pub fn run_sweep(cases: &[SweepCase]) -> Vec<SimResult<CaseOutcome>> {
    cases.par_iter().map(run_case).collect()
}

fn run_case(case: &SweepCase) -> SimResult<CaseOutcome> {
    let model = StateSpaceModel::new(case.params);
    let analyzer = EigenAnalyzer::new(model.a());
    let damping = analyzer.damping_type()?;

    let mut solver = TrajectorySolver::new(
        &model,
        case.initial_state,
        case.t_start,
        case.t_end,
        case.num_points,
    )?
    .with_options(case.options.clone())?;

    let run = solver.run(&case.input).map(|_| ());
    let trajectory = run.and_then(|()| solver.take_trajectory());

    Ok(CaseOutcome {
        label: case.label.clone(),
        params: case.params,
        eigen: analyzer.result().clone(),
        damping,
        trajectory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SweepCase {
        SweepCase {
            label: "base".to_string(),
            params: CircuitParameters::new(1.0, 1.0, 1.0).unwrap(),
            initial_state: StateVector::zeros(),
            t_start: 0.0,
            t_end: 2.0,
            num_points: 21,
            input: InputSignal::step(1.0),
            options: SimOptions::default(),
        }
    }

    #[test]
    fn resistance_sweep_covers_all_regimes_in_order() {
        let b = base();
        let cases: Vec<SweepCase> = [0.5, 2.0, 6.0]
            .iter()
            .map(|&r| b.with_resistance(r).unwrap())
            .collect();

        let outcomes = run_sweep(&cases);
        let damping: Vec<DampingClass> = outcomes
            .iter()
            .map(|o| o.as_ref().unwrap().damping)
            .collect();
        assert_eq!(
            damping,
            vec![
                DampingClass::Underdamped,
                DampingClass::CriticallyDamped,
                DampingClass::Overdamped
            ]
        );
        for (case, outcome) in cases.iter().zip(&outcomes) {
            let outcome = outcome.as_ref().unwrap();
            assert_eq!(outcome.label, case.label);
            assert_eq!(outcome.trajectory.as_ref().unwrap().len(), 21);
        }
    }

    #[test]
    fn failing_case_does_not_affect_others() {
        let good = base();
        let starved = SweepCase {
            label: "starved".to_string(),
            options: SimOptions {
                max_step: 1e-4,
                max_steps: 5,
                ..SimOptions::default()
            },
            ..base()
        };

        let outcomes = run_sweep(&[good, starved]);
        assert!(outcomes[0].as_ref().unwrap().trajectory.is_ok());

        let failed = outcomes[1].as_ref().unwrap();
        assert!(failed.trajectory.is_err());
        // analysis still reported
        assert_eq!(failed.damping, DampingClass::Underdamped);
    }

    #[test]
    fn invalid_resistance_rejected() {
        assert!(base().with_resistance(-1.0).is_err());
    }
}
