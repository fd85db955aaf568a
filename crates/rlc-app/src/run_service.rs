//! Scenario execution: analysis plus transient solve.

use rlc_circuit::{
    CircuitParameters, DAMPING_TOLERANCES, DampingClass, EigenAnalyzer, EigenResult,
    StateSpaceModel, StateVector,
};
use rlc_core::Tolerances;
use rlc_project::{Scenario, SolverDef};
use rlc_sim::{
    InputSignal, SimError, SimOptions, SimStats, SweepCase, Trajectory, TrajectorySolver,
    run_sweep,
};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Scenario converted into simulator types.
#[derive(Debug, Clone)]
pub struct ResolvedScenario {
    pub name: String,
    pub params: CircuitParameters,
    pub initial_state: StateVector,
    pub t_start: f64,
    pub t_end: f64,
    pub num_points: usize,
    pub input: InputSignal,
    pub options: SimOptions,
    pub tolerances: Tolerances,
}

/// Eigen-analysis of one circuit.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub params: CircuitParameters,
    pub eigen: EigenResult,
    pub damping: DampingClass,
    /// Equilibrium `[v_C, i_L]` the input settles the circuit to; `None` for
    /// inputs without a constant final value.
    pub steady_state: Option<StateVector>,
}

/// Condensed numbers from a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub samples: usize,
    pub final_state: StateVector,
    pub peak_voltage: f64,
    pub final_energy: f64,
    pub stats: SimStats,
}

#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub trajectory: Trajectory,
    pub summary: SimulationSummary,
}

/// Everything the front ends show for one scenario.
///
/// `simulation` carries the integrator's failure message instead of failing
/// the whole report, so analysis results are still available.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub input: InputSignal,
    pub analysis: AnalysisReport,
    pub simulation: Result<SimulationRun, String>,
}

/// One row of a resistance sweep.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub resistance: f64,
    pub damping: DampingClass,
    pub eigen: EigenResult,
    pub summary: Result<SimulationSummary, String>,
}

fn sim_options(solver: Option<&SolverDef>) -> SimOptions {
    let mut opts = SimOptions::default();
    if let Some(def) = solver {
        if let Some(rtol) = def.rtol {
            opts.rtol = rtol;
        }
        if let Some(atol) = def.atol {
            opts.atol = atol;
        }
        if let Some(max_step) = def.max_step {
            opts.max_step = max_step;
        }
        if let Some(max_steps) = def.max_steps {
            opts.max_steps = max_steps;
        }
        opts.first_step = def.first_step;
    }
    opts
}

/// Convert a validated scenario into simulator inputs.
pub fn resolve_scenario(scenario: &Scenario) -> AppResult<ResolvedScenario> {
    let c = &scenario.circuit;
    let params = CircuitParameters::new(c.resistance_ohm, c.inductance_h, c.capacitance_f)?;
    let input = InputSignal::new(
        &scenario.input.kind,
        scenario.input.amplitude,
        scenario.input.frequency,
        scenario.input.phase,
    )?;
    let options = sim_options(scenario.solver.as_ref());
    options.validate()?;

    Ok(ResolvedScenario {
        name: scenario.name.clone(),
        params,
        initial_state: StateVector::new(scenario.initial_state.v_c, scenario.initial_state.i_l),
        t_start: scenario.time.t_start,
        t_end: scenario.time.t_end,
        num_points: scenario.time.num_points,
        input,
        options,
        tolerances: scenario.analysis.unwrap_or(DAMPING_TOLERANCES),
    })
}

/// Eigenvalues, damping class and equilibrium for `params` under `input`.
pub fn analyze(
    params: CircuitParameters,
    input: &InputSignal,
    tol: Tolerances,
) -> AppResult<AnalysisReport> {
    let model = StateSpaceModel::new(params);
    let analyzer = EigenAnalyzer::new(model.a());
    let damping = analyzer.damping_type_with(tol)?;
    Ok(AnalysisReport {
        params,
        eigen: analyzer.result().clone(),
        damping,
        steady_state: input.final_value().and_then(|u| model.steady_state(u)),
    })
}

fn summarize(trajectory: &Trajectory, params: &CircuitParameters) -> AppResult<SimulationSummary> {
    let final_state = *trajectory
        .final_state()
        .ok_or_else(|| AppError::Simulation("trajectory has no samples".to_string()))?;
    let peak_voltage = trajectory
        .peak_voltage()
        .ok_or_else(|| AppError::Simulation("trajectory has no samples".to_string()))?;
    let final_energy = trajectory
        .energy(params)
        .total
        .last()
        .copied()
        .unwrap_or(0.0);
    Ok(SimulationSummary {
        samples: trajectory.len(),
        final_state,
        peak_voltage,
        final_energy,
        stats: trajectory.stats(),
    })
}

/// Run analysis and the transient solve for one scenario.
///
/// Configuration errors fail the call. An integration failure is kept in
/// [`ScenarioReport::simulation`] next to the analysis results.
pub fn run_scenario(scenario: &Scenario) -> AppResult<ScenarioReport> {
    let resolved = resolve_scenario(scenario)?;
    info!(
        scenario = %resolved.name,
        r = resolved.params.resistance(),
        l = resolved.params.inductance(),
        c = resolved.params.capacitance(),
        input = %resolved.input,
        "running scenario"
    );

    let analysis = analyze(resolved.params, &resolved.input, resolved.tolerances)?;
    let model = StateSpaceModel::new(resolved.params);
    let mut solver = TrajectorySolver::new(
        &model,
        resolved.initial_state,
        resolved.t_start,
        resolved.t_end,
        resolved.num_points,
    )?
    .with_options(resolved.options.clone())?;

    let run = solver.run(&resolved.input).map(|_| ());
    let simulation = match run {
        Ok(()) => {
            let trajectory = solver.take_trajectory()?;
            let summary = summarize(&trajectory, &resolved.params)?;
            Ok(SimulationRun {
                trajectory,
                summary,
            })
        }
        Err(e @ SimError::IntegrationFailed { .. }) => {
            warn!(scenario = %resolved.name, error = %e, "simulation failed");
            Err(e.to_string())
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ScenarioReport {
        name: resolved.name,
        input: resolved.input,
        analysis,
        simulation,
    })
}

/// Re-run `scenario` once per resistance value, in parallel.
pub fn sweep_resistance(scenario: &Scenario, resistances: &[f64]) -> AppResult<Vec<SweepRow>> {
    if resistances.is_empty() {
        return Err(AppError::InvalidInput(
            "resistance sweep needs at least one value".to_string(),
        ));
    }
    let resolved = resolve_scenario(scenario)?;
    let base = SweepCase {
        label: resolved.name.clone(),
        params: resolved.params,
        initial_state: resolved.initial_state,
        t_start: resolved.t_start,
        t_end: resolved.t_end,
        num_points: resolved.num_points,
        input: resolved.input,
        options: resolved.options.clone(),
    };
    let cases = resistances
        .iter()
        .map(|&r| base.with_resistance(r))
        .collect::<Result<Vec<_>, _>>()?;

    info!(cases = cases.len(), "running resistance sweep");

    run_sweep(&cases)
        .into_iter()
        .map(|outcome| -> AppResult<SweepRow> {
            let outcome = outcome?;
            let summary = match &outcome.trajectory {
                Ok(trajectory) => Ok(summarize(trajectory, &outcome.params)?),
                Err(e) => Err(e.to_string()),
            };
            Ok(SweepRow {
                resistance: outcome.params.resistance(),
                damping: outcome.damping,
                eigen: outcome.eigen,
                summary,
            })
        })
        .collect()
}
