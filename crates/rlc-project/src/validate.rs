//! Scenario validation logic.

use crate::schema::{Scenario, SolverDef};

pub const LATEST_VERSION: u32 = 1;

/// Input types the simulator understands.
pub const INPUT_KINDS: [&str; 3] = ["zero", "step", "sinusoidal"];

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite and positive"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let c = &scenario.circuit;
    positive("circuit.resistance_ohm", c.resistance_ohm)?;
    positive("circuit.inductance_h", c.inductance_h)?;
    positive("circuit.capacitance_f", c.capacitance_f)?;

    finite("initial_state.v_c", scenario.initial_state.v_c)?;
    finite("initial_state.i_l", scenario.initial_state.i_l)?;

    let time = &scenario.time;
    finite("time.t_start", time.t_start)?;
    finite("time.t_end", time.t_end)?;
    if time.t_end <= time.t_start {
        return Err(invalid(
            "time.t_end",
            time.t_end,
            "must be greater than time.t_start",
        ));
    }
    if time.num_points < 2 {
        return Err(invalid("time.num_points", time.num_points, "must be at least 2"));
    }

    let input = &scenario.input;
    let kind = input.kind.trim().to_ascii_lowercase();
    if !INPUT_KINDS.contains(&kind.as_str()) {
        return Err(invalid(
            "input.type",
            &input.kind,
            "expected one of zero, step, sinusoidal",
        ));
    }
    finite("input.amplitude", input.amplitude)?;
    finite("input.frequency", input.frequency)?;
    finite("input.phase", input.phase)?;

    if let Some(solver) = &scenario.solver {
        validate_solver(solver)?;
    }

    if let Some(tol) = &scenario.analysis {
        if !(tol.abs.is_finite() && tol.abs >= 0.0) {
            return Err(invalid("analysis.abs", tol.abs, "must be finite and non-negative"));
        }
        if !(tol.rel.is_finite() && tol.rel >= 0.0) {
            return Err(invalid("analysis.rel", tol.rel, "must be finite and non-negative"));
        }
    }

    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if let Some(rtol) = solver.rtol {
        positive("solver.rtol", rtol)?;
    }
    if let Some(atol) = solver.atol {
        if !(atol.is_finite() && atol >= 0.0) {
            return Err(invalid("solver.atol", atol, "must be finite and non-negative"));
        }
    }
    if let Some(max_step) = solver.max_step {
        // infinity means unbounded
        if max_step.is_nan() || max_step <= 0.0 {
            return Err(invalid("solver.max_step", max_step, "must be positive"));
        }
    }
    if let Some(first_step) = solver.first_step {
        positive("solver.first_step", first_step)?;
    }
    if solver.max_steps == Some(0) {
        return Err(invalid("solver.max_steps", 0, "must be positive"));
    }
    Ok(())
}
