//! Scenario file schema.

use rlc_core::Tolerances;
use serde::{Deserialize, Serialize};

/// A single simulation scenario: one circuit, one input, one time grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub circuit: CircuitDef,
    #[serde(default)]
    pub initial_state: InitialStateDef,
    pub time: TimeDef,
    pub input: InputDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    /// Tolerances for damping classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Tolerances>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CircuitDef {
    pub resistance_ohm: f64,
    pub inductance_h: f64,
    pub capacitance_f: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    #[serde(default)]
    pub v_c: f64,
    #[serde(default)]
    pub i_l: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default)]
    pub t_start: f64,
    pub t_end: f64,
    pub num_points: usize,
}

/// Forcing function. `kind` is kept as text so that an unknown type is
/// reported by validation rather than as a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Hz
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// rad
    #[serde(default)]
    pub phase: f64,
}

fn default_amplitude() -> f64 {
    1.0
}

fn default_frequency() -> f64 {
    1.0
}

/// Integrator overrides; anything left out keeps the solver default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

impl Default for Scenario {
    /// Underdamped step response: R = 1 ohm, L = 1 H, C = 0.1 F driven by a
    /// 10 V step from rest, 500 samples over five seconds.
    fn default() -> Self {
        Self {
            version: crate::validate::LATEST_VERSION,
            name: "Underdamped step response".to_string(),
            circuit: CircuitDef {
                resistance_ohm: 1.0,
                inductance_h: 1.0,
                capacitance_f: 0.1,
            },
            initial_state: InitialStateDef::default(),
            time: TimeDef {
                t_start: 0.0,
                t_end: 5.0,
                num_points: 500,
            },
            input: InputDef {
                kind: "step".to_string(),
                amplitude: 10.0,
                frequency: default_frequency(),
                phase: 0.0,
            },
            solver: None,
            analysis: None,
        }
    }
}
