//! Forcing functions `u(t)` applied to the circuit.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};

/// Supported forcing function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Zero,
    Step,
    Sinusoidal,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Step => "step",
            Self::Sinusoidal => "sinusoidal",
        }
    }
}

impl FromStr for SignalKind {
    type Err = SimError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "step" => Ok(Self::Step),
            "sinusoidal" => Ok(Self::Sinusoidal),
            _ => Err(SimError::UnsupportedSignalType {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar input `u(t)`.
///
/// A closed set of variants evaluated by exhaustive match. Evaluation is pure,
/// so the integrator may probe any `t` in any order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputSignal {
    /// `u(t) = 0`.
    #[default]
    Zero,
    /// Heaviside step: `amplitude` for `t >= 0`, else 0.
    Step { amplitude: f64 },
    /// `amplitude * sin(2 pi frequency t + phase)`, frequency in Hz, phase in rad.
    Sinusoidal {
        amplitude: f64,
        frequency: f64,
        phase: f64,
    },
}

impl InputSignal {
    /// Build a signal from a kind name and its parameters.
    ///
    /// Parameters a kind does not use are ignored. Unknown kinds fail with
    /// [`SimError::UnsupportedSignalType`].
    pub fn new(kind: &str, amplitude: f64, frequency: f64, phase: f64) -> SimResult<Self> {
        let kind: SignalKind = kind.parse()?;
        Self::from_kind(kind, amplitude, frequency, phase)
    }

    pub fn from_kind(kind: SignalKind, amplitude: f64, frequency: f64, phase: f64) -> SimResult<Self> {
        match kind {
            SignalKind::Zero => Ok(Self::Zero),
            SignalKind::Step => {
                finite(amplitude, "amplitude must be finite")?;
                Ok(Self::Step { amplitude })
            }
            SignalKind::Sinusoidal => {
                finite(amplitude, "amplitude must be finite")?;
                finite(frequency, "frequency must be finite")?;
                finite(phase, "phase must be finite")?;
                Ok(Self::Sinusoidal {
                    amplitude,
                    frequency,
                    phase,
                })
            }
        }
    }

    pub fn zero() -> Self {
        Self::Zero
    }

    pub fn step(amplitude: f64) -> Self {
        Self::Step { amplitude }
    }

    pub fn sinusoidal(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self::Sinusoidal {
            amplitude,
            frequency,
            phase,
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            Self::Zero => SignalKind::Zero,
            Self::Step { .. } => SignalKind::Step,
            Self::Sinusoidal { .. } => SignalKind::Sinusoidal,
        }
    }

    pub fn amplitude(&self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Step { amplitude } | Self::Sinusoidal { amplitude, .. } => *amplitude,
        }
    }

    /// Angular frequency in rad/s (zero for non-periodic signals).
    pub fn angular_frequency(&self) -> f64 {
        match self {
            Self::Sinusoidal { frequency, .. } => 2.0 * PI * frequency,
            _ => 0.0,
        }
    }

    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            Self::Zero => 0.0,
            Self::Step { amplitude } => {
                if t >= 0.0 {
                    amplitude
                } else {
                    0.0
                }
            }
            Self::Sinusoidal {
                amplitude,
                frequency,
                phase,
            } => amplitude * (2.0 * PI * frequency * t + phase).sin(),
        }
    }

    /// Long-run constant value of the input, if it has one.
    pub fn final_value(&self) -> Option<f64> {
        match self {
            Self::Zero => Some(0.0),
            Self::Step { amplitude } => Some(*amplitude),
            Self::Sinusoidal { .. } => None,
        }
    }
}

impl fmt::Display for InputSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "Zero Input"),
            Self::Step { amplitude } => write!(f, "Step Response, Amplitude {amplitude} V"),
            Self::Sinusoidal {
                amplitude,
                frequency,
                ..
            } => write!(
                f,
                "Sinusoidal Response, Amplitude {amplitude} V, Frequency {frequency:.2} Hz"
            ),
        }
    }
}

fn finite(v: f64, what: &'static str) -> SimResult<f64> {
    rlc_core::ensure_finite(v, what).map_err(|_| SimError::InvalidArg { what })
}
