//! Physical circuit parameters and derived frequencies.

use crate::error::{CircuitError, CircuitResult};
use rlc_core::units::{Capacitance, Inductance, Resistance};
use rlc_core::{Real, ensure_positive};

/// Series RLC component values in SI units (ohm, henry, farad).
///
/// All three values are finite and strictly positive; derived quantities are
/// computed on demand and never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircuitParameters {
    r: Real,
    l: Real,
    c: Real,
}

impl CircuitParameters {
    /// Create parameters from raw SI values.
    pub fn new(r: Real, l: Real, c: Real) -> CircuitResult<Self> {
        Ok(Self {
            r: positive(r, "resistance")?,
            l: positive(l, "inductance")?,
            c: positive(c, "capacitance")?,
        })
    }

    /// Create parameters from typed quantities.
    pub fn from_quantities(r: Resistance, l: Inductance, c: Capacitance) -> CircuitResult<Self> {
        Self::new(r.value, l.value, c.value)
    }

    pub fn resistance(&self) -> Real {
        self.r
    }

    pub fn inductance(&self) -> Real {
        self.l
    }

    pub fn capacitance(&self) -> Real {
        self.c
    }

    /// Undamped natural frequency `w0 = sqrt(1 / (L C))` in rad/s.
    pub fn natural_frequency(&self) -> Real {
        (1.0 / (self.l * self.c)).sqrt()
    }

    /// Attenuation rate `alpha = R / (2 L)` in 1/s.
    pub fn alpha_frequency(&self) -> Real {
        self.r / (2.0 * self.l)
    }

    /// Damping ratio `zeta = alpha / w0`.
    pub fn damping_ratio(&self) -> Real {
        self.alpha_frequency() / self.natural_frequency()
    }

    /// Damped oscillation frequency `sqrt(w0^2 - alpha^2)`, only when oscillatory.
    pub fn damped_frequency(&self) -> Option<Real> {
        let w0 = self.natural_frequency();
        let alpha = self.alpha_frequency();
        let wd2 = w0 * w0 - alpha * alpha;
        (wd2 > 0.0).then(|| wd2.sqrt())
    }

    /// Series quality factor `Q = w0 L / R`.
    pub fn quality_factor(&self) -> Real {
        self.natural_frequency() * self.l / self.r
    }
}

fn positive(value: Real, what: &'static str) -> CircuitResult<Real> {
    ensure_positive(value, what).map_err(|_| CircuitError::InvalidParameter { what, value })
}
