//! Sampled state trajectories and derived series.

use rlc_circuit::{CircuitParameters, StateVector};

/// Integration effort spent producing a trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evaluations: usize,
}

/// State `[v_C, i_L]` sampled at strictly increasing times.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    t: Vec<f64>,
    x: Vec<StateVector>,
    stats: SimStats,
}

/// Column view of a trajectory: times, capacitor voltage, inductor current.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub v_c: Vec<f64>,
    pub i_l: Vec<f64>,
}

/// Stored energy per sample, in joules.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergySeries {
    /// `C v_C^2 / 2`
    pub capacitor: Vec<f64>,
    /// `L i_L^2 / 2`
    pub inductor: Vec<f64>,
    pub total: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn new(t: Vec<f64>, x: Vec<StateVector>, stats: SimStats) -> Self {
        debug_assert_eq!(t.len(), x.len());
        Self { t, x, stats }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn states(&self) -> &[StateVector] {
        &self.x
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.x.iter().map(|x| x[0]).collect()
    }

    pub fn currents(&self) -> Vec<f64> {
        self.x.iter().map(|x| x[1]).collect()
    }

    pub fn time_series(&self) -> TimeSeries {
        TimeSeries {
            time: self.t.clone(),
            v_c: self.voltages(),
            i_l: self.currents(),
        }
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn final_state(&self) -> Option<&StateVector> {
        self.x.last()
    }

    /// Largest capacitor voltage over the samples (overshoot for a step input).
    pub fn peak_voltage(&self) -> Option<f64> {
        self.x.iter().map(|x| x[0]).reduce(f64::max)
    }

    pub fn energy(&self, params: &CircuitParameters) -> EnergySeries {
        let (l, c) = (params.inductance(), params.capacitance());
        let capacitor: Vec<f64> = self.x.iter().map(|x| 0.5 * c * x[0] * x[0]).collect();
        let inductor: Vec<f64> = self.x.iter().map(|x| 0.5 * l * x[1] * x[1]).collect();
        let total = capacitor
            .iter()
            .zip(&inductor)
            .map(|(ec, el)| ec + el)
            .collect();
        EnergySeries {
            capacitor,
            inductor,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![0.0, 0.5, 1.0],
            vec![
                StateVector::new(0.0, 1.0),
                StateVector::new(2.0, 0.0),
                StateVector::new(-1.0, -0.5),
            ],
            SimStats::default(),
        )
    }

    #[test]
    fn column_accessors() {
        let traj = sample();
        let ts = traj.time_series();
        assert_eq!(ts.time, vec![0.0, 0.5, 1.0]);
        assert_eq!(ts.v_c, vec![0.0, 2.0, -1.0]);
        assert_eq!(ts.i_l, vec![1.0, 0.0, -0.5]);
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.final_state(), Some(&StateVector::new(-1.0, -0.5)));
        assert_eq!(traj.peak_voltage(), Some(2.0));
    }

    #[test]
    fn energy_terms() {
        let params = CircuitParameters::new(1.0, 2.0, 0.5).unwrap();
        let e = sample().energy(&params);
        assert_eq!(e.capacitor, vec![0.0, 1.0, 0.25]);
        assert_eq!(e.inductor, vec![1.0, 0.0, 0.25]);
        assert_eq!(e.total, vec![1.0, 1.0, 0.5]);
    }
}
