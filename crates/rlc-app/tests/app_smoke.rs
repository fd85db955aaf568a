//! End-to-end checks of the service layer.

use std::path::PathBuf;

use rlc_app::{
    AppError, builtin_scenario, load_scenario, run_scenario, save_scenario, sweep_resistance,
};
use rlc_circuit::DampingClass;
use rlc_project::{CircuitDef, Scenario, SolverDef};

fn scenarios_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("scenarios");
    path
}

#[test]
fn builtin_scenario_reports_underdamped_step() {
    let report = run_scenario(&builtin_scenario()).unwrap();

    assert_eq!(report.analysis.damping, DampingClass::Underdamped);
    let [l1, l2] = report.analysis.eigen.eigenvalues;
    assert!((l1.re + 0.5).abs() < 1e-12);
    assert!((l1.im.abs() - 3.122498999).abs() < 1e-6);
    assert!((l1.im + l2.im).abs() < 1e-12);

    let steady = report.analysis.steady_state.unwrap();
    assert!((steady[0].abs() - 10.0).abs() < 1e-12);

    let run = report.simulation.unwrap();
    assert_eq!(run.summary.samples, 500);
    assert_eq!(run.trajectory.times()[499], 5.0);
    assert!(run.summary.final_energy > 0.0);
    assert!(run.summary.stats.accepted_steps > 0);
}

#[test]
fn integration_failure_keeps_analysis() {
    let scenario = Scenario {
        name: "stiff".to_string(),
        circuit: CircuitDef {
            resistance_ohm: 1e9,
            inductance_h: 1e-9,
            capacitance_f: 1e-9,
        },
        solver: Some(SolverDef {
            max_steps: Some(2_000),
            ..SolverDef::default()
        }),
        ..Scenario::default()
    };

    let report = run_scenario(&scenario).unwrap();
    assert_eq!(report.analysis.damping, DampingClass::Overdamped);
    let message = report.simulation.unwrap_err();
    assert!(message.starts_with("Numerical solve failed"), "{message}");
}

#[test]
fn invalid_parameters_fail_the_run() {
    let mut scenario = builtin_scenario();
    scenario.circuit.inductance_h = 0.0;
    assert!(matches!(run_scenario(&scenario), Err(AppError::Circuit(_))));
}

#[test]
fn bundled_scenarios_run() {
    let expected = [
        ("01_underdamped_step.yaml", DampingClass::Underdamped),
        ("02_critically_damped_release.yaml", DampingClass::CriticallyDamped),
        ("03_overdamped_sinusoid.yaml", DampingClass::Overdamped),
    ];
    for (name, damping) in expected {
        let scenario = load_scenario(&scenarios_dir().join(name))
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let report = run_scenario(&scenario).unwrap();
        assert_eq!(report.analysis.damping, damping, "{name}");
        assert!(report.simulation.is_ok(), "{name}");
    }
}

#[test]
fn critically_damped_release_decays() {
    let scenario =
        load_scenario(&scenarios_dir().join("02_critically_damped_release.yaml")).unwrap();
    let report = run_scenario(&scenario).unwrap();
    let summary = report.simulation.unwrap().summary;
    // (1 + t) e^-t scaled by v_C(0) = 5 at t = 10
    let exact = 5.0 * 11.0 * (-10.0f64).exp();
    assert!((summary.final_state[0] - exact).abs() < 1e-4);
    assert_eq!(summary.peak_voltage, 5.0);
}

#[test]
fn json_scenario_roundtrip_through_service() {
    let path = std::env::temp_dir().join("rlc_app_scenario.json");
    save_scenario(&path, &builtin_scenario()).unwrap();
    let loaded = load_scenario(&path).unwrap();
    assert_eq!(loaded, builtin_scenario());
}

#[test]
fn resistance_sweep_keeps_order() {
    let scenario = Scenario {
        circuit: CircuitDef {
            resistance_ohm: 1.0,
            inductance_h: 1.0,
            capacitance_f: 1.0,
        },
        ..Scenario::default()
    };
    let rows = sweep_resistance(&scenario, &[0.5, 2.0, 6.0]).unwrap();
    let damping: Vec<_> = rows.iter().map(|r| r.damping).collect();
    assert_eq!(
        damping,
        vec![
            DampingClass::Underdamped,
            DampingClass::CriticallyDamped,
            DampingClass::Overdamped
        ]
    );
    assert_eq!(rows[1].resistance, 2.0);
    assert!(rows.iter().all(|r| r.summary.is_ok()));
}
