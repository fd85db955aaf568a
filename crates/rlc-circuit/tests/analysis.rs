//! Model + eigen analysis properties across parameter space.

use proptest::prelude::*;
use rlc_circuit::{CircuitParameters, DampingClass, EigenAnalyzer, StateSpaceModel};

fn build(r: f64, l: f64, c: f64) -> (StateSpaceModel, EigenAnalyzer) {
    let model = StateSpaceModel::new(CircuitParameters::new(r, l, c).unwrap());
    let analyzer = EigenAnalyzer::new(model.a());
    (model, analyzer)
}

#[test]
fn classification_matches_discriminant_examples() {
    let cases = [
        ((1.0, 1.0, 0.1), DampingClass::Underdamped),
        ((2.0, 1.0, 1.0), DampingClass::CriticallyDamped),
        ((3.0, 1.0, 1.0), DampingClass::Overdamped),
    ];
    for ((r, l, c), expected) in cases {
        let (_, analyzer) = build(r, l, c);
        assert_eq!(analyzer.damping_type().unwrap(), expected, "R={r} L={l} C={c}");
    }
}

#[test]
fn passive_circuits_are_stable() {
    let (model, analyzer) = build(0.01, 1e-3, 1e-6);
    assert!(model.is_stable());
    assert!(analyzer.result().is_stable());
    assert!(analyzer.result().slowest_decay_rate() > 0.0);
}

proptest! {
    #[test]
    fn matrices_follow_component_values(r in 1e-3_f64..1e3, l in 1e-6_f64..10.0, c in 1e-9_f64..1.0) {
        let (model, _) = build(r, l, c);
        let a = model.a();
        prop_assert_eq!(a[(0, 0)], 0.0);
        prop_assert_eq!(a[(0, 1)], 1.0 / c);
        prop_assert_eq!(a[(1, 0)], -1.0 / l);
        prop_assert_eq!(a[(1, 1)], -r / l);
        prop_assert_eq!(model.b()[0], 0.0);
        prop_assert_eq!(model.b()[1], -1.0 / l);
    }

    #[test]
    fn eigenvalues_match_trace_and_determinant(r in 1e-2_f64..1e2, l in 1e-3_f64..10.0, c in 1e-4_f64..1.0) {
        let (_, analyzer) = build(r, l, c);
        let result = analyzer.result();
        let trace = -r / l;
        let det = 1.0 / (l * c);

        let sum = result.sum();
        prop_assert!((sum.re - trace).abs() <= 1e-9 * trace.abs().max(1.0));
        prop_assert!(sum.im.abs() <= 1e-9 * det.sqrt().max(1.0));

        let product = result.product();
        prop_assert!((product.re - det).abs() <= 1e-9 * det);
        prop_assert!(product.im.abs() <= 1e-9 * det);
    }

    #[test]
    fn classification_agrees_with_alpha_vs_w0(r in 1e-2_f64..1e2, l in 1e-3_f64..10.0, c in 1e-4_f64..1.0) {
        let params = CircuitParameters::new(r, l, c).unwrap();
        let alpha = params.alpha_frequency();
        let w0 = params.natural_frequency();
        // stay clear of the tolerance band around alpha == w0
        prop_assume!((alpha - w0).abs() > 1e-3 * w0);

        let (_, analyzer) = build(r, l, c);
        let expected = if alpha < w0 { DampingClass::Underdamped } else { DampingClass::Overdamped };
        prop_assert_eq!(analyzer.damping_type().unwrap(), expected);
    }
}
