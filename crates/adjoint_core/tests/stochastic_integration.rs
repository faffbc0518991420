//! Integration and property tests for the stochastic value type.

use adjoint_core::stochastic::RandomVariable;
use approx::assert_relative_eq;
use proptest::prelude::*;

#[test]
fn test_discounted_payoff_composition() {
    // max(S − K, 0) / (1 + r·t) across three scenarios
    let spot = RandomVariable::stochastic(1.0, vec![90.0, 100.0, 120.0]);
    let strike = RandomVariable::scalar(100.0);
    let rate = RandomVariable::deterministic(0.0, 0.05);
    let period = RandomVariable::scalar(1.0);

    let payoff = spot.sub(&strike).floor(&RandomVariable::scalar(0.0));
    let discounted = payoff.discount(&rate, &period);

    assert_eq!(payoff.to_vec(), vec![0.0, 0.0, 20.0]);
    assert_relative_eq!(
        discounted.average().expectation(),
        (20.0 / 1.05) / 3.0,
        max_relative = 1e-12
    );
    assert_eq!(discounted.time(), 1.0);
}

#[test]
fn test_reductions_agree_with_direct_formulas() {
    let values = vec![1.5, 2.5, 3.5, 4.5, 10.0];
    let x = RandomVariable::stochastic(0.0, values.clone());
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();

    assert_relative_eq!(x.expectation(), mean, max_relative = 1e-12);
    assert_relative_eq!(x.variance().expectation(), ss / n, max_relative = 1e-12);
    assert_relative_eq!(
        x.sample_variance().expectation(),
        ss / (n - 1.0),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        x.standard_error().expectation(),
        (ss / n).sqrt() / n.sqrt(),
        max_relative = 1e-12
    );
}

proptest! {
    #[test]
    fn prop_variance_is_non_negative(values in proptest::collection::vec(-1e3..1e3f64, 1..64)) {
        let x = RandomVariable::stochastic(0.0, values);
        prop_assert!(x.variance().expectation() >= 0.0);
    }

    #[test]
    fn prop_average_lies_between_extrema(values in proptest::collection::vec(-1e3..1e3f64, 1..64)) {
        let x = RandomVariable::stochastic(0.0, values);
        let mean = x.expectation();
        prop_assert!(x.min().expectation() <= mean + 1e-9);
        prop_assert!(mean <= x.max().expectation() + 1e-9);
    }

    #[test]
    fn prop_cap_floor_bracket(values in proptest::collection::vec(-1e3..1e3f64, 1..64), bound in -1e3..1e3f64) {
        let x = RandomVariable::stochastic(0.0, values);
        let bound_value = RandomVariable::scalar(bound);
        let capped = x.cap(&bound_value);
        let floored = x.floor(&bound_value);
        for path in 0..x.size() {
            prop_assert!(capped.get(path) <= bound);
            prop_assert!(floored.get(path) >= bound);
        }
    }

    #[test]
    fn prop_add_product_matches_composition(x in -1e2..1e2f64, y in -1e2..1e2f64, z in -1e2..1e2f64) {
        let a = RandomVariable::scalar(x);
        let b = RandomVariable::scalar(y);
        let c = RandomVariable::scalar(z);
        let fused = a.add_product(&b, &c).expectation();
        let composed = a.add(&b.mult(&c)).expectation();
        prop_assert!((fused - composed).abs() <= 1e-9_f64.max(composed.abs() * 1e-12));
    }
}
