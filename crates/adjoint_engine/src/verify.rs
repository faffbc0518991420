//! Finite-difference verification utilities.
//!
//! Adjoint results should be cross-checked against bumped re-evaluation
//! wherever a new payoff or model composition is introduced; the helpers
//! here provide the centred-difference reference the engine's own test
//! suite uses.

/// Centred finite-difference gradient of a scalar function at `point`.
///
/// Each component is estimated as (f(x + h·eᵢ) − f(x − h·eᵢ)) / 2h. The
/// truncation error scales with h², so tolerances in comparisons should
/// scale accordingly.
///
/// # Examples
///
/// ```
/// use adjoint_engine::verify::finite_difference_gradient;
///
/// let f = |p: &[f64]| p[0] * p[0] * p[1];
/// let gradient = finite_difference_gradient(f, &[3.0, 2.0], 1e-6);
/// assert!((gradient[0] - 12.0).abs() < 1e-6);
/// assert!((gradient[1] - 9.0).abs() < 1e-6);
/// ```
pub fn finite_difference_gradient(
    f: impl Fn(&[f64]) -> f64,
    point: &[f64],
    step: f64,
) -> Vec<f64> {
    (0..point.len())
        .map(|component| {
            let mut bumped_up = point.to_vec();
            let mut bumped_down = point.to_vec();
            bumped_up[component] += step;
            bumped_down[component] -= step;
            (f(&bumped_up) - f(&bumped_down)) / (2.0 * step)
        })
        .collect()
}
