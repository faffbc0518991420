//! The gradient-producer abstraction consumed by calibrators.

use std::collections::BTreeMap;

use crate::stochastic::RandomVariable;

/// Gradient result: leaf-variable id → accumulated sensitivity.
///
/// Keys are the stable node identities of the independent variables a
/// differentiation reached; values share the primitive type of the tracked
/// computation. An ordered map keeps gradient output deterministic across
/// runs, which calibration diagnostics rely on.
pub type GradientMap = BTreeMap<u64, RandomVariable>;

/// A value that can report sensitivities of itself with respect to the
/// independent variables it was computed from.
///
/// This is the seam between the differentiation engine and its consumers
/// (e.g. a Levenberg-Marquardt calibrator assembling a Jacobian): consumers
/// correlate the returned keys with the parameters they created via
/// [`Differentiable::id`].
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use adjoint_core::stochastic::RandomVariable;
/// use adjoint_core::traits::{Differentiable, GradientMap};
///
/// // A mock producer whose gradient is 2x with respect to a single leaf.
/// struct Squared {
///     leaf_id: u64,
///     x: RandomVariable,
/// }
///
/// impl Differentiable for Squared {
///     type Error = std::convert::Infallible;
///
///     fn id(&self) -> u64 {
///         self.leaf_id + 1
///     }
///
///     fn value(&self) -> RandomVariable {
///         self.x.squared()
///     }
///
///     fn gradient(&self) -> Result<GradientMap, Self::Error> {
///         let mut gradient = BTreeMap::new();
///         gradient.insert(self.leaf_id, self.x.map(|v| 2.0 * v));
///         Ok(gradient)
///     }
/// }
///
/// let squared = Squared { leaf_id: 7, x: RandomVariable::scalar(3.0) };
/// let gradient = squared.gradient().unwrap();
/// assert_eq!(gradient[&7].as_scalar(), Some(6.0));
/// ```
pub trait Differentiable {
    /// Error type raised when a gradient cannot be produced.
    type Error;

    /// Stable identity of this value, usable as a gradient-map key by
    /// consumers that track which leaf corresponds to which parameter.
    fn id(&self) -> u64;

    /// The forward (undifferentiated) value.
    fn value(&self) -> RandomVariable;

    /// Sensitivities of this value with respect to every reachable
    /// independent variable.
    fn gradient(&self) -> Result<GradientMap, Self::Error>;

    /// Sensitivities restricted to the requested leaf ids.
    ///
    /// The default implementation filters the full gradient; producers with
    /// a cheaper restricted traversal may override it.
    fn gradient_with_respect_to(&self, ids: &[u64]) -> Result<GradientMap, Self::Error> {
        let mut gradient = self.gradient()?;
        gradient.retain(|id, _| ids.contains(id));
        Ok(gradient)
    }
}
