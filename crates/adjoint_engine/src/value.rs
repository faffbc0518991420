//! Tracked values: stochastic values whose operations are recorded.
//!
//! A [`DifferentiableValue`] wraps one tape node by shared reference. Every
//! arithmetic method evaluates its forward result eagerly, delegating the
//! arithmetic itself to [`RandomVariable`], and records a new node whose
//! arguments are the operand nodes. Literal `f64` operands are wrapped as
//! constant leaves first, so they participate in recording but never appear
//! in gradient output.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use adjoint_core::stochastic::RandomVariable;
use adjoint_core::traits::{Differentiable, GradientMap};

use crate::error::EngineError;
use crate::operators::Operator;
use crate::reverse;
use crate::tape::TapeNode;

/// A stochastic value with provenance: composing tracked values builds the
/// tape that [`DifferentiableValue::gradient`] later walks backward.
///
/// Cloning is cheap (it shares the underlying node) and values are
/// immutable, so a tracked intermediate can be reused freely in several
/// downstream expressions; each reuse contributes its own adjoint during
/// the reverse pass.
///
/// # Examples
///
/// ```
/// use adjoint_engine::DifferentiableValue;
///
/// // h = x·y + sin(x), at x = 2, y = 3
/// let x = DifferentiableValue::leaf_scalar(0.0, 2.0);
/// let y = DifferentiableValue::leaf_scalar(0.0, 3.0);
/// let h = x.mult(&y).add(&x.sin());
///
/// let gradient = h.gradient().unwrap();
/// let dh_dx = gradient[&x.id()].expectation();
/// let dh_dy = gradient[&y.id()].expectation();
/// assert!((dh_dx - (3.0 + 2.0_f64.cos())).abs() < 1e-12);
/// assert!((dh_dy - 2.0).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct DifferentiableValue {
    node: Arc<TapeNode>,
}

impl DifferentiableValue {
    /// Create an independent variable from a vector of per-path
    /// realisations observed at `time`.
    pub fn leaf(time: f64, realisations: impl Into<Vec<f64>>) -> Self {
        Self {
            node: TapeNode::leaf(RandomVariable::stochastic(time, realisations)),
        }
    }

    /// Create an independent variable from a single scalar observed at
    /// `time`.
    pub fn leaf_scalar(time: f64, value: f64) -> Self {
        Self {
            node: TapeNode::leaf(RandomVariable::deterministic(time, value)),
        }
    }

    /// Create an independent variable from an existing stochastic value.
    pub fn leaf_of(value: RandomVariable) -> Self {
        Self {
            node: TapeNode::leaf(value),
        }
    }

    /// Wrap a literal as a constant leaf. Constants are recorded on the
    /// tape but never appear as gradient outputs.
    pub fn constant(value: f64) -> Self {
        Self {
            node: TapeNode::constant(RandomVariable::scalar(value)),
        }
    }

    /// The stable identity of this value's node; gradient maps are keyed by
    /// these ids.
    #[inline]
    pub fn id(&self) -> u64 {
        self.node.id()
    }

    /// The observation time of the underlying value.
    #[inline]
    pub fn time(&self) -> f64 {
        self.node.value().time()
    }

    /// The forward value, computed once when this node was recorded.
    #[inline]
    pub fn value(&self) -> &RandomVariable {
        self.node.value()
    }

    /// The underlying tape node, exposed for consumers that inspect
    /// provenance (diagnostics, structural tests).
    #[inline]
    pub fn node(&self) -> &Arc<TapeNode> {
        &self.node
    }

    fn unary(&self, operator: Operator, value: RandomVariable) -> Self {
        Self {
            node: TapeNode::interior(operator, vec![self.node.clone()], value),
        }
    }

    fn binary(&self, operator: Operator, other: &Self, value: RandomVariable) -> Self {
        Self {
            node: TapeNode::interior(operator, vec![self.node.clone(), other.node.clone()], value),
        }
    }

    fn ternary(&self, operator: Operator, second: &Self, third: &Self, value: RandomVariable) -> Self {
        Self {
            node: TapeNode::interior(
                operator,
                vec![self.node.clone(), second.node.clone(), third.node.clone()],
                value,
            ),
        }
    }

    // --- elementwise unary ---

    /// X², recorded.
    pub fn squared(&self) -> Self {
        self.unary(Operator::Squared, self.value().squared())
    }

    /// √X, recorded.
    pub fn sqrt(&self) -> Self {
        self.unary(Operator::Sqrt, self.value().sqrt())
    }

    /// eˣ, recorded.
    pub fn exp(&self) -> Self {
        self.unary(Operator::Exp, self.value().exp())
    }

    /// ln X, recorded.
    pub fn log(&self) -> Self {
        self.unary(Operator::Log, self.value().log())
    }

    /// sin X, recorded.
    pub fn sin(&self) -> Self {
        self.unary(Operator::Sin, self.value().sin())
    }

    /// cos X, recorded.
    pub fn cos(&self) -> Self {
        self.unary(Operator::Cos, self.value().cos())
    }

    /// |X|, recorded.
    pub fn abs(&self) -> Self {
        self.unary(Operator::Abs, self.value().abs())
    }

    /// 1/X, recorded.
    pub fn invert(&self) -> Self {
        self.unary(Operator::Invert, self.value().invert())
    }

    // --- reductions ---

    /// Sample mean over paths, recorded.
    pub fn average(&self) -> Self {
        self.unary(Operator::Average, self.value().average())
    }

    /// Population variance over paths, recorded.
    pub fn variance(&self) -> Self {
        self.unary(Operator::Variance, self.value().variance())
    }

    /// Bessel-corrected sample variance over paths, recorded.
    pub fn sample_variance(&self) -> Self {
        self.unary(Operator::SampleVariance, self.value().sample_variance())
    }

    /// Population standard deviation over paths, recorded.
    pub fn standard_deviation(&self) -> Self {
        self.unary(
            Operator::StandardDeviation,
            self.value().standard_deviation(),
        )
    }

    /// Monte Carlo standard error, recorded.
    pub fn standard_error(&self) -> Self {
        self.unary(Operator::StandardError, self.value().standard_error())
    }

    /// Smallest realisation over paths, recorded.
    pub fn min(&self) -> Self {
        self.unary(Operator::Min, self.value().min())
    }

    /// Largest realisation over paths, recorded.
    pub fn max(&self) -> Self {
        self.unary(Operator::Max, self.value().max())
    }

    // --- binary ---

    /// X + Y, recorded.
    pub fn add(&self, other: &Self) -> Self {
        self.binary(Operator::Add, other, self.value().add(other.value()))
    }

    /// X − Y, recorded.
    pub fn sub(&self, other: &Self) -> Self {
        self.binary(Operator::Sub, other, self.value().sub(other.value()))
    }

    /// X · Y, recorded.
    pub fn mult(&self, other: &Self) -> Self {
        self.binary(Operator::Mult, other, self.value().mult(other.value()))
    }

    /// X / Y, recorded.
    pub fn div(&self, other: &Self) -> Self {
        self.binary(Operator::Div, other, self.value().div(other.value()))
    }

    /// min(X, Y), recorded.
    pub fn cap(&self, bound: &Self) -> Self {
        self.binary(Operator::Cap, bound, self.value().cap(bound.value()))
    }

    /// max(X, Y), recorded.
    pub fn floor(&self, bound: &Self) -> Self {
        self.binary(Operator::Floor, bound, self.value().floor(bound.value()))
    }

    /// Xʸ with a deterministic exponent, recorded.
    pub fn pow(&self, exponent: &Self) -> Self {
        self.binary(Operator::Pow, exponent, self.value().pow(exponent.value()))
    }

    /// Expectation under probability weights, recorded.
    pub fn average_weighted(&self, weights: &Self) -> Self {
        self.binary(
            Operator::AverageWeighted,
            weights,
            self.value().average_weighted(weights.value()),
        )
    }

    /// Variance under probability weights, recorded.
    pub fn variance_weighted(&self, weights: &Self) -> Self {
        self.binary(
            Operator::VarianceWeighted,
            weights,
            self.value().variance_weighted(weights.value()),
        )
    }

    // --- ternary ---

    /// X + Y·Z, recorded.
    pub fn add_product(&self, factor1: &Self, factor2: &Self) -> Self {
        self.ternary(
            Operator::AddProduct,
            factor1,
            factor2,
            self.value().add_product(factor1.value(), factor2.value()),
        )
    }

    /// X + Y/Z, recorded.
    pub fn add_ratio(&self, numerator: &Self, denominator: &Self) -> Self {
        self.ternary(
            Operator::AddRatio,
            numerator,
            denominator,
            self.value().add_ratio(numerator.value(), denominator.value()),
        )
    }

    /// X − Y/Z, recorded.
    pub fn sub_ratio(&self, numerator: &Self, denominator: &Self) -> Self {
        self.ternary(
            Operator::SubRatio,
            numerator,
            denominator,
            self.value().sub_ratio(numerator.value(), denominator.value()),
        )
    }

    /// Accrual X·(1 + Y·Z), recorded.
    pub fn accrue(&self, rate: &Self, period: &Self) -> Self {
        self.ternary(
            Operator::Accrue,
            rate,
            period,
            self.value().accrue(rate.value(), period.value()),
        )
    }

    /// Discounting X/(1 + Y·Z), recorded.
    pub fn discount(&self, rate: &Self, period: &Self) -> Self {
        self.ternary(
            Operator::Discount,
            rate,
            period,
            self.value().discount(rate.value(), period.value()),
        )
    }

    /// Per-path conditional selection on this trigger, recorded.
    pub fn choose(&self, if_nonnegative: &Self, otherwise: &Self) -> Self {
        self.ternary(
            Operator::Choose,
            if_nonnegative,
            otherwise,
            self.value().choose(if_nonnegative.value(), otherwise.value()),
        )
    }

    // --- literal conveniences ---

    /// X + c, wrapping the literal as a constant leaf.
    pub fn add_scalar(&self, rhs: f64) -> Self {
        self.add(&Self::constant(rhs))
    }

    /// X − c, wrapping the literal as a constant leaf.
    pub fn sub_scalar(&self, rhs: f64) -> Self {
        self.sub(&Self::constant(rhs))
    }

    /// X · c, wrapping the literal as a constant leaf.
    pub fn mult_scalar(&self, rhs: f64) -> Self {
        self.mult(&Self::constant(rhs))
    }

    /// X / c, wrapping the literal as a constant leaf.
    pub fn div_scalar(&self, rhs: f64) -> Self {
        self.div(&Self::constant(rhs))
    }

    /// min(X, c), wrapping the literal as a constant leaf.
    pub fn cap_scalar(&self, bound: f64) -> Self {
        self.cap(&Self::constant(bound))
    }

    /// max(X, c), wrapping the literal as a constant leaf.
    pub fn floor_scalar(&self, bound: f64) -> Self {
        self.floor(&Self::constant(bound))
    }

    /// Xᶜ, wrapping the literal exponent as a constant leaf.
    pub fn pow_scalar(&self, exponent: f64) -> Self {
        self.pow(&Self::constant(exponent))
    }

    // --- differentiation ---

    /// Sensitivities of this value with respect to every reachable
    /// independent variable, keyed by leaf id.
    ///
    /// Repeated calls on the same root return identical results; the tape is
    /// immutable once recorded.
    ///
    /// # Errors
    ///
    /// Propagates any catalog failure raised while evaluating local
    /// derivative rules.
    pub fn gradient(&self) -> Result<GradientMap, EngineError> {
        reverse::propagate(self.node.clone(), None)
    }

    /// Sensitivities restricted to the given leaf ids; cheaper than
    /// filtering after the fact only in what it returns, the traversal still
    /// visits the full ancestor subgraph.
    ///
    /// # Errors
    ///
    /// Propagates any catalog failure raised while evaluating local
    /// derivative rules.
    pub fn gradient_with_respect_to(&self, ids: &[u64]) -> Result<GradientMap, EngineError> {
        reverse::propagate(self.node.clone(), Some(ids))
    }

    /// Forward-mode (tangent) sensitivities. Not provided by this engine.
    ///
    /// # Errors
    ///
    /// Always returns [`EngineError::ForwardModeUnimplemented`].
    pub fn tangents(&self) -> Result<GradientMap, EngineError> {
        Err(EngineError::ForwardModeUnimplemented)
    }
}

impl Differentiable for DifferentiableValue {
    type Error = EngineError;

    fn id(&self) -> u64 {
        DifferentiableValue::id(self)
    }

    fn value(&self) -> RandomVariable {
        DifferentiableValue::value(self).clone()
    }

    fn gradient(&self) -> Result<GradientMap, EngineError> {
        DifferentiableValue::gradient(self)
    }

    fn gradient_with_respect_to(&self, ids: &[u64]) -> Result<GradientMap, EngineError> {
        DifferentiableValue::gradient_with_respect_to(self, ids)
    }
}

impl std::fmt::Debug for DifferentiableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifferentiableValue")
            .field("node", &self.node)
            .finish()
    }
}

impl Add for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn add(self, rhs: Self) -> DifferentiableValue {
        DifferentiableValue::add(self, rhs)
    }
}

impl Sub for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn sub(self, rhs: Self) -> DifferentiableValue {
        DifferentiableValue::sub(self, rhs)
    }
}

impl Mul for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn mul(self, rhs: Self) -> DifferentiableValue {
        DifferentiableValue::mult(self, rhs)
    }
}

impl Div for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn div(self, rhs: Self) -> DifferentiableValue {
        DifferentiableValue::div(self, rhs)
    }
}

impl Neg for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn neg(self) -> DifferentiableValue {
        self.mult_scalar(-1.0)
    }
}

impl Add<f64> for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn add(self, rhs: f64) -> DifferentiableValue {
        self.add_scalar(rhs)
    }
}

impl Sub<f64> for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn sub(self, rhs: f64) -> DifferentiableValue {
        self.sub_scalar(rhs)
    }
}

impl Mul<f64> for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn mul(self, rhs: f64) -> DifferentiableValue {
        self.mult_scalar(rhs)
    }
}

impl Div<f64> for &DifferentiableValue {
    type Output = DifferentiableValue;

    fn div(self, rhs: f64) -> DifferentiableValue {
        self.div_scalar(rhs)
    }
}

impl Add<DifferentiableValue> for f64 {
    type Output = DifferentiableValue;

    fn add(self, rhs: DifferentiableValue) -> DifferentiableValue {
        DifferentiableValue::constant(self).add(&rhs)
    }
}

impl Sub<DifferentiableValue> for f64 {
    type Output = DifferentiableValue;

    fn sub(self, rhs: DifferentiableValue) -> DifferentiableValue {
        DifferentiableValue::constant(self).sub(&rhs)
    }
}

impl Mul<DifferentiableValue> for f64 {
    type Output = DifferentiableValue;

    fn mul(self, rhs: DifferentiableValue) -> DifferentiableValue {
        DifferentiableValue::constant(self).mult(&rhs)
    }
}

impl Div<DifferentiableValue> for f64 {
    type Output = DifferentiableValue;

    fn div(self, rhs: DifferentiableValue) -> DifferentiableValue {
        DifferentiableValue::constant(self).div(&rhs)
    }
}
