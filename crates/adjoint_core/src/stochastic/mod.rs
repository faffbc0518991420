//! The stochastic value type used throughout the adjoint workspace.
//!
//! A [`RandomVariable`] is an immutable vector-or-scalar numeric value: either
//! a single deterministic number applying to every Monte Carlo scenario, or
//! one realisation per simulation path. All elementary arithmetic, the
//! statistical reductions, and the per-path combinators live on this type;
//! the engine layer only ever *records* calls to them.
//!
//! ## Broadcast Rules
//!
//! Binary operations combine operands path by path:
//! - deterministic × deterministic → deterministic
//! - deterministic × stochastic → the scalar is broadcast over every path
//! - stochastic × stochastic → path counts must match (programmer error
//!   otherwise)
//!
//! ## Numerical Edge Cases
//!
//! Division by zero, logarithms of non-positive values and similar conditions
//! propagate IEEE-754 infinities and NaNs unchanged. No operation applies
//! special-case guarding.

mod arithmetic;
mod ops;
mod reductions;

use std::fmt;
use std::sync::Arc;

/// Per-scenario realisations backing a [`RandomVariable`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Realisations {
    /// A single scalar applying to every scenario.
    Deterministic(f64),
    /// One realisation per simulation path. Shared, never mutated.
    Stochastic(Arc<[f64]>),
}

/// An immutable vector-or-scalar numeric value over Monte Carlo scenarios.
///
/// Every operation returns a new value and never mutates its operands, so
/// cloning is cheap (the realisation storage is shared) and values can be
/// snapshotted freely by the recording engine.
///
/// # Observation Time
///
/// Each value carries an observation time (a year fraction). Combining two
/// values takes the later of the two times, mirroring the filtration a
/// simulation produces values under.
///
/// # Examples
///
/// ```
/// use adjoint_core::stochastic::RandomVariable;
///
/// let x = RandomVariable::stochastic(0.5, vec![1.0, 2.0, 3.0]);
/// let y = x.squared();
///
/// assert_eq!(y.get(1), 4.0);
/// assert_eq!(y.time(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomVariable {
    time: f64,
    realisations: Realisations,
}

impl RandomVariable {
    /// Create a deterministic value observed at `time`.
    pub fn deterministic(time: f64, value: f64) -> Self {
        Self {
            time,
            realisations: Realisations::Deterministic(value),
        }
    }

    /// Create a path-vector value observed at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `realisations` is empty; a random variable must carry at
    /// least one scenario.
    pub fn stochastic(time: f64, realisations: impl Into<Vec<f64>>) -> Self {
        let realisations = realisations.into();
        assert!(
            !realisations.is_empty(),
            "a random variable requires at least one realisation"
        );
        Self {
            time,
            realisations: Realisations::Stochastic(realisations.into()),
        }
    }

    /// Create a deterministic value observed at time zero.
    pub fn scalar(value: f64) -> Self {
        Self::deterministic(0.0, value)
    }

    /// The observation time of this value.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The number of scenarios: 1 for a deterministic value, the path count
    /// otherwise.
    #[inline]
    pub fn size(&self) -> usize {
        match &self.realisations {
            Realisations::Deterministic(_) => 1,
            Realisations::Stochastic(values) => values.len(),
        }
    }

    /// True if this value is a single scalar applying to all scenarios.
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        matches!(self.realisations, Realisations::Deterministic(_))
    }

    /// The realisation on a given path. Deterministic values broadcast to
    /// every path index.
    ///
    /// # Panics
    ///
    /// Panics if `path` is out of bounds for a stochastic value.
    #[inline]
    pub fn get(&self, path: usize) -> f64 {
        match &self.realisations {
            Realisations::Deterministic(value) => *value,
            Realisations::Stochastic(values) => values[path],
        }
    }

    /// The scalar behind a deterministic value, or `None` for a path vector.
    pub fn as_scalar(&self) -> Option<f64> {
        match &self.realisations {
            Realisations::Deterministic(value) => Some(*value),
            Realisations::Stochastic(_) => None,
        }
    }

    /// All realisations as an owned vector (length 1 for a deterministic
    /// value).
    pub fn to_vec(&self) -> Vec<f64> {
        match &self.realisations {
            Realisations::Deterministic(value) => vec![*value],
            Realisations::Stochastic(values) => values.to_vec(),
        }
    }

    /// Apply a per-path unary function, preserving the observation time.
    ///
    /// This is the extension seam used by the engine's derivative catalog for
    /// indicator-style local derivatives that have no named counterpart.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let realisations = match &self.realisations {
            Realisations::Deterministic(value) => Realisations::Deterministic(f(*value)),
            Realisations::Stochastic(values) => {
                Realisations::Stochastic(values.iter().map(|&v| f(v)).collect())
            }
        };
        Self {
            time: self.time,
            realisations,
        }
    }

    /// Combine with another value path by path under the broadcast rules,
    /// taking the later observation time.
    ///
    /// # Panics
    ///
    /// Panics if both operands are stochastic with differing path counts.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        use Realisations::{Deterministic, Stochastic};
        let realisations = match (&self.realisations, &other.realisations) {
            (Deterministic(a), Deterministic(b)) => Deterministic(f(*a, *b)),
            (Deterministic(a), Stochastic(bs)) => {
                Stochastic(bs.iter().map(|&b| f(*a, b)).collect())
            }
            (Stochastic(xs), Deterministic(b)) => {
                Stochastic(xs.iter().map(|&a| f(a, *b)).collect())
            }
            (Stochastic(xs), Stochastic(bs)) => {
                assert_eq!(
                    xs.len(),
                    bs.len(),
                    "path count mismatch: {} vs {}",
                    xs.len(),
                    bs.len()
                );
                Stochastic(xs.iter().zip(bs.iter()).map(|(&a, &b)| f(a, b)).collect())
            }
        };
        Self {
            time: self.time.max(other.time),
            realisations,
        }
    }

    /// Combine three values path by path under the broadcast rules, taking
    /// the latest observation time.
    ///
    /// # Panics
    ///
    /// Panics if the stochastic operands carry differing path counts.
    pub fn zip_with3(&self, second: &Self, third: &Self, f: impl Fn(f64, f64, f64) -> f64) -> Self {
        let size = self.size().max(second.size()).max(third.size());
        for operand in [self, second, third] {
            assert!(
                operand.size() == 1 || operand.size() == size,
                "path count mismatch: {} vs {}",
                operand.size(),
                size
            );
        }
        let time = self.time.max(second.time).max(third.time);
        if size == 1 {
            return Self::deterministic(time, f(self.get(0), second.get(0), third.get(0)));
        }
        let values: Vec<f64> = (0..size)
            .map(|path| {
                f(
                    self.broadcast_get(path),
                    second.broadcast_get(path),
                    third.broadcast_get(path),
                )
            })
            .collect();
        Self {
            time,
            realisations: Realisations::Stochastic(values.into()),
        }
    }

    /// Path access where a deterministic value answers for every index.
    #[inline]
    fn broadcast_get(&self, path: usize) -> f64 {
        match &self.realisations {
            Realisations::Deterministic(value) => *value,
            Realisations::Stochastic(values) => values[path],
        }
    }
}

impl From<f64> for RandomVariable {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.realisations {
            Realisations::Deterministic(value) => write!(f, "{} @ {}", value, self.time),
            Realisations::Stochastic(values) => {
                write!(f, "[{} paths] @ {}", values.len(), self.time)
            }
        }
    }
}
