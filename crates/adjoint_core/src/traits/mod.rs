//! Core traits for gradient producers and their consumers.
//!
//! This module defines fundamental abstractions for:
//! - Generic floating-point operations (`Float` trait)
//! - Gradient computation (`Differentiable` trait)
//!
//! Calibration and risk routines are written against [`Differentiable`] so
//! that they never depend on the engine crate directly: any tracked value
//! that can answer `gradient()` is an acceptable source of sensitivities.

/// Generic floating-point trait for numeric computations.
///
/// Re-exported so downstream model code can be written generically over
/// `f64`/`f32` without importing num-traits itself.
///
/// # Examples
/// ```
/// use adjoint_core::traits::Float;
///
/// fn compute_discount<T: Float>(rate: T, time: T) -> T {
///     (-rate * time).exp()
/// }
///
/// let discount: f64 = compute_discount(0.05, 1.0);
/// assert!((discount - 0.951229).abs() < 1e-5);
/// ```
pub use num_traits::Float;

mod differentiable;

pub use differentiable::{Differentiable, GradientMap};
