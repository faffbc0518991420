//! # Adjoint Engine (L2: AAD Core)
//!
//! Reverse-mode (adjoint) automatic differentiation over stochastic values.
//!
//! This crate provides:
//! - The tape: operations on tracked values are recorded as immutable,
//!   reference-counted nodes ([`tape::TapeNode`])
//! - The operator catalog: ~30 differentiable primitives with exhaustive
//!   local-derivative rules ([`operators::Operator`])
//! - The reverse pass: gradient accumulation by descending-id traversal,
//!   with no explicit topological sort
//! - Batch Jacobians for calibration consumers ([`jacobian`])
//! - Finite-difference verification utilities ([`verify`])
//!
//! ## How a Computation Is Differentiated
//!
//! Model code composes [`DifferentiableValue`]s exactly as it would compose
//! plain stochastic values. Each operation evaluates eagerly (delegating the
//! arithmetic to `adjoint_core`) and appends one node to the tape. Calling
//! [`DifferentiableValue::gradient`] walks the recorded graph backward from
//! the requested root and returns the sensitivity of that root with respect
//! to every reachable independent variable.
//!
//! ```rust
//! use adjoint_engine::DifferentiableValue;
//!
//! let x = DifferentiableValue::leaf_scalar(0.0, 3.0);
//! let y = x.squared();
//!
//! let gradient = y.gradient().unwrap();
//! assert_eq!(gradient[&x.id()].expectation(), 6.0);
//! ```
//!
//! ## Tape Lifecycle
//!
//! There is no global registry: every tracked value owns its node by shared
//! reference, nodes reference their arguments the same way, and a subgraph
//! is released as soon as the last tracked value that can reach it is
//! dropped. Independent tapes may be built and differentiated concurrently
//! from different threads.

#![warn(missing_docs)]

pub mod error;
pub mod jacobian;
pub mod operators;
pub mod tape;
pub mod value;
pub mod verify;

mod reverse;

pub use adjoint_core::stochastic::RandomVariable;
pub use adjoint_core::traits::{Differentiable, GradientMap};
pub use error::EngineError;
pub use operators::Operator;
pub use value::DifferentiableValue;
