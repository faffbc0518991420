//! # adjoint_core: Stochastic Value Foundation for Adjoint Differentiation
//!
//! ## Layer 1 (Foundation) Role
//!
//! adjoint_core serves as the bottom layer of the workspace, providing:
//! - The per-scenario stochastic value type (`stochastic::RandomVariable`)
//! - Elementary arithmetic and statistical reductions over simulation paths
//! - Traits for gradient consumers (`traits::Differentiable`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other adjoint_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - serde: Serialisation support (optional)
//!
//! The reverse-mode engine lives in Layer 2 (`adjoint_engine`); this crate
//! never records a tape, it only evaluates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use adjoint_core::stochastic::RandomVariable;
//!
//! // A deterministic value and a path-vector value, observed at t = 1.0
//! let rate = RandomVariable::deterministic(1.0, 0.05);
//! let spot = RandomVariable::stochastic(1.0, vec![95.0, 100.0, 105.0]);
//!
//! // Elementary arithmetic broadcasts the scalar over the paths
//! let forward = spot.mult(&rate.exp());
//! assert_eq!(forward.size(), 3);
//!
//! // Reductions collapse paths into a deterministic value
//! let mean = spot.average();
//! assert!((mean.expectation() - 100.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `RandomVariable`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod stochastic;
pub mod traits;
