//! Batch gradients for calibration consumers.
//!
//! A least-squares calibrator differentiates many outputs (one per market
//! observation) with respect to the same parameter set. Under the
//! self-contained tape each reverse pass owns its adjoint state, so the
//! passes are independent and run in parallel on the rayon thread pool.

use rayon::prelude::*;
use tracing::debug;

use crate::error::EngineError;
use crate::value::DifferentiableValue;

/// The Jacobian matrix dRᵢ/dθⱼ of a set of tracked outputs with respect to
/// a set of parameter leaves.
///
/// Row `i` corresponds to `outputs[i]`, column `j` to `parameters[j]`. Each
/// entry is the expectation of the accumulated adjoint, which for the
/// deterministic outputs a calibrator differentiates (averages of simulated
/// quantities) is the sensitivity itself. A parameter the output cannot
/// reach contributes a zero entry.
///
/// # Errors
///
/// Propagates the first [`EngineError`] raised by any output's reverse pass.
///
/// # Examples
///
/// ```
/// use adjoint_engine::{jacobian, DifferentiableValue};
///
/// let x = DifferentiableValue::leaf_scalar(0.0, 2.0);
/// let y = DifferentiableValue::leaf_scalar(0.0, 3.0);
/// let outputs = [x.mult(&y), x.add(&y)];
///
/// let matrix = jacobian::jacobian(&outputs, &[x.id(), y.id()]).unwrap();
/// assert_eq!(matrix, vec![vec![3.0, 2.0], vec![1.0, 1.0]]);
/// ```
pub fn jacobian(
    outputs: &[DifferentiableValue],
    parameters: &[u64],
) -> Result<Vec<Vec<f64>>, EngineError> {
    let matrix = outputs
        .par_iter()
        .map(|output| {
            let gradient = output.gradient_with_respect_to(parameters)?;
            Ok(parameters
                .iter()
                .map(|id| gradient.get(id).map_or(0.0, |adjoint| adjoint.expectation()))
                .collect())
        })
        .collect::<Result<Vec<Vec<f64>>, EngineError>>()?;
    debug!(
        rows = matrix.len(),
        columns = parameters.len(),
        "jacobian assembled"
    );
    Ok(matrix)
}
