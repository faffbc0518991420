//! The reverse (adjoint) pass.
//!
//! Gradient accumulation walks the ancestor subgraph of the requested root
//! in strictly descending node-id order. Because every argument was numbered
//! before the operation that consumed it, a node popped at the current
//! highest id has already received the adjoint contribution of every
//! consumer that could ever reference it: Kahn-style reverse-topological
//! processing with the sort made free by monotonic id assignment.
//!
//! The traversal frontier and the adjoint map are one structure here: an
//! ordered map from node id to the node and its accumulated adjoint.
//! Popping an interior node propagates its adjoint into its arguments and
//! discards the entry, so only the frontier and the finished leaves are ever
//! held; interior adjoints do not outlive their propagation.
//!
//! Seeding is always the multiplicative identity at the requested root. For
//! a scalar root (the usual calibration case: an average of simulated
//! quantities) the result is the gradient of that scalar. For a path-vector
//! root it is the gradient of the sum of the per-path realisations, the
//! standard ones-vector seed of reverse-mode AD: path-local leaves still
//! receive their pathwise derivative, while broadcast scalar parameters
//! collect the total across paths.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use adjoint_core::stochastic::RandomVariable;
use adjoint_core::traits::GradientMap;
use tracing::debug;

use crate::error::EngineError;
use crate::tape::TapeNode;

/// Accumulate adjoints backward from `root`, returning sensitivities for
/// every reachable true leaf, optionally restricted to `restrict_to`.
pub(crate) fn propagate(
    root: Arc<TapeNode>,
    restrict_to: Option<&[u64]>,
) -> Result<GradientMap, EngineError> {
    let root_id = root.id();
    let mut pending: BTreeMap<u64, (Arc<TapeNode>, RandomVariable)> = BTreeMap::new();
    pending.insert(root_id, (root, RandomVariable::scalar(1.0)));

    let mut gradient: GradientMap = BTreeMap::new();
    let mut visited = 0usize;

    while let Some((_, (node, adjoint))) = pending.pop_last() {
        visited += 1;
        if let Some(operator) = node.operator() {
            for (position, argument) in node.arguments().iter().enumerate() {
                let local = operator.partial_derivative(position, node.argument_values())?;
                let mut contribution = local.mult(&adjoint);
                if argument.value().is_deterministic() && !contribution.is_deterministic() {
                    // A deterministic operand was broadcast over the paths;
                    // the adjoint of that fan-out is the per-path total.
                    contribution = contribution.sum();
                }
                match pending.entry(argument.id()) {
                    Entry::Occupied(mut entry) => {
                        let accumulated = &mut entry.get_mut().1;
                        *accumulated = accumulated.add(&contribution);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert((argument.clone(), contribution));
                    }
                }
            }
        } else if !node.is_constant() {
            // A true leaf: its accumulated adjoint is final.
            gradient.insert(node.id(), adjoint);
        }
    }

    if let Some(ids) = restrict_to {
        gradient.retain(|id, _| ids.contains(id));
    }

    debug!(
        root = root_id,
        visited,
        leaves = gradient.len(),
        "reverse pass complete"
    );
    Ok(gradient)
}

#[cfg(test)]
mod tests {
    use crate::value::DifferentiableValue;

    #[test]
    fn test_gradient_of_a_leaf_is_one() {
        let x = DifferentiableValue::leaf_scalar(0.0, 5.0);
        let gradient = x.gradient().unwrap();
        assert_eq!(gradient.len(), 1);
        assert_eq!(gradient[&x.id()].expectation(), 1.0);
    }

    #[test]
    fn test_gradient_of_a_constant_is_empty() {
        let c = DifferentiableValue::constant(5.0);
        let gradient = c.gradient().unwrap();
        assert!(gradient.is_empty());
    }

    #[test]
    fn test_reused_intermediate_accumulates_both_contributions() {
        // f = x·x (via two references to the same node), df/dx = 2x
        let x = DifferentiableValue::leaf_scalar(0.0, 4.0);
        let f = x.mult(&x);
        let gradient = f.gradient().unwrap();
        assert_eq!(gradient[&x.id()].expectation(), 8.0);
    }

    #[test]
    fn test_diamond_graph_accumulates_through_both_branches() {
        // f = (x + x·y) + (x·y)², with s = x·y shared
        let x = DifferentiableValue::leaf_scalar(0.0, 2.0);
        let y = DifferentiableValue::leaf_scalar(0.0, 3.0);
        let s = x.mult(&y);
        let f = x.add(&s).add(&s.squared());
        let gradient = f.gradient().unwrap();
        // df/dx = 1 + y + 2sy = 1 + 3 + 36 = 40, df/dy = x + 2sx = 2 + 24 = 26
        assert_eq!(gradient[&x.id()].expectation(), 40.0);
        assert_eq!(gradient[&y.id()].expectation(), 26.0);
    }

    #[test]
    fn test_gradient_of_intermediate_value() {
        // Any recorded value can be a root, not only the most recent one.
        let x = DifferentiableValue::leaf_scalar(0.0, 3.0);
        let inner = x.squared();
        let _outer = inner.exp();
        let gradient = inner.gradient().unwrap();
        assert_eq!(gradient[&x.id()].expectation(), 6.0);
    }

    #[test]
    fn test_restricted_gradient_filters_leaves() {
        let x = DifferentiableValue::leaf_scalar(0.0, 2.0);
        let y = DifferentiableValue::leaf_scalar(0.0, 3.0);
        let f = x.mult(&y);
        let gradient = f.gradient_with_respect_to(&[y.id()]).unwrap();
        assert_eq!(gradient.len(), 1);
        assert_eq!(gradient[&y.id()].expectation(), 2.0);
    }

    #[test]
    fn test_broadcast_scalar_parameter_collects_the_path_total() {
        // V = average(θ·Z): dV/dθ = mean(Z), reached by summing the per-path
        // contributions flowing back into the broadcast scalar.
        let theta = DifferentiableValue::leaf_scalar(0.0, 2.0);
        let shocks = DifferentiableValue::leaf(0.0, vec![1.0, 2.0, 3.0, 6.0]);
        let v = theta.mult(&shocks).average();
        let gradient = v.gradient().unwrap();
        let d_theta = &gradient[&theta.id()];
        assert!(d_theta.is_deterministic());
        assert_eq!(d_theta.expectation(), 3.0);
        // The path-local leaf keeps its pathwise derivative, θ/N per path
        // (deterministic here, broadcast to every path).
        assert_eq!(gradient[&shocks.id()].get(0), 0.5);
        assert_eq!(gradient[&shocks.id()].get(3), 0.5);
    }

    #[test]
    fn test_idempotent_gradients() {
        let x = DifferentiableValue::leaf(0.0, vec![1.0, 2.0, 3.0]);
        let f = x.squared().average();
        let first = f.gradient().unwrap();
        let second = f.gradient().unwrap();
        assert_eq!(first, second);
    }
}
