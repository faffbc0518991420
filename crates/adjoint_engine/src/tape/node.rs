//! Tape node definition and id allocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use adjoint_core::stochastic::RandomVariable;

use crate::operators::Operator;

/// Process-wide id source. Relaxed ordering suffices: ids only need to be
/// unique and monotonically increasing per allocation, not synchronised
/// with any other memory.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// One recorded operation, leaf variable, or constant.
///
/// A node is created exactly once, at the moment its producing operation is
/// invoked, and is immutable thereafter. Ownership runs from consumers to
/// the arguments they were built from (an `Arc` DAG), never the reverse, so
/// a subgraph is released as soon as the last tracked value that can reach
/// it is dropped.
///
/// # Ordering Invariant
///
/// Every argument's id is strictly less than the id of the node that
/// consumes it: an argument must exist, and must already have drawn its
/// id, before the consuming operation executes. The reverse pass
/// relies on this to process nodes in descending id order without an
/// explicit topological sort.
pub struct TapeNode {
    id: u64,
    operator: Option<Operator>,
    arguments: Vec<Arc<TapeNode>>,
    argument_values: Vec<RandomVariable>,
    is_constant: bool,
    value: RandomVariable,
}

impl TapeNode {
    /// Record an independent (leaf) variable.
    pub(crate) fn leaf(value: RandomVariable) -> Arc<Self> {
        Arc::new(Self {
            id: next_id(),
            operator: None,
            arguments: Vec::new(),
            argument_values: Vec::new(),
            is_constant: false,
            value,
        })
    }

    /// Record a constant synthesised from a literal operand. Constants never
    /// appear as gradient outputs.
    pub(crate) fn constant(value: RandomVariable) -> Arc<Self> {
        Arc::new(Self {
            id: next_id(),
            operator: None,
            arguments: Vec::new(),
            argument_values: Vec::new(),
            is_constant: true,
            value,
        })
    }

    /// Record an interior operation node with its already-evaluated forward
    /// value.
    ///
    /// # Panics
    ///
    /// Panics if the operand count does not match the operator's declared
    /// arity; this is a programmer error in the recording layer, not a
    /// runtime condition.
    pub(crate) fn interior(
        operator: Operator,
        arguments: Vec<Arc<TapeNode>>,
        value: RandomVariable,
    ) -> Arc<Self> {
        assert_eq!(
            arguments.len(),
            operator.arity(),
            "operation not supported: {} expects {} operand(s), got {}",
            operator,
            operator.arity(),
            arguments.len()
        );
        let argument_values = arguments.iter().map(|a| a.value.clone()).collect();
        Arc::new(Self {
            id: next_id(),
            operator: Some(operator),
            arguments,
            argument_values,
            is_constant: false,
            value,
        })
    }

    /// The node's unique, monotonically assigned id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The operator that produced this node, or `None` for leaves and
    /// constants.
    #[inline]
    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// The argument nodes this operation consumed, in operand order.
    #[inline]
    pub fn arguments(&self) -> &[Arc<TapeNode>] {
        &self.arguments
    }

    /// Forward values of the arguments, snapshotted at construction time so
    /// derivative rules can be evaluated without re-walking the graph.
    #[inline]
    pub fn argument_values(&self) -> &[RandomVariable] {
        &self.argument_values
    }

    /// True for nodes synthesised to wrap a literal operand.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    /// True for an independent variable: no arguments and not a constant.
    /// Leaf ids are the valid keys of a gradient result.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.arguments.is_empty() && !self.is_constant
    }

    /// The forward-evaluated value, computed once at construction.
    #[inline]
    pub fn value(&self) -> &RandomVariable {
        &self.value
    }
}

impl Drop for TapeNode {
    /// Tear the argument chain down iteratively. A long tape dropped
    /// recursively would consume one stack frame per node.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.arguments);
        while let Some(argument) = stack.pop() {
            if let Some(mut inner) = Arc::into_inner(argument) {
                stack.append(&mut inner.arguments);
            }
        }
    }
}

impl fmt::Debug for TapeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argument_ids: Vec<u64> = self.arguments.iter().map(|a| a.id).collect();
        f.debug_struct("TapeNode")
            .field("id", &self.id)
            .field("operator", &self.operator)
            .field("arguments", &argument_ids)
            .field("is_constant", &self.is_constant)
            .field("value", &self.value)
            .finish()
    }
}
