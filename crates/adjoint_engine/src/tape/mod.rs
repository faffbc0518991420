//! The tape: recorded provenance of every tracked computation.
//!
//! There is no growing registry and no global container. Each recorded
//! operation is one immutable, reference-counted [`TapeNode`]; a node holds
//! shared references to the nodes its operands came from, so a tracked value
//! *is* its own tape: the ancestor subgraph reachable from its node. Node
//! ids come from one process-wide atomic counter and are used solely for
//! ordering, which keeps concurrent construction of independent tapes
//! correct: whatever the interleaving, an argument is always numbered before
//! any operation that consumes it.

mod node;

pub use node::TapeNode;
