//! Error types for the differentiation engine.

use thiserror::Error;

use crate::operators::Operator;

/// Errors raised while evaluating or differentiating a recorded operation.
///
/// All variants are programmer errors or unimplemented surfaces; there is no
/// recoverable/retryable failure mode. Arithmetic edge cases (division by
/// zero, logarithm of a non-positive value) are *not* errors: they
/// propagate as IEEE-754 specials through forward and derivative values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An operator was invoked with the wrong number of operands.
    #[error("operation not supported: {operator} expects {expected} operand(s), got {supplied}")]
    UnsupportedOperation {
        /// The operator that was invoked.
        operator: Operator,
        /// The arity the catalog declares for it.
        expected: usize,
        /// The number of operands actually supplied.
        supplied: usize,
    },

    /// A local derivative was requested for an argument position the
    /// operator does not have.
    #[error("no derivative rule for {operator} with respect to argument {index} (arity {arity})")]
    InvalidDerivativeIndex {
        /// The operator whose derivative was requested.
        operator: Operator,
        /// The requested argument position.
        index: usize,
        /// The operator's arity.
        arity: usize,
    },

    /// Forward-mode (tangent) differentiation is not provided by this
    /// engine.
    #[error("forward-mode (tangent) differentiation is not implemented")]
    ForwardModeUnimplemented,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operation_display() {
        let err = EngineError::UnsupportedOperation {
            operator: Operator::Mult,
            expected: 2,
            supplied: 3,
        };
        assert_eq!(
            format!("{}", err),
            "operation not supported: mult expects 2 operand(s), got 3"
        );
    }

    #[test]
    fn test_invalid_derivative_index_display() {
        let err = EngineError::InvalidDerivativeIndex {
            operator: Operator::Exp,
            index: 1,
            arity: 1,
        };
        assert_eq!(
            format!("{}", err),
            "no derivative rule for exp with respect to argument 1 (arity 1)"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = EngineError::ForwardModeUnimplemented;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = EngineError::ForwardModeUnimplemented;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
