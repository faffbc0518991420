//! The catalog of differentiable operations.
//!
//! Each recorded tape node is tagged with an [`Operator`]. The catalog pins
//! down, per operator, its arity and its local partial-derivative rule
//! (in [`derivative`], as `Operator::partial_derivative`). Forward
//! evaluation delegates to the corresponding `RandomVariable` method at
//! recording time, so the engine never re-implements arithmetic.
//!
//! The enum is deliberately closed: every `match` over it is exhaustive, so
//! adding an operator without a derivative rule is a compile error rather
//! than a silent fallthrough at differentiation time.

mod derivative;

use std::fmt;

/// Tag identifying which catalog operation produced a tape node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    // --- arity 1: elementwise ---
    /// X²
    Squared,
    /// √X
    Sqrt,
    /// eˣ
    Exp,
    /// ln X
    Log,
    /// sin X
    Sin,
    /// cos X
    Cos,
    /// |X|
    Abs,
    /// 1/X
    Invert,

    // --- arity 1: reductions over paths ---
    /// Sample mean.
    Average,
    /// Population variance (divisor N).
    Variance,
    /// Bessel-corrected sample variance (divisor N−1).
    SampleVariance,
    /// Population standard deviation.
    StandardDeviation,
    /// Monte Carlo standard error σ/√N.
    StandardError,
    /// Smallest realisation.
    Min,
    /// Largest realisation.
    Max,

    // --- arity 2 ---
    /// X + Y
    Add,
    /// X − Y
    Sub,
    /// X · Y
    Mult,
    /// X / Y
    Div,
    /// min(X, Y)
    Cap,
    /// max(X, Y)
    Floor,
    /// Xʸ with the exponent treated as deterministic.
    Pow,
    /// Expectation Σ xᵢwᵢ under probability weights.
    AverageWeighted,
    /// Variance Σ wᵢxᵢ² − (Σ wᵢxᵢ)² under probability weights.
    VarianceWeighted,

    // --- arity 3 ---
    /// X + Y·Z
    AddProduct,
    /// X + Y/Z
    AddRatio,
    /// X − Y/Z
    SubRatio,
    /// X·(1 + Y·Z)
    Accrue,
    /// X/(1 + Y·Z)
    Discount,
    /// Per-path selection: trigger ≥ 0 takes the first branch.
    Choose,
}

impl Operator {
    /// The number of operands this operator consumes.
    pub const fn arity(&self) -> usize {
        match self {
            Operator::Squared
            | Operator::Sqrt
            | Operator::Exp
            | Operator::Log
            | Operator::Sin
            | Operator::Cos
            | Operator::Abs
            | Operator::Invert
            | Operator::Average
            | Operator::Variance
            | Operator::SampleVariance
            | Operator::StandardDeviation
            | Operator::StandardError
            | Operator::Min
            | Operator::Max => 1,
            Operator::Add
            | Operator::Sub
            | Operator::Mult
            | Operator::Div
            | Operator::Cap
            | Operator::Floor
            | Operator::Pow
            | Operator::AverageWeighted
            | Operator::VarianceWeighted => 2,
            Operator::AddProduct
            | Operator::AddRatio
            | Operator::SubRatio
            | Operator::Accrue
            | Operator::Discount
            | Operator::Choose => 3,
        }
    }

    /// True for operators that collapse a path vector into a deterministic
    /// value.
    pub const fn is_reduction(&self) -> bool {
        matches!(
            self,
            Operator::Average
                | Operator::Variance
                | Operator::SampleVariance
                | Operator::StandardDeviation
                | Operator::StandardError
                | Operator::Min
                | Operator::Max
                | Operator::AverageWeighted
                | Operator::VarianceWeighted
        )
    }

    /// A stable lowercase name, used in error messages and diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Operator::Squared => "squared",
            Operator::Sqrt => "sqrt",
            Operator::Exp => "exp",
            Operator::Log => "log",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Abs => "abs",
            Operator::Invert => "invert",
            Operator::Average => "average",
            Operator::Variance => "variance",
            Operator::SampleVariance => "sample variance",
            Operator::StandardDeviation => "standard deviation",
            Operator::StandardError => "standard error",
            Operator::Min => "min",
            Operator::Max => "max",
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mult => "mult",
            Operator::Div => "div",
            Operator::Cap => "cap",
            Operator::Floor => "floor",
            Operator::Pow => "pow",
            Operator::AverageWeighted => "weighted average",
            Operator::VarianceWeighted => "weighted variance",
            Operator::AddProduct => "add product",
            Operator::AddRatio => "add ratio",
            Operator::SubRatio => "sub ratio",
            Operator::Accrue => "accrue",
            Operator::Discount => "discount",
            Operator::Choose => "choose",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operator; 30] = [
        Operator::Squared,
        Operator::Sqrt,
        Operator::Exp,
        Operator::Log,
        Operator::Sin,
        Operator::Cos,
        Operator::Abs,
        Operator::Invert,
        Operator::Average,
        Operator::Variance,
        Operator::SampleVariance,
        Operator::StandardDeviation,
        Operator::StandardError,
        Operator::Min,
        Operator::Max,
        Operator::Add,
        Operator::Sub,
        Operator::Mult,
        Operator::Div,
        Operator::Cap,
        Operator::Floor,
        Operator::Pow,
        Operator::AverageWeighted,
        Operator::VarianceWeighted,
        Operator::AddProduct,
        Operator::AddRatio,
        Operator::SubRatio,
        Operator::Accrue,
        Operator::Discount,
        Operator::Choose,
    ];

    #[test]
    fn test_arity_partition() {
        let unary = ALL.iter().filter(|op| op.arity() == 1).count();
        let binary = ALL.iter().filter(|op| op.arity() == 2).count();
        let ternary = ALL.iter().filter(|op| op.arity() == 3).count();
        assert_eq!(unary, 15);
        assert_eq!(binary, 9);
        assert_eq!(ternary, 6);
    }

    #[test]
    fn test_reductions_are_unary_or_weighted() {
        for op in ALL.iter().filter(|op| op.is_reduction()) {
            assert!(op.arity() <= 2, "{op} is a reduction with arity > 2");
        }
    }

    #[test]
    fn test_display_names_are_unique() {
        let mut names: Vec<&str> = ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }
}
