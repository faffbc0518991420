//! Local partial-derivative rules, one per operator and argument position.
//!
//! Each rule maps the snapshotted forward values of a node's arguments to
//! ∂(node)/∂(argument k), expressed as a `RandomVariable` so that per-path
//! structure survives the chain rule. Conventions at non-differentiable
//! points:
//!
//! - `abs`: sign(X), 0 at X = 0
//! - `cap`/`floor`: indicator of the active branch, 0 at the boundary for
//!   both arguments
//! - `min`/`max` reductions: indicator "realisation equals the extremum"
//!   (a sub-gradient at ties)
//! - `pow`: the exponent is treated as deterministic, ∂/∂Y = 0
//! - `choose`: ∂/∂trigger = 0 everywhere; the selection boundary carries a
//!   point mass that has no finite representation, so the
//!   almost-everywhere value is used
//!
//! An argument position outside an operator's arity fails immediately with
//! [`EngineError::InvalidDerivativeIndex`]; the outer `match` is exhaustive
//! over the operator enum, so an operator without a rule cannot compile.

use adjoint_core::stochastic::RandomVariable;

use super::Operator;
use crate::error::EngineError;

impl Operator {
    /// The local partial derivative of this operation with respect to its
    /// `index`-th argument, evaluated at the given argument values.
    ///
    /// # Arguments
    ///
    /// * `index` - Argument position, 0-based
    /// * `arguments` - Snapshot of the forward values of every argument, in
    ///   operand order
    ///
    /// # Errors
    ///
    /// [`EngineError::UnsupportedOperation`] if the number of argument
    /// values does not match the operator's arity;
    /// [`EngineError::InvalidDerivativeIndex`] if `index` is outside it.
    pub fn partial_derivative(
        &self,
        index: usize,
        arguments: &[RandomVariable],
    ) -> Result<RandomVariable, EngineError> {
        if arguments.len() != self.arity() {
            return Err(EngineError::UnsupportedOperation {
                operator: *self,
                expected: self.arity(),
                supplied: arguments.len(),
            });
        }
        let invalid = || EngineError::InvalidDerivativeIndex {
            operator: *self,
            index,
            arity: self.arity(),
        };
        let one = || RandomVariable::scalar(1.0);
        let zero = || RandomVariable::scalar(0.0);

        let x = &arguments[0];
        match self {
            // --- arity 1: elementwise ---
            Operator::Squared => match index {
                0 => Ok(x.map(|v| 2.0 * v)),
                _ => Err(invalid()),
            },
            Operator::Sqrt => match index {
                0 => Ok(x.map(|v| 0.5 / v.sqrt())),
                _ => Err(invalid()),
            },
            Operator::Exp => match index {
                0 => Ok(x.exp()),
                _ => Err(invalid()),
            },
            Operator::Log => match index {
                0 => Ok(x.invert()),
                _ => Err(invalid()),
            },
            Operator::Sin => match index {
                0 => Ok(x.cos()),
                _ => Err(invalid()),
            },
            Operator::Cos => match index {
                0 => Ok(x.sin().neg()),
                _ => Err(invalid()),
            },
            Operator::Abs => match index {
                0 => Ok(x.map(|v| {
                    if v > 0.0 {
                        1.0
                    } else if v < 0.0 {
                        -1.0
                    } else {
                        0.0
                    }
                })),
                _ => Err(invalid()),
            },
            Operator::Invert => match index {
                0 => Ok(x.map(|v| -1.0 / (v * v))),
                _ => Err(invalid()),
            },

            // --- arity 1: reductions ---
            Operator::Average => match index {
                0 => Ok(RandomVariable::deterministic(
                    x.time(),
                    1.0 / x.size() as f64,
                )),
                _ => Err(invalid()),
            },
            Operator::Variance => match index {
                0 => {
                    let mean = x.expectation();
                    let n = x.size() as f64;
                    Ok(x.map(move |v| 2.0 * (v - mean) / n))
                }
                _ => Err(invalid()),
            },
            Operator::SampleVariance => match index {
                0 => {
                    let mean = x.expectation();
                    let n = x.size() as f64;
                    Ok(x.map(move |v| 2.0 * (v - mean) / (n - 1.0)))
                }
                _ => Err(invalid()),
            },
            Operator::StandardDeviation => match index {
                0 => {
                    let mean = x.expectation();
                    let n = x.size() as f64;
                    let deviation = x.standard_deviation().expectation();
                    Ok(x.map(move |v| (v - mean) / (n * deviation)))
                }
                _ => Err(invalid()),
            },
            Operator::StandardError => match index {
                0 => {
                    let mean = x.expectation();
                    let n = x.size() as f64;
                    let deviation = x.standard_deviation().expectation();
                    Ok(x.map(move |v| (v - mean) / (n.powf(1.5) * deviation)))
                }
                _ => Err(invalid()),
            },
            Operator::Min => match index {
                0 => {
                    let extremum = x.min().expectation();
                    Ok(x.map(move |v| if v == extremum { 1.0 } else { 0.0 }))
                }
                _ => Err(invalid()),
            },
            Operator::Max => match index {
                0 => {
                    let extremum = x.max().expectation();
                    Ok(x.map(move |v| if v == extremum { 1.0 } else { 0.0 }))
                }
                _ => Err(invalid()),
            },

            // --- arity 2 ---
            Operator::Add => match index {
                0 | 1 => Ok(one()),
                _ => Err(invalid()),
            },
            Operator::Sub => match index {
                0 => Ok(one()),
                1 => Ok(RandomVariable::scalar(-1.0)),
                _ => Err(invalid()),
            },
            Operator::Mult => match index {
                0 => Ok(arguments[1].clone()),
                1 => Ok(x.clone()),
                _ => Err(invalid()),
            },
            Operator::Div => match index {
                0 => Ok(arguments[1].invert()),
                1 => Ok(x.neg().div(&arguments[1].squared())),
                _ => Err(invalid()),
            },
            Operator::Cap => match index {
                0 => Ok(x.zip_with(&arguments[1], |a, b| if a < b { 1.0 } else { 0.0 })),
                1 => Ok(x.zip_with(&arguments[1], |a, b| if b < a { 1.0 } else { 0.0 })),
                _ => Err(invalid()),
            },
            Operator::Floor => match index {
                0 => Ok(x.zip_with(&arguments[1], |a, b| if a > b { 1.0 } else { 0.0 })),
                1 => Ok(x.zip_with(&arguments[1], |a, b| if b > a { 1.0 } else { 0.0 })),
                _ => Err(invalid()),
            },
            Operator::Pow => match index {
                0 => Ok(x.zip_with(&arguments[1], |a, b| b * a.powf(b - 1.0))),
                1 => Ok(zero()),
                _ => Err(invalid()),
            },
            Operator::AverageWeighted => match index {
                0 => Ok(arguments[1].clone()),
                1 => Ok(x.clone()),
                _ => Err(invalid()),
            },
            Operator::VarianceWeighted => match index {
                0 => {
                    let mean = x.average_weighted(&arguments[1]).expectation();
                    Ok(x.zip_with(&arguments[1], move |v, w| 2.0 * w * (v - mean)))
                }
                1 => {
                    let mean = x.average_weighted(&arguments[1]).expectation();
                    Ok(x.map(move |v| v * (v - 2.0 * mean)))
                }
                _ => Err(invalid()),
            },

            // --- arity 3 ---
            Operator::AddProduct => match index {
                0 => Ok(one()),
                1 => Ok(arguments[2].clone()),
                2 => Ok(arguments[1].clone()),
                _ => Err(invalid()),
            },
            Operator::AddRatio => match index {
                0 => Ok(one()),
                1 => Ok(arguments[2].invert()),
                2 => Ok(arguments[1].neg().div(&arguments[2].squared())),
                _ => Err(invalid()),
            },
            Operator::SubRatio => match index {
                0 => Ok(one()),
                1 => Ok(arguments[2].invert().neg()),
                2 => Ok(arguments[1].div(&arguments[2].squared())),
                _ => Err(invalid()),
            },
            Operator::Accrue => match index {
                0 => Ok(arguments[1].zip_with(&arguments[2], |r, p| 1.0 + r * p)),
                1 => Ok(x.mult(&arguments[2])),
                2 => Ok(x.mult(&arguments[1])),
                _ => Err(invalid()),
            },
            Operator::Discount => match index {
                0 => Ok(arguments[1].zip_with(&arguments[2], |r, p| 1.0 / (1.0 + r * p))),
                1 => Ok(x.zip_with3(&arguments[1], &arguments[2], |a, r, p| {
                    -a * p / ((1.0 + r * p) * (1.0 + r * p))
                })),
                2 => Ok(x.zip_with3(&arguments[1], &arguments[2], |a, r, p| {
                    -a * r / ((1.0 + r * p) * (1.0 + r * p))
                })),
                _ => Err(invalid()),
            },
            Operator::Choose => match index {
                // The trigger's derivative is a point mass at the selection
                // boundary; the almost-everywhere value is zero.
                0 => Ok(zero()),
                1 => Ok(x.map(|t| if t >= 0.0 { 1.0 } else { 0.0 })),
                2 => Ok(x.map(|t| if t < 0.0 { 1.0 } else { 0.0 })),
                _ => Err(invalid()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(values: &[f64]) -> RandomVariable {
        RandomVariable::stochastic(0.0, values.to_vec())
    }

    #[test]
    fn test_squared_rule() {
        let d = Operator::Squared
            .partial_derivative(0, &[RandomVariable::scalar(3.0)])
            .unwrap();
        assert_eq!(d.as_scalar(), Some(6.0));
    }

    #[test]
    fn test_mult_rule_swaps_arguments() {
        let x = RandomVariable::scalar(2.0);
        let y = RandomVariable::scalar(5.0);
        let args = [x, y];
        assert_eq!(
            Operator::Mult
                .partial_derivative(0, &args)
                .unwrap()
                .as_scalar(),
            Some(5.0)
        );
        assert_eq!(
            Operator::Mult
                .partial_derivative(1, &args)
                .unwrap()
                .as_scalar(),
            Some(2.0)
        );
    }

    #[test]
    fn test_div_rule() {
        let args = [RandomVariable::scalar(6.0), RandomVariable::scalar(3.0)];
        let d0 = Operator::Div.partial_derivative(0, &args).unwrap();
        let d1 = Operator::Div.partial_derivative(1, &args).unwrap();
        assert!((d0.expectation() - 1.0 / 3.0).abs() < 1e-15);
        assert!((d1.expectation() + 6.0 / 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_abs_rule_is_zero_at_zero() {
        let d = Operator::Abs
            .partial_derivative(0, &[paths(&[-2.0, 0.0, 3.0])])
            .unwrap();
        assert_eq!(d.to_vec(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cap_floor_rules_are_zero_at_the_boundary() {
        let args = [paths(&[1.0, 2.0, 3.0]), RandomVariable::scalar(2.0)];
        let cap0 = Operator::Cap.partial_derivative(0, &args).unwrap();
        let cap1 = Operator::Cap.partial_derivative(1, &args).unwrap();
        assert_eq!(cap0.to_vec(), vec![1.0, 0.0, 0.0]);
        assert_eq!(cap1.to_vec(), vec![0.0, 0.0, 1.0]);

        let floor0 = Operator::Floor.partial_derivative(0, &args).unwrap();
        let floor1 = Operator::Floor.partial_derivative(1, &args).unwrap();
        assert_eq!(floor0.to_vec(), vec![0.0, 0.0, 1.0]);
        assert_eq!(floor1.to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pow_exponent_is_deterministic() {
        let args = [RandomVariable::scalar(2.0), RandomVariable::scalar(3.0)];
        let d0 = Operator::Pow.partial_derivative(0, &args).unwrap();
        let d1 = Operator::Pow.partial_derivative(1, &args).unwrap();
        assert_eq!(d0.as_scalar(), Some(12.0));
        assert_eq!(d1.as_scalar(), Some(0.0));
    }

    #[test]
    fn test_average_rule() {
        let d = Operator::Average
            .partial_derivative(0, &[paths(&[1.0, 2.0, 3.0, 4.0])])
            .unwrap();
        assert_eq!(d.as_scalar(), Some(0.25));
    }

    #[test]
    fn test_variance_rules() {
        let x = paths(&[1.0, 3.0]);
        let d = Operator::Variance.partial_derivative(0, &[x.clone()]).unwrap();
        // 2(xⱼ − 2)/2
        assert_eq!(d.to_vec(), vec![-1.0, 1.0]);
        let d_sample = Operator::SampleVariance.partial_derivative(0, &[x]).unwrap();
        // 2(xⱼ − 2)/1
        assert_eq!(d_sample.to_vec(), vec![-2.0, 2.0]);
    }

    #[test]
    fn test_min_max_rules_mark_the_extremum() {
        let x = paths(&[3.0, 1.0, 1.0, 5.0]);
        let d_min = Operator::Min.partial_derivative(0, &[x.clone()]).unwrap();
        let d_max = Operator::Max.partial_derivative(0, &[x]).unwrap();
        assert_eq!(d_min.to_vec(), vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(d_max.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_choose_trigger_convention_is_zero() {
        let args = [
            paths(&[-1.0, 1.0]),
            RandomVariable::scalar(10.0),
            RandomVariable::scalar(20.0),
        ];
        let d_trigger = Operator::Choose.partial_derivative(0, &args).unwrap();
        assert_eq!(d_trigger.as_scalar(), Some(0.0));

        let d_first = Operator::Choose.partial_derivative(1, &args).unwrap();
        let d_second = Operator::Choose.partial_derivative(2, &args).unwrap();
        assert_eq!(d_first.to_vec(), vec![0.0, 1.0]);
        assert_eq!(d_second.to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_accrue_and_discount_rules() {
        let args = [
            RandomVariable::scalar(100.0),
            RandomVariable::scalar(0.05),
            RandomVariable::scalar(2.0),
        ];
        let accrual = Operator::Accrue;
        assert!((accrual.partial_derivative(0, &args).unwrap().expectation() - 1.1).abs() < 1e-12);
        assert!((accrual.partial_derivative(1, &args).unwrap().expectation() - 200.0).abs() < 1e-12);
        assert!((accrual.partial_derivative(2, &args).unwrap().expectation() - 5.0).abs() < 1e-12);

        let discounting = Operator::Discount;
        let d0 = discounting.partial_derivative(0, &args).unwrap().expectation();
        let d1 = discounting.partial_derivative(1, &args).unwrap().expectation();
        let d2 = discounting.partial_derivative(2, &args).unwrap().expectation();
        assert!((d0 - 1.0 / 1.1).abs() < 1e-12);
        assert!((d1 + 200.0 / 1.21).abs() < 1e-12);
        assert!((d2 + 5.0 / 1.21).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_index_fails_fast() {
        let err = Operator::Exp
            .partial_derivative(1, &[RandomVariable::scalar(1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidDerivativeIndex {
                operator: Operator::Exp,
                index: 1,
                arity: 1,
            }
        );
    }

    #[test]
    fn test_arity_mismatch_fails_fast() {
        let err = Operator::Add
            .partial_derivative(0, &[RandomVariable::scalar(1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedOperation {
                operator: Operator::Add,
                expected: 2,
                supplied: 1,
            }
        );
    }
}
