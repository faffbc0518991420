//! Elementary arithmetic over [`RandomVariable`].
//!
//! Every operation returns a new value; operands are never mutated. Binary
//! and ternary operations follow the broadcast rules documented on the
//! parent module. IEEE-754 specials (infinities, NaN) propagate unchanged.

use super::RandomVariable;

impl RandomVariable {
    /// X², per path.
    pub fn squared(&self) -> Self {
        self.map(|x| x * x)
    }

    /// √X, per path.
    pub fn sqrt(&self) -> Self {
        self.map(f64::sqrt)
    }

    /// eˣ, per path.
    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    /// Natural logarithm, per path. Non-positive inputs produce IEEE-754
    /// specials.
    pub fn log(&self) -> Self {
        self.map(f64::ln)
    }

    /// sin X, per path.
    pub fn sin(&self) -> Self {
        self.map(f64::sin)
    }

    /// cos X, per path.
    pub fn cos(&self) -> Self {
        self.map(f64::cos)
    }

    /// |X|, per path.
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    /// 1/X, per path. A zero realisation produces an infinity.
    pub fn invert(&self) -> Self {
        self.map(|x| 1.0 / x)
    }

    /// −X, per path.
    pub fn neg(&self) -> Self {
        self.map(|x| -x)
    }

    /// X + Y.
    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x + y)
    }

    /// X − Y.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x - y)
    }

    /// X · Y.
    pub fn mult(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x * y)
    }

    /// X / Y. A zero divisor produces an infinity or NaN.
    pub fn div(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x / y)
    }

    /// Xʸ, per path with the exponent broadcast.
    pub fn pow(&self, exponent: &Self) -> Self {
        self.zip_with(exponent, f64::powf)
    }

    /// min(X, Y): caps this value at the given bound, per path.
    pub fn cap(&self, bound: &Self) -> Self {
        self.zip_with(bound, f64::min)
    }

    /// max(X, Y): floors this value at the given bound, per path.
    pub fn floor(&self, bound: &Self) -> Self {
        self.zip_with(bound, f64::max)
    }

    /// Fused multiply-add X + Y·Z.
    pub fn add_product(&self, factor1: &Self, factor2: &Self) -> Self {
        self.zip_with3(factor1, factor2, |x, y, z| x + y * z)
    }

    /// X + Y/Z.
    pub fn add_ratio(&self, numerator: &Self, denominator: &Self) -> Self {
        self.zip_with3(numerator, denominator, |x, y, z| x + y / z)
    }

    /// X − Y/Z.
    pub fn sub_ratio(&self, numerator: &Self, denominator: &Self) -> Self {
        self.zip_with3(numerator, denominator, |x, y, z| x - y / z)
    }

    /// Accrual X·(1 + Y·Z), with Y a rate and Z a period fraction.
    pub fn accrue(&self, rate: &Self, period: &Self) -> Self {
        self.zip_with3(rate, period, |x, y, z| x * (1.0 + y * z))
    }

    /// Discounting X/(1 + Y·Z), with Y a rate and Z a period fraction.
    pub fn discount(&self, rate: &Self, period: &Self) -> Self {
        self.zip_with3(rate, period, |x, y, z| x / (1.0 + y * z))
    }

    /// Conditional selection: where this trigger is ≥ 0 the realisation of
    /// `if_nonnegative` is taken, elsewhere the realisation of `otherwise`.
    pub fn choose(&self, if_nonnegative: &Self, otherwise: &Self) -> Self {
        self.zip_with3(
            if_nonnegative,
            otherwise,
            |t, a, b| if t >= 0.0 { a } else { b },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn paths(values: &[f64]) -> RandomVariable {
        RandomVariable::stochastic(1.0, values.to_vec())
    }

    #[test]
    fn test_squared() {
        assert_eq!(paths(&[2.0, -3.0]).squared().to_vec(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_sqrt_and_exp_log_roundtrip() {
        let x = paths(&[1.0, 4.0, 9.0]);
        assert_eq!(x.sqrt().to_vec(), vec![1.0, 2.0, 3.0]);
        let roundtrip = x.log().exp();
        for (a, b) in roundtrip.to_vec().iter().zip(x.to_vec()) {
            assert_relative_eq!(*a, b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_trigonometry() {
        let x = paths(&[0.0, std::f64::consts::FRAC_PI_2]);
        assert_relative_eq!(x.sin().get(1), 1.0, max_relative = 1e-12);
        assert_relative_eq!(x.cos().get(0), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_abs_and_neg() {
        let x = paths(&[-1.5, 2.5]);
        assert_eq!(x.abs().to_vec(), vec![1.5, 2.5]);
        assert_eq!(x.neg().to_vec(), vec![1.5, -2.5]);
    }

    #[test]
    fn test_invert() {
        assert_eq!(paths(&[2.0, 4.0]).invert().to_vec(), vec![0.5, 0.25]);
    }

    #[test]
    fn test_binary_arithmetic() {
        let x = paths(&[6.0, 8.0]);
        let y = paths(&[3.0, 2.0]);
        assert_eq!(x.add(&y).to_vec(), vec![9.0, 10.0]);
        assert_eq!(x.sub(&y).to_vec(), vec![3.0, 6.0]);
        assert_eq!(x.mult(&y).to_vec(), vec![18.0, 16.0]);
        assert_eq!(x.div(&y).to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_pow_broadcasts_exponent() {
        let x = paths(&[2.0, 3.0]);
        let two = RandomVariable::scalar(2.0);
        assert_eq!(x.pow(&two).to_vec(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_cap_and_floor() {
        let x = paths(&[1.0, 5.0]);
        let bound = RandomVariable::scalar(3.0);
        assert_eq!(x.cap(&bound).to_vec(), vec![1.0, 3.0]);
        assert_eq!(x.floor(&bound).to_vec(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_ternary_formulas() {
        let x = RandomVariable::scalar(1.0);
        let y = RandomVariable::scalar(2.0);
        let z = RandomVariable::scalar(5.0);
        assert_eq!(x.add_product(&y, &z).as_scalar(), Some(11.0));
        assert_eq!(x.add_ratio(&y, &z).as_scalar(), Some(1.4));
        assert_eq!(x.sub_ratio(&y, &z).as_scalar(), Some(0.6));
        assert_eq!(x.accrue(&y, &z).as_scalar(), Some(11.0));
        assert_relative_eq!(
            x.discount(&y, &z).as_scalar().unwrap(),
            1.0 / 11.0,
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_choose_selects_per_path() {
        let trigger = paths(&[-1.0, 0.0, 2.0]);
        let up = RandomVariable::scalar(1.0);
        let down = RandomVariable::scalar(-1.0);
        assert_eq!(trigger.choose(&up, &down).to_vec(), vec![-1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_ieee_propagation() {
        let x = paths(&[1.0, -1.0]);
        let zero = RandomVariable::scalar(0.0);
        let divided = x.div(&zero);
        assert_eq!(divided.get(0), f64::INFINITY);
        assert_eq!(divided.get(1), f64::NEG_INFINITY);
        assert!(x.log().get(1).is_nan());
    }

    #[test]
    fn test_time_takes_the_later_operand() {
        let early = RandomVariable::deterministic(0.5, 1.0);
        let late = RandomVariable::deterministic(2.0, 1.0);
        assert_eq!(early.add(&late).time(), 2.0);
    }
}
