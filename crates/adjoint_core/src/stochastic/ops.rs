//! `std::ops` overloads for [`RandomVariable`].
//!
//! The overloads delegate to the named methods so that `a + b`, `a * 2.0`
//! and `1.0 - a` read naturally in model code. Reference and owned operand
//! combinations are provided for the common call shapes.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::RandomVariable;

impl Add for &RandomVariable {
    type Output = RandomVariable;

    fn add(self, rhs: Self) -> RandomVariable {
        RandomVariable::add(self, rhs)
    }
}

impl Sub for &RandomVariable {
    type Output = RandomVariable;

    fn sub(self, rhs: Self) -> RandomVariable {
        RandomVariable::sub(self, rhs)
    }
}

impl Mul for &RandomVariable {
    type Output = RandomVariable;

    fn mul(self, rhs: Self) -> RandomVariable {
        RandomVariable::mult(self, rhs)
    }
}

impl Div for &RandomVariable {
    type Output = RandomVariable;

    fn div(self, rhs: Self) -> RandomVariable {
        RandomVariable::div(self, rhs)
    }
}

impl Neg for &RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        RandomVariable::neg(self)
    }
}

impl Add for RandomVariable {
    type Output = RandomVariable;

    fn add(self, rhs: Self) -> RandomVariable {
        RandomVariable::add(&self, &rhs)
    }
}

impl Sub for RandomVariable {
    type Output = RandomVariable;

    fn sub(self, rhs: Self) -> RandomVariable {
        RandomVariable::sub(&self, &rhs)
    }
}

impl Mul for RandomVariable {
    type Output = RandomVariable;

    fn mul(self, rhs: Self) -> RandomVariable {
        RandomVariable::mult(&self, &rhs)
    }
}

impl Div for RandomVariable {
    type Output = RandomVariable;

    fn div(self, rhs: Self) -> RandomVariable {
        RandomVariable::div(&self, &rhs)
    }
}

impl Neg for RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        RandomVariable::neg(&self)
    }
}

impl Add<f64> for &RandomVariable {
    type Output = RandomVariable;

    fn add(self, rhs: f64) -> RandomVariable {
        self.map(|x| x + rhs)
    }
}

impl Sub<f64> for &RandomVariable {
    type Output = RandomVariable;

    fn sub(self, rhs: f64) -> RandomVariable {
        self.map(|x| x - rhs)
    }
}

impl Mul<f64> for &RandomVariable {
    type Output = RandomVariable;

    fn mul(self, rhs: f64) -> RandomVariable {
        self.map(|x| x * rhs)
    }
}

impl Div<f64> for &RandomVariable {
    type Output = RandomVariable;

    fn div(self, rhs: f64) -> RandomVariable {
        self.map(|x| x / rhs)
    }
}

impl Add<f64> for RandomVariable {
    type Output = RandomVariable;

    fn add(self, rhs: f64) -> RandomVariable {
        &self + rhs
    }
}

impl Sub<f64> for RandomVariable {
    type Output = RandomVariable;

    fn sub(self, rhs: f64) -> RandomVariable {
        &self - rhs
    }
}

impl Mul<f64> for RandomVariable {
    type Output = RandomVariable;

    fn mul(self, rhs: f64) -> RandomVariable {
        &self * rhs
    }
}

impl Div<f64> for RandomVariable {
    type Output = RandomVariable;

    fn div(self, rhs: f64) -> RandomVariable {
        &self / rhs
    }
}

impl Add<RandomVariable> for f64 {
    type Output = RandomVariable;

    fn add(self, rhs: RandomVariable) -> RandomVariable {
        rhs.map(|x| self + x)
    }
}

impl Sub<RandomVariable> for f64 {
    type Output = RandomVariable;

    fn sub(self, rhs: RandomVariable) -> RandomVariable {
        rhs.map(|x| self - x)
    }
}

impl Mul<RandomVariable> for f64 {
    type Output = RandomVariable;

    fn mul(self, rhs: RandomVariable) -> RandomVariable {
        rhs.map(|x| self * x)
    }
}

impl Div<RandomVariable> for f64 {
    type Output = RandomVariable;

    fn div(self, rhs: RandomVariable) -> RandomVariable {
        rhs.map(|x| self / x)
    }
}
