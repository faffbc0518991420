//! Statistical reductions over simulation paths.
//!
//! Reductions collapse a path vector into a deterministic value carrying the
//! same observation time. On a deterministic input they degenerate to the
//! single-scenario case (zero variance, the value itself as every extremum).
//!
//! The weighted reductions interpret their second operand as probability
//! weights and assume the weights sum to one; no normalisation is applied.

use super::RandomVariable;

impl RandomVariable {
    /// The sample mean over paths, as a plain float.
    pub fn expectation(&self) -> f64 {
        match self.as_scalar() {
            Some(value) => value,
            None => {
                let values = self.to_vec();
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
    }

    /// The sample mean over paths, as a deterministic value.
    pub fn average(&self) -> Self {
        Self::deterministic(self.time(), self.expectation())
    }

    /// The total over paths, as a deterministic value.
    ///
    /// This is the adjoint of broadcasting: a scalar fanned out over N paths
    /// collects the sum of the per-path sensitivities flowing back into it.
    pub fn sum(&self) -> Self {
        Self::deterministic(self.time(), self.to_vec().iter().sum())
    }

    /// The population variance (divisor N) over paths.
    pub fn variance(&self) -> Self {
        let mean = self.expectation();
        let value = self
            .to_vec()
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / self.size() as f64;
        Self::deterministic(self.time(), value)
    }

    /// The Bessel-corrected sample variance (divisor N−1) over paths.
    ///
    /// A single-scenario input yields 0/0 = NaN, which propagates.
    pub fn sample_variance(&self) -> Self {
        let mean = self.expectation();
        let n = self.size() as f64;
        let value = self
            .to_vec()
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / (n - 1.0);
        Self::deterministic(self.time(), value)
    }

    /// The population standard deviation over paths.
    pub fn standard_deviation(&self) -> Self {
        let variance = self.variance();
        Self::deterministic(self.time(), variance.expectation().sqrt())
    }

    /// The Monte Carlo standard error, σ/√N.
    pub fn standard_error(&self) -> Self {
        let deviation = self.standard_deviation().expectation();
        Self::deterministic(self.time(), deviation / (self.size() as f64).sqrt())
    }

    /// The smallest realisation over paths.
    pub fn min(&self) -> Self {
        let value = self.to_vec().into_iter().fold(f64::INFINITY, f64::min);
        Self::deterministic(self.time(), value)
    }

    /// The largest realisation over paths.
    pub fn max(&self) -> Self {
        let value = self.to_vec().into_iter().fold(f64::NEG_INFINITY, f64::max);
        Self::deterministic(self.time(), value)
    }

    /// The expectation Σ xᵢwᵢ under the given probability weights.
    pub fn average_weighted(&self, weights: &Self) -> Self {
        let product = self.mult(weights);
        let value = product.to_vec().iter().sum::<f64>();
        Self::deterministic(product.time(), value)
    }

    /// The variance Σ wᵢxᵢ² − (Σ wᵢxᵢ)² under the given probability weights.
    pub fn variance_weighted(&self, weights: &Self) -> Self {
        let mean = self.average_weighted(weights).expectation();
        let second_moment = self.squared().average_weighted(weights).expectation();
        let time = self.time().max(weights.time());
        Self::deterministic(time, second_moment - mean * mean)
    }
}
