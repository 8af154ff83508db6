//! Logistic-regression probability model.
//!
//! `z = w · x + b`, `p = σ(z)`. Weights and intercept come from the borrowed
//! `ModelParameters`; `x` is produced by the `FeatureEncoder` against the same
//! parameters, so dimensions always agree.

use crate::features::FeatureVector;
use crate::math::sigmoid;
use crate::models::params::ModelParameters;

#[derive(Debug, Clone, Copy)]
pub struct ProbabilityModel<'a> {
    params: &'a ModelParameters,
}

impl<'a> ProbabilityModel<'a> {
    pub fn new(params: &'a ModelParameters) -> Self {
        Self { params }
    }

    /// Linear predictor `w · x + b`.
    ///
    /// Always finite. If the plain dot product overflows, the terms are summed
    /// again with every partial sum saturated at `±f64::MAX`.
    pub fn score_logodds(&self, vector: &FeatureVector) -> f64 {
        let z = self.params.weights().dot(vector.values()) + self.params.intercept();
        if z.is_finite() {
            return z;
        }
        self.contributions(vector)
            .into_iter()
            .fold(saturate(self.params.intercept()), |acc, term| saturate(acc + term))
    }

    /// Probability of default in `[0, 1]`.
    pub fn predict_probability(&self, vector: &FeatureVector) -> f64 {
        sigmoid(self.score_logodds(vector))
    }

    /// Per-feature contributions `w_i * x_i`, in model order.
    ///
    /// Sums (with the intercept) to `score_logodds`.
    pub fn contributions(&self, vector: &FeatureVector) -> Vec<f64> {
        self.params
            .weights()
            .iter()
            .zip(vector.values().iter())
            .map(|(w, x)| saturate(w * x))
            .collect()
    }
}

/// Clamp to the finite range; NaN (`0 * inf`, `inf - inf`) contributes nothing.
fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}
