//! Logistic-regression classifier exported as JSON coefficients.
//! `p = sigmoid(intercept + Σ wᵢ·xᵢ)`.

use super::{ModelError, ProbabilityModel};
use crate::features::{FeatureVector, FEATURE_DIM};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Column names in training order; empty when the export omitted them
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: Vec::new(),
            coefficients,
            intercept,
        }
    }

    /// Reject coefficient vectors that cannot line up with the assembled features.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_DIM {
            return Err(ModelError::Dimension {
                expected: FEATURE_DIM,
                found: self.coefficients.len(),
            });
        }
        Ok(())
    }
}

impl ProbabilityModel for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        self.validate()?;
        let z = features
            .as_slice()
            .iter()
            .zip(&self.coefficients)
            .fold(self.intercept, |acc, (x, w)| acc + f64::from(*x) * w);
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}
