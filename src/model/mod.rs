//! Externally trained artifacts behind fixed contracts.
//!
//! - [`CategoricalEncoder`]: fitted value → integer code mapping, one per field
//! - [`ProbabilityModel`]: feature vector → dropout probability in [0, 1]
//! - [`RiskClassifier`]: both of the above behind one call, with the encoding
//!   fallback policy applied

mod adapter;
mod artifacts;
mod encoder;
mod linear;
#[cfg(feature = "onnx")]
mod onnx;

pub use adapter::RiskClassifier;
pub use artifacts::{
    load_classifier, load_encoders, load_feature_manifest, load_model, verify_feature_order,
    ArtifactError,
};
pub use encoder::{CategoricalEncoder, EncodeError, EncoderSet, LabelEncoder};
pub use linear::LogisticModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use crate::features::FeatureVector;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model expects {expected} features, got {found}")]
    Dimension { expected: usize, found: usize },
    #[error("model returned probability {0} outside [0, 1]")]
    OutOfRange(f64),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Trained binary classifier; returns the positive ("dropout") class probability.
pub trait ProbabilityModel: Send + Sync {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// Constant-output model for dry runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbability(pub f64);

impl ProbabilityModel for FixedProbability {
    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
        Ok(self.0)
    }
}
