//! ONNX Runtime inference for the dropout classifier. Input: [1, FEATURE_DIM] f32,
//! output: class probabilities `[1, 2]`, column 1 being the dropout class.
//! Classifiers exported with skl2onnx must use `zipmap=False`.

use super::{ModelError, ProbabilityModel};
use crate::features::{FeatureVector, FEATURE_DIM};
use ndarray::{Array2, CowArray};
use ort::tensor::OrtOwnedTensor;
use ort::{Environment, GraphOptimizationLevel, OrtError, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static ORT_ENV: OnceLock<Arc<Environment>> = OnceLock::new();

fn environment() -> Result<Arc<Environment>, OrtError> {
    if let Some(env) = ORT_ENV.get() {
        return Ok(env.clone());
    }
    let env = Environment::builder()
        .with_name("student-success")
        .build()?
        .into_arc();
    Ok(ORT_ENV.get_or_init(|| env).clone())
}

impl From<OrtError> for ModelError {
    fn from(err: OrtError) -> Self {
        ModelError::Inference(err.to_string())
    }
}

pub struct OnnxClassifier {
    session: Session,
    probability_output: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let env = environment()?;
        let session = SessionBuilder::new(&env)?
            .with_optimization_level(GraphOptimizationLevel::Level1)?
            .with_intra_threads(1)?
            .with_model_from_file(path)?;

        // skl2onnx emits (label, probabilities); fall back to the last output.
        let probability_output = session
            .outputs
            .iter()
            .position(|o| o.name == "probabilities")
            .unwrap_or_else(|| session.outputs.len().saturating_sub(1));

        tracing::info!(
            path = %path.display(),
            output = probability_output,
            "ONNX classifier loaded"
        );
        Ok(Self {
            session,
            probability_output,
        })
    }
}

impl ProbabilityModel for OnnxClassifier {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let arr = Array2::from_shape_vec((1, FEATURE_DIM), features.as_slice().to_vec())
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let input = CowArray::from(arr).into_dyn();
        let inputs = vec![Value::from_array(self.session.allocator(), &input)?];
        let outputs = self.session.run(inputs)?;

        let out = outputs
            .get(self.probability_output)
            .ok_or_else(|| ModelError::Inference("probability output missing".into()))?;
        let tensor: OrtOwnedTensor<f32, _> = out.try_extract()?;
        let view = tensor.view();
        let p = view
            .iter()
            .nth(1)
            .copied()
            .ok_or_else(|| ModelError::Inference("expected two class probabilities".into()))?;
        Ok(f64::from(p))
    }
}
