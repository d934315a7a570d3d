//! Loading trained artifacts from disk.
//!
//! `encoders.json` maps each categorical field to its class list:
//!
//! ```json
//! { "campus": ["Francistown", "Gaborone"], "program": [...], "source": [...],
//!   "parent_education": [...], "gender": ["Female", "Male"] }
//! ```

use super::{
    CategoricalEncoder, EncoderSet, LabelEncoder, LogisticModel, ModelError, ProbabilityModel,
    RiskClassifier,
};
use crate::config::ArtifactsConfig;
use crate::features::FEATURE_NAMES;
use crate::profile::CategoricalField;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no encoder for field {0}")]
    MissingEncoder(CategoricalField),
    #[error("encoder for field {0} has no classes")]
    EmptyEncoder(CategoricalField),
    #[error("feature order mismatch at column {index}: model expects {expected:?}, assembler produces {found:?}")]
    FeatureOrderMismatch {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("model was trained on {expected} features, assembler produces {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("unsupported model format: {}", .0.display())]
    UnsupportedModel(PathBuf),
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn read(path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    serde_json::from_str(&read(path)?).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_encoders(path: &Path) -> Result<EncoderSet, ArtifactError> {
    let mut by_field: BTreeMap<CategoricalField, LabelEncoder> = parse(path)?;
    let mut take = |field: CategoricalField| -> Result<LabelEncoder, ArtifactError> {
        let encoder = by_field
            .remove(&field)
            .ok_or(ArtifactError::MissingEncoder(field))?;
        if encoder.classes().is_empty() {
            return Err(ArtifactError::EmptyEncoder(field));
        }
        Ok(encoder)
    };
    Ok(EncoderSet::new(
        take(CategoricalField::Campus)?,
        take(CategoricalField::Program)?,
        take(CategoricalField::Source)?,
        take(CategoricalField::ParentEducation)?,
        take(CategoricalField::Gender)?,
    ))
}

pub fn load_feature_manifest(path: &Path) -> Result<Vec<String>, ArtifactError> {
    parse(path)
}

/// Check a trained feature order against the assembler's column order.
pub fn verify_feature_order(names: &[String]) -> Result<(), ArtifactError> {
    if names.len() != FEATURE_NAMES.len() {
        return Err(ArtifactError::FeatureCount {
            expected: names.len(),
            found: FEATURE_NAMES.len(),
        });
    }
    for (index, (expected, found)) in names.iter().zip(FEATURE_NAMES).enumerate() {
        if expected != found {
            return Err(ArtifactError::FeatureOrderMismatch {
                index,
                expected: expected.clone(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// Load a model by extension: `.json` logistic coefficients or `.onnx` (feature `onnx`).
pub fn load_model(path: &Path) -> Result<Box<dyn ProbabilityModel>, ArtifactError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let model: LogisticModel = parse(path)?;
            model.validate()?;
            if !model.feature_names.is_empty() {
                verify_feature_order(&model.feature_names)?;
            }
            Ok(Box::new(model))
        }
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Box::new(super::OnnxClassifier::load(path)?)),
        _ => Err(ArtifactError::UnsupportedModel(path.to_path_buf())),
    }
}

/// Load encoders and model, checking the feature manifest when one is configured and present.
pub fn load_classifier(config: &ArtifactsConfig) -> Result<RiskClassifier, ArtifactError> {
    if let Some(manifest) = config.features_path().filter(|p| p.exists()) {
        verify_feature_order(&load_feature_manifest(&manifest)?)?;
    }
    let encoders = load_encoders(&config.encoders_path())?;
    let model = load_model(&config.model_path())?;
    info!(dir = %config.dir.display(), model = %config.model_file, "artifacts loaded");
    Ok(RiskClassifier::new(encoders, model))
}
