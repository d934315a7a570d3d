//! Scoring pipeline: profile → features → probability → assessment.
//! Stateless and idempotent; the classifier is only ever read.

use super::{RiskAssessment, RiskEngine};
use crate::config::AppConfig;
use crate::features::{FeatureAssembler, FeatureVector};
use crate::model::{ModelError, RiskClassifier};
use crate::profile::CandidateProfile;
use tracing::debug;

/// The score cannot be produced without the model; the caller decides whether to
/// block the registration or continue unscored.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("dropout model unavailable: {0}")]
    Model(#[from] ModelError),
}

pub struct RiskScorer {
    assembler: FeatureAssembler,
    classifier: RiskClassifier,
    engine: RiskEngine,
}

impl RiskScorer {
    pub fn new(assembler: FeatureAssembler, classifier: RiskClassifier, engine: RiskEngine) -> Self {
        Self {
            assembler,
            classifier,
            engine,
        }
    }

    pub fn from_config(config: &AppConfig, classifier: RiskClassifier) -> Self {
        Self::new(
            FeatureAssembler::new(config.placeholders.clone(), config.flags.clone()),
            classifier,
            RiskEngine::new(config.risk.clone(), config.flags.clone()),
        )
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Feature vector the model sees for this profile
    pub fn features(&self, profile: &CandidateProfile) -> FeatureVector {
        let encoded = self.classifier.encode_profile(profile);
        self.assembler.assemble(profile, &encoded)
    }

    pub fn assess(&self, profile: &CandidateProfile) -> Result<RiskAssessment, ScoringError> {
        let features = self.features(profile);
        let probability = self.classifier.predict_probability(&features)?;
        let assessment = self.engine.evaluate(profile, probability);
        debug!(
            probability_pct = assessment.probability_pct,
            level = assessment.level.as_str(),
            factors = assessment.risk_factors.len(),
            "candidate scored"
        );
        Ok(assessment)
    }
}
