//! Classifier adapter: raw categorical values in, dropout probability out.
//!
//! Unknown categorical values never abort scoring. When any field fails to encode,
//! every categorical column of that call is coded [`EncodedCategoricals::FALLBACK_CODE`]
//! and the event is logged.

use super::{EncodeError, EncoderSet, ModelError, ProbabilityModel};
use crate::features::{EncodedCategoricals, FeatureVector};
use crate::profile::{CandidateProfile, CategoricalField};
use tracing::warn;

pub struct RiskClassifier {
    encoders: EncoderSet,
    model: Box<dyn ProbabilityModel>,
}

impl RiskClassifier {
    pub fn new(encoders: EncoderSet, model: Box<dyn ProbabilityModel>) -> Self {
        Self { encoders, model }
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn encode_categorical(
        &self,
        field: CategoricalField,
        raw_value: &str,
    ) -> Result<i64, EncodeError> {
        self.encoders.encode(field, raw_value)
    }

    /// Encode all categorical fields of a profile, applying the fallback policy.
    pub fn encode_profile(&self, profile: &CandidateProfile) -> EncodedCategoricals {
        match self.encoders.encode_all(|field| profile.categorical(field)) {
            Ok(encoded) => encoded,
            Err((field, err)) => {
                warn!(
                    field = %field,
                    value = %err.value,
                    "unknown categorical value; coding all categoricals as fallback"
                );
                EncodedCategoricals::fallback()
            }
        }
    }

    /// Dropout-class probability in [0, 1].
    pub fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let p = self.model.predict_probability(features)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::OutOfRange(p));
        }
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FixedProbability, LabelEncoder};

    fn classifier(p: f64) -> RiskClassifier {
        RiskClassifier::new(
            EncoderSet::new(
                LabelEncoder::fit(["Francistown", "Gaborone", "Maun"]),
                LabelEncoder::fit(["Certificate in Welding", "Diploma in IT"]),
                LabelEncoder::fit(["Radio", "Referral", "Social Media"]),
                LabelEncoder::fit(["None", "Primary", "Secondary", "Tertiary"]),
                LabelEncoder::fit(["Female", "Male"]),
            ),
            Box::new(FixedProbability(p)),
        )
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            name: "Thato".into(),
            national_id: "987".into(),
            age: 22,
            distance_km: 8.0,
            year_enrolled: 2026,
            gender: "Male".into(),
            campus: "Maun".into(),
            program: "Diploma in IT".into(),
            source: "Referral".into(),
            parent_education: "Secondary".into(),
            has_transport: true,
            applying_for_financial_aid: true,
            working_part_time: false,
        }
    }

    #[test]
    fn known_values_encode_per_field() {
        let c = classifier(0.1);
        assert_eq!(
            c.encode_profile(&profile()),
            EncodedCategoricals {
                campus: 2,
                program: 1,
                source: 1,
                parent_education: 2,
                gender: 1,
            }
        );
        assert_eq!(c.encode_categorical(CategoricalField::Campus, "Gaborone"), Ok(1));
    }

    #[test]
    fn one_unknown_value_zeroes_every_field() {
        let c = classifier(0.1);
        let mut p = profile();
        p.campus = "Kasane".into();
        assert_eq!(c.encode_profile(&p), EncodedCategoricals::fallback());
        assert!(c.encode_categorical(CategoricalField::Campus, "Kasane").is_err());
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        let fv = FeatureVector::from_values([0.0; crate::features::FEATURE_DIM]);
        assert!(matches!(
            classifier(1.2).predict_probability(&fv),
            Err(ModelError::OutOfRange(_))
        ));
        assert!(classifier(f64::NAN).predict_probability(&fv).is_err());
        assert_eq!(classifier(1.0).predict_probability(&fv).unwrap(), 1.0);
    }
}
