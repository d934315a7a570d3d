//! Feature assembly: candidate profile + encoded categoricals → model-ordered vector.
//!
//! Attendance, grades, failures and warnings do not exist yet for a new registrant,
//! so their columns carry configured placeholders and their severity flags are 0.

use super::{DerivedFlags, EncodedCategoricals, FeatureVector, FEATURE_DIM};
use crate::config::{FlagConfig, PlaceholderConfig};
use crate::profile::CandidateProfile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    placeholders: PlaceholderConfig,
    flags: FlagConfig,
}

impl FeatureAssembler {
    pub fn new(placeholders: PlaceholderConfig, flags: FlagConfig) -> Self {
        Self { placeholders, flags }
    }

    pub fn flags(&self) -> &FlagConfig {
        &self.flags
    }

    pub fn assemble(
        &self,
        profile: &CandidateProfile,
        encoded: &EncodedCategoricals,
    ) -> FeatureVector {
        if !profile.within_trained_range() {
            debug!(
                age = profile.age,
                distance_km = profile.distance_km,
                "profile outside trained range; scoring anyway"
            );
        }

        let derived = DerivedFlags::from_profile(profile, &self.flags);
        let values: [f32; FEATURE_DIM] = [
            profile.age as f32,
            profile.distance_km,
            bit(profile.has_transport),
            bit(profile.applying_for_financial_aid),
            bit(profile.working_part_time),
            self.placeholders.attendance_rate_pct,
            self.placeholders.grade_average_pct,
            self.placeholders.courses_failed as f32,
            self.placeholders.warnings_issued as f32,
            derived.program_length as f32,
            profile.year_enrolled as f32,
            encoded.campus as f32,
            encoded.program as f32,
            encoded.source as f32,
            encoded.parent_education as f32,
            encoded.gender as f32,
            // attendance_low, grade_low, failed_multiple: no history yet
            0.0,
            0.0,
            0.0,
            bit(derived.distance_far),
            bit(derived.age_mature),
            bit(derived.parent_low),
        ];
        FeatureVector::from_values(values)
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(PlaceholderConfig::default(), FlagConfig::default())
    }
}

fn bit(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}
