//! Binary and coded features derived from raw registration inputs.

use crate::config::FlagConfig;
use crate::profile::CandidateProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlags {
    /// 1 for certificate programs, 2 otherwise
    pub program_length: u8,
    pub distance_far: bool,
    pub age_mature: bool,
    pub parent_low: bool,
}

impl DerivedFlags {
    pub fn from_profile(profile: &CandidateProfile, flags: &FlagConfig) -> Self {
        Self {
            program_length: if profile.is_short_program() { 1 } else { 2 },
            distance_far: profile.distance_km > flags.far_distance_km,
            age_mature: profile.age > flags.mature_age,
            parent_low: profile.has_low_parent_education(),
        }
    }
}
