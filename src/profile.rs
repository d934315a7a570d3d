//! Candidate profile captured by the registration form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Ages the classifier was trained on. Values outside are scored anyway.
pub const AGE_RANGE: RangeInclusive<u32> = 16..=65;
/// Distances (km) the registration form accepts.
pub const DISTANCE_RANGE_KM: RangeInclusive<f32> = 0.5..=150.0;
/// Enrollment years offered on the registration form.
pub const ENROLLMENT_YEARS: [i32; 3] = [2024, 2025, 2026];
/// Parent/guardian education options on the registration form.
pub const PARENT_EDUCATION_LEVELS: [&str; 4] = ["None", "Primary", "Secondary", "Tertiary"];
/// Parent education levels treated as "low".
pub const LOW_PARENT_EDUCATION: [&str; 2] = ["None", "Primary"];
/// Gender options on the registration form.
pub const GENDERS: [&str; 2] = ["Male", "Female"];

/// Categorical inputs, each backed by its own fitted encoder.
/// Declaration order is the order of the encoded columns in the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Campus,
    Program,
    Source,
    ParentEducation,
    Gender,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Campus,
        CategoricalField::Program,
        CategoricalField::Source,
        CategoricalField::ParentEducation,
        CategoricalField::Gender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalField::Campus => "campus",
            CategoricalField::Program => "program",
            CategoricalField::Source => "source",
            CategoricalField::ParentEducation => "parent_education",
            CategoricalField::Gender => "gender",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Identity fields; opaque to scoring
    pub name: String,
    pub national_id: String,
    pub age: u32,
    pub distance_km: f32,
    pub year_enrolled: i32,
    pub gender: String,
    pub campus: String,
    pub program: String,
    /// How the candidate heard about the college
    pub source: String,
    pub parent_education: String,
    pub has_transport: bool,
    pub applying_for_financial_aid: bool,
    pub working_part_time: bool,
}

impl CandidateProfile {
    /// Raw value of a categorical field
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Campus => &self.campus,
            CategoricalField::Program => &self.program,
            CategoricalField::Source => &self.source,
            CategoricalField::ParentEducation => &self.parent_education,
            CategoricalField::Gender => &self.gender,
        }
    }

    pub fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() && !self.national_id.trim().is_empty()
    }

    /// Short-form programs are certificates.
    pub fn is_short_program(&self) -> bool {
        self.program.contains("Certificate")
    }

    pub fn has_low_parent_education(&self) -> bool {
        LOW_PARENT_EDUCATION.contains(&self.parent_education.as_str())
    }

    /// Whether age and distance fall inside what the model saw in training.
    pub fn within_trained_range(&self) -> bool {
        AGE_RANGE.contains(&self.age) && DISTANCE_RANGE_KM.contains(&self.distance_km)
    }
}
