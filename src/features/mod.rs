//! Fixed-order feature vector for the dropout classifier.
//!
//! The order of [`FEATURE_NAMES`] is a contract with the trained model: weights are
//! positional, so every column must always land at the same index.

mod assembler;
mod derived;

pub use assembler::FeatureAssembler;
pub use derived::DerivedFlags;

use serde::{Deserialize, Serialize};

/// Number of columns the classifier consumes
pub const FEATURE_DIM: usize = 22;

pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "age",
    "distance_from_campus_km",
    "has_transport",
    "has_financial_aid",
    "working_part_time",
    "attendance_rate_pct",
    "grade_average_pct",
    "courses_failed",
    "warnings_issued",
    "program_length",
    "year_enrolled",
    "campus_enc",
    "program_enc",
    "source_enc",
    "parent_education_enc",
    "gender_enc",
    "attendance_low",
    "grade_low",
    "failed_multiple",
    "distance_far",
    "age_mature",
    "parent_low",
];

/// Position of a named column
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}

/// Integer codes for the categorical fields of one profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCategoricals {
    pub campus: i64,
    pub program: i64,
    pub source: i64,
    pub parent_education: i64,
    pub gender: i64,
}

impl EncodedCategoricals {
    /// Code used for every field when any field fails to encode
    pub const FALLBACK_CODE: i64 = 0;

    pub fn fallback() -> Self {
        Self {
            campus: Self::FALLBACK_CODE,
            program: Self::FALLBACK_CODE,
            source: Self::FALLBACK_CODE,
            parent_education: Self::FALLBACK_CODE,
            gender: Self::FALLBACK_CODE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f32; FEATURE_DIM],
}

impl FeatureVector {
    pub fn from_values(values: [f32; FEATURE_DIM]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        feature_index(name).map(|i| self.values[i])
    }

    /// (name, value) pairs in model order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}
