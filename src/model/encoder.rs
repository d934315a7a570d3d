//! Label encoders for the categorical registration fields.

use crate::features::EncodedCategoricals;
use crate::profile::CategoricalField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a known class")]
pub struct EncodeError {
    pub value: String,
}

pub trait CategoricalEncoder: Send + Sync {
    /// Known classes, in code order
    fn classes(&self) -> &[String];
    fn encode(&self, value: &str) -> Result<i64, EncodeError>;
}

/// Code = index of the value among the sorted, de-duplicated classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }
}

impl From<Vec<String>> for LabelEncoder {
    fn from(classes: Vec<String>) -> Self {
        Self::fit(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(e: LabelEncoder) -> Self {
        e.classes
    }
}

impl CategoricalEncoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn encode(&self, value: &str) -> Result<i64, EncodeError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map(|i| i as i64)
            .map_err(|_| EncodeError {
                value: value.to_string(),
            })
    }
}

/// One encoder per [`CategoricalField`].
pub struct EncoderSet {
    encoders: [Box<dyn CategoricalEncoder>; 5],
}

impl EncoderSet {
    pub fn new(
        campus: impl CategoricalEncoder + 'static,
        program: impl CategoricalEncoder + 'static,
        source: impl CategoricalEncoder + 'static,
        parent_education: impl CategoricalEncoder + 'static,
        gender: impl CategoricalEncoder + 'static,
    ) -> Self {
        Self {
            encoders: [
                Box::new(campus),
                Box::new(program),
                Box::new(source),
                Box::new(parent_education),
                Box::new(gender),
            ],
        }
    }

    pub fn encoder(&self, field: CategoricalField) -> &dyn CategoricalEncoder {
        self.encoders[field.index()].as_ref()
    }

    pub fn classes(&self, field: CategoricalField) -> &[String] {
        self.encoder(field).classes()
    }

    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<i64, EncodeError> {
        self.encoder(field).encode(value)
    }

    /// Encode every field, failing on the first unknown value.
    pub fn encode_all<'a>(
        &self,
        value_of: impl Fn(CategoricalField) -> &'a str,
    ) -> Result<EncodedCategoricals, (CategoricalField, EncodeError)> {
        let code = |field: CategoricalField| {
            self.encode(field, value_of(field)).map_err(|e| (field, e))
        };
        Ok(EncodedCategoricals {
            campus: code(CategoricalField::Campus)?,
            program: code(CategoricalField::Program)?,
            source: code(CategoricalField::Source)?,
            parent_education: code(CategoricalField::ParentEducation)?,
            gender: code(CategoricalField::Gender)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sorted_classes() {
        let e = LabelEncoder::fit(["Tertiary", "None", "Secondary", "Primary", "None"]);
        assert_eq!(e.classes(), &["None", "Primary", "Secondary", "Tertiary"]);
        assert_eq!(e.encode("None"), Ok(0));
        assert_eq!(e.encode("Tertiary"), Ok(3));
    }

    #[test]
    fn unknown_value_is_an_error() {
        let e = LabelEncoder::fit(["Male", "Female"]);
        let err = e.encode("Other").unwrap_err();
        assert_eq!(err.value, "Other");
        assert!(e.encode("male").is_err());
    }

    #[test]
    fn deserializes_from_unsorted_list() {
        let e: LabelEncoder = serde_json::from_str(r#"["Maun","Gaborone","Francistown"]"#).unwrap();
        assert_eq!(e.encode("Francistown"), Ok(0));
        assert_eq!(e.encode("Maun"), Ok(2));
    }

    #[test]
    fn encode_all_reports_failing_field() {
        let set = EncoderSet::new(
            LabelEncoder::fit(["Gaborone"]),
            LabelEncoder::fit(["Diploma in IT"]),
            LabelEncoder::fit(["Radio"]),
            LabelEncoder::fit(["None", "Primary"]),
            LabelEncoder::fit(["Female", "Male"]),
        );
        let ok = set
            .encode_all(|f| match f {
                CategoricalField::Campus => "Gaborone",
                CategoricalField::Program => "Diploma in IT",
                CategoricalField::Source => "Radio",
                CategoricalField::ParentEducation => "Primary",
                CategoricalField::Gender => "Male",
            })
            .unwrap();
        assert_eq!(ok.parent_education, 1);
        assert_eq!(ok.gender, 1);

        let (field, err) = set
            .encode_all(|f| match f {
                CategoricalField::Source => "Billboard",
                CategoricalField::Campus => "Gaborone",
                CategoricalField::Program => "Diploma in IT",
                CategoricalField::ParentEducation => "Primary",
                CategoricalField::Gender => "Male",
            })
            .unwrap_err();
        assert_eq!(field, CategoricalField::Source);
        assert_eq!(err.value, "Billboard");
    }
}
