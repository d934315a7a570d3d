//! CSV loading for the scored student dataset.

use super::{HistoricalRisk, RecordFilter, StudentRecord, StudentStatus};
use serde::{de, Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown status {value:?}")]
    InvalidStatus { line: usize, value: String },
    #[error("line {line}: unknown risk level {value:?}")]
    InvalidRiskLevel { line: usize, value: String },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TargetError {
    #[error("no student with id {0}")]
    NotFound(String),
    #[error("{student_id} is not enrolled ({status})")]
    NotActive {
        student_id: String,
        status: StudentStatus,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StudentDataset {
    records: Vec<StudentRecord>,
}

impl StudentDataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        info!(path = %path.display(), records = dataset.len(), "student dataset loaded");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (i, row) in csv_reader.deserialize::<StudentRow>().enumerate() {
            // header is line 1
            records.push(row?.into_record(i + 2)?);
        }
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, filter: &RecordFilter) -> StudentDataset {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
        }
    }

    pub fn find(&self, student_id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.student_id == student_id)
    }

    /// Student an intervention may be logged against. Only Active students qualify.
    pub fn intervention_target(&self, student_id: &str) -> Result<&StudentRecord, TargetError> {
        match self.find(student_id) {
            Some(r) if r.is_active() => Ok(r),
            Some(r) => Err(TargetError::NotActive {
                student_id: r.student_id.clone(),
                status: r.status,
            }),
            None => Err(TargetError::NotFound(student_id.to_string())),
        }
    }

    /// Sorted distinct programs, for filter options
    pub fn programs(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.program.as_str()))
    }

    pub fn campuses(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.campus.as_str()))
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

#[derive(Debug, Deserialize)]
struct StudentRow {
    student_id: String,
    age: u32,
    gender: String,
    campus: String,
    program: String,
    year_enrolled: i32,
    #[serde(default)]
    semester_enrolled: String,
    #[serde(default)]
    enrollment_source: String,
    distance_from_campus_km: f64,
    #[serde(deserialize_with = "flag")]
    has_transport: bool,
    #[serde(deserialize_with = "flag")]
    has_financial_aid: bool,
    attendance_rate_pct: f64,
    grade_average_pct: f64,
    courses_failed: u32,
    warnings_issued: u32,
    status: String,
    #[serde(default, deserialize_with = "optional_flag")]
    at_risk: Option<bool>,
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    dropout_probability: Option<f64>,
}

impl StudentRow {
    fn into_record(self, line: usize) -> Result<StudentRecord, DatasetError> {
        let status =
            StudentStatus::parse(&self.status).ok_or_else(|| DatasetError::InvalidStatus {
                line,
                value: self.status.clone(),
            })?;
        let risk_level = match self.risk_level.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(HistoricalRisk::parse(v).ok_or_else(|| {
                DatasetError::InvalidRiskLevel {
                    line,
                    value: v.to_string(),
                }
            })?),
        };

        Ok(StudentRecord {
            student_id: self.student_id,
            age: self.age,
            gender: self.gender,
            campus: self.campus,
            program: self.program,
            year_enrolled: self.year_enrolled,
            semester_enrolled: self.semester_enrolled,
            enrollment_source: self.enrollment_source,
            distance_km: self.distance_from_campus_km,
            has_transport: self.has_transport,
            has_financial_aid: self.has_financial_aid,
            attendance_rate_pct: self.attendance_rate_pct,
            grade_average_pct: self.grade_average_pct,
            courses_failed: self.courses_failed,
            warnings_issued: self.warnings_issued,
            status,
            at_risk: self.at_risk.unwrap_or(false),
            risk_level,
            dropout_probability: self.dropout_probability,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(true),
        "0" | "0.0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid flag {raw:?}")))
}

fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_flag(v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid flag {v:?}"))),
    }
}
