//! Historical student records and the descriptive views built on them.
//!
//! - [`dataset`]: CSV loading and filtering
//! - [`report`]: Enrollment, retention, growth and campus aggregates
//! - [`alerts`]: At-risk alert board and escalation steps

pub mod alerts;
pub mod dataset;
pub mod report;

pub use dataset::{DatasetError, StudentDataset, TargetError};

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StudentStatus {
    Active,
    Graduated,
    #[serde(rename = "Dropped Out")]
    DroppedOut,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 4] = [
        StudentStatus::Active,
        StudentStatus::Graduated,
        StudentStatus::DroppedOut,
        StudentStatus::OnLeave,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Active" => Some(StudentStatus::Active),
            "Graduated" => Some(StudentStatus::Graduated),
            "Dropped Out" => Some(StudentStatus::DroppedOut),
            "On Leave" => Some(StudentStatus::OnLeave),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Active => "Active",
            StudentStatus::Graduated => "Graduated",
            StudentStatus::DroppedOut => "Dropped Out",
            StudentStatus::OnLeave => "On Leave",
        }
    }

    /// Finished the program one way or the other
    pub fn is_completed(&self) -> bool {
        matches!(self, StudentStatus::Graduated | StudentStatus::DroppedOut)
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk level assigned to enrolled students by the batch scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HistoricalRisk {
    Critical,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
}

impl HistoricalRisk {
    pub const ALL: [HistoricalRisk; 4] = [
        HistoricalRisk::Critical,
        HistoricalRisk::High,
        HistoricalRisk::Medium,
        HistoricalRisk::Low,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Critical" => Some(HistoricalRisk::Critical),
            "High Risk" => Some(HistoricalRisk::High),
            "Medium Risk" => Some(HistoricalRisk::Medium),
            "Low Risk" => Some(HistoricalRisk::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoricalRisk::Critical => "Critical",
            HistoricalRisk::High => "High Risk",
            HistoricalRisk::Medium => "Medium Risk",
            HistoricalRisk::Low => "Low Risk",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HistoricalRisk::Critical => "Attendance below 60% or grade below 40%. Without intervention this week, they will likely drop out this semester.",
            HistoricalRisk::High => "Attendance 60-74% or grade 40-54%. Schedule a meeting with student and parent/guardian to provide support.",
            HistoricalRisk::Medium => "Some warning signs (low attendance or 1-2 failed courses). Keep a closer eye on their progress this semester.",
            HistoricalRisk::Low => "Attending regularly, passing courses. Continue normal support.",
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, HistoricalRisk::Critical | HistoricalRisk::High)
    }
}

impl fmt::Display for HistoricalRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub age: u32,
    pub gender: String,
    pub campus: String,
    pub program: String,
    pub year_enrolled: i32,
    pub semester_enrolled: String,
    pub enrollment_source: String,
    pub distance_km: f64,
    pub has_transport: bool,
    pub has_financial_aid: bool,
    pub attendance_rate_pct: f64,
    pub grade_average_pct: f64,
    pub courses_failed: u32,
    pub warnings_issued: u32,
    pub status: StudentStatus,
    /// Flag from the batch scoring run; false when the column is absent
    pub at_risk: bool,
    pub risk_level: Option<HistoricalRisk>,
    pub dropout_probability: Option<f64>,
}

impl StudentRecord {
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

/// Program/campus narrowing; `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub program: Option<String>,
    pub campus: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.program.as_ref().map_or(true, |p| *p == record.program)
            && self.campus.as_ref().map_or(true, |c| *c == record.campus)
    }
}
