//! Registration queue for newly scored candidates.

use crate::profile::CandidateProfile;
use crate::risk::{RiskAssessment, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("full name and national ID are required")]
    MissingIdentity,
    #[error("no registration with id {0}")]
    NotFound(String),
    #[error("registration export: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[default]
    #[serde(rename = "Semester 1")]
    First,
    #[serde(rename = "Semester 2")]
    Second,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[default]
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    Approved,
    Declined,
}

impl RegistrationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RegistrationStatus::PendingApproval => "Pending Approval",
            RegistrationStatus::Approved => "Approved",
            RegistrationStatus::Declined => "Declined",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form contents beyond what the model scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub profile: CandidateProfile,
    #[serde(default)]
    pub semester: Semester,
    #[serde(default)]
    pub phone: String,
    /// Admissions officer saving the registration
    #[serde(default)]
    pub officer: String,
    #[serde(default)]
    pub notes: String,
}

impl RegistrationDraft {
    pub fn new(profile: CandidateProfile) -> Self {
        Self {
            profile,
            semester: Semester::default(),
            phone: String::new(),
            officer: String::new(),
            notes: String::new(),
        }
    }
}

/// One row of the queue export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub reg_id: String,
    pub date: NaiveDate,
    pub student_name: String,
    pub national_id: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
    pub campus: String,
    pub program: String,
    pub year: i32,
    pub semester: Semester,
    pub source: String,
    pub risk_level: RiskLevel,
    /// Rounded percent, e.g. "62%"
    pub risk_score: String,
    pub officer: String,
    pub notes: String,
    pub status: RegistrationStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub declined: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationQueue {
    entries: Vec<Registration>,
}

impl RegistrationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_csv(path: &Path) -> Result<Self, RegistrationError> {
        Ok(Self {
            entries: super::read_csv(path)?,
        })
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), RegistrationError> {
        let file = std::fs::File::create(path).map_err(csv::Error::from)?;
        self.write_csv(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), RegistrationError> {
        super::write_csv(&self.entries, writer)?;
        Ok(())
    }

    /// Queue a scored candidate as pending approval.
    pub fn submit(
        &mut self,
        draft: RegistrationDraft,
        assessment: &RiskAssessment,
        date: NaiveDate,
    ) -> Result<&Registration, RegistrationError> {
        if !draft.profile.has_identity() {
            return Err(RegistrationError::MissingIdentity);
        }
        let reg_id = format!("REG-{:04}", self.entries.len() + 1);
        let p = draft.profile;
        info!(reg_id = %reg_id, level = assessment.level.as_str(), "registration queued");

        self.entries.push(Registration {
            reg_id,
            date,
            student_name: p.name,
            national_id: p.national_id,
            age: p.age,
            gender: p.gender,
            phone: draft.phone,
            campus: p.campus,
            program: p.program,
            year: p.year_enrolled,
            semester: draft.semester,
            source: p.source,
            risk_level: assessment.level,
            risk_score: assessment.score_label(),
            officer: draft.officer,
            notes: draft.notes,
            status: RegistrationStatus::PendingApproval,
        });
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    pub fn set_status(
        &mut self,
        reg_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), RegistrationError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|r| r.reg_id == reg_id)
            .ok_or_else(|| RegistrationError::NotFound(reg_id.to_string()))?;
        entry.status = status;
        Ok(())
    }

    pub fn get(&self, reg_id: &str) -> Option<&Registration> {
        self.entries.iter().find(|r| r.reg_id == reg_id)
    }

    pub fn list(&self) -> &[Registration] {
        &self.entries
    }

    pub fn counts(&self) -> QueueCounts {
        let with = |s| self.entries.iter().filter(|r| r.status == s).count();
        QueueCounts {
            total: self.entries.len(),
            pending: with(RegistrationStatus::PendingApproval),
            approved: with(RegistrationStatus::Approved),
            declined: with(RegistrationStatus::Declined),
        }
    }
}
