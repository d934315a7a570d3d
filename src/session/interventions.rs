//! Intervention log: meetings, calls and referrals made for enrolled students.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Days until follow-up when staff leave the date blank.
pub const DEFAULT_FOLLOW_UP_DAYS: u64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum InterventionError {
    #[error("staff name is required")]
    MissingStaff,
    #[error("student id is required")]
    MissingStudent,
    #[error("unknown intervention type {0:?}")]
    UnknownKind(String),
    #[error("unknown outcome {0:?}")]
    UnknownOutcome(String),
    #[error("intervention export: {0}")]
    Csv(#[from] csv::Error),
}

macro_rules! labelled_enum {
    ($name:ident, $err:ident { $($variant:ident => $label:literal, $slug:literal;)+ }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn slug(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        /// Accepts the slug or the label, case-insensitively.
        impl FromStr for $name {
            type Err = InterventionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.slug().eq_ignore_ascii_case(s) || v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| InterventionError::$err(s.to_string()))
            }
        }
    };
}

labelled_enum!(InterventionKind, UnknownKind {
    PhoneCall => "Phone Call", "phone-call";
    InPersonMeeting => "In-Person Meeting", "meeting";
    EmailSent => "Email Sent", "email";
    SmsSent => "SMS Sent", "sms";
    ParentMeeting => "Parent/Guardian Meeting", "parent-meeting";
    CounselorReferral => "Counselor Referral", "counselor-referral";
    TutoringArranged => "Tutoring Arranged", "tutoring";
    FinancialAidDiscussion => "Financial Aid Discussion", "financial-aid";
    AcademicWarning => "Academic Warning Issued", "academic-warning";
    StudyPlanCreated => "Study Plan Created", "study-plan";
});

labelled_enum!(InterventionOutcome, UnknownOutcome {
    RespondedPositively => "Student responded positively", "responded-positively";
    AgreedToPlan => "Student agreed to action plan", "agreed-to-plan";
    NoResponse => "No response yet", "no-response";
    DeclinedSupport => "Student declined support", "declined-support";
    ParentInvolved => "Parent involved and supportive", "parent-involved";
    ReferredToCounseling => "Referred to counseling", "referred-to-counseling";
    Resolved => "Issue resolved", "resolved";
    Unchanged => "Situation unchanged", "unchanged";
});

#[derive(Debug, Clone, PartialEq)]
pub struct InterventionRequest {
    pub student_id: String,
    pub kind: InterventionKind,
    pub outcome: InterventionOutcome,
    pub staff: String,
    /// Defaults to the logging date plus [`DEFAULT_FOLLOW_UP_DAYS`]
    pub follow_up: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionEntry {
    pub id: Uuid,
    pub student_id: String,
    pub date: NaiveDate,
    #[serde(rename = "intervention")]
    pub kind: InterventionKind,
    pub outcome: InterventionOutcome,
    pub staff: String,
    pub follow_up: NaiveDate,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct InterventionLog {
    entries: Vec<InterventionEntry>,
}

impl InterventionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_csv(path: &Path) -> Result<Self, InterventionError> {
        Ok(Self {
            entries: super::read_csv(path)?,
        })
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), InterventionError> {
        let file = std::fs::File::create(path).map_err(csv::Error::from)?;
        self.write_csv(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), InterventionError> {
        super::write_csv(&self.entries, writer)?;
        Ok(())
    }

    pub fn record(
        &mut self,
        request: InterventionRequest,
        date: NaiveDate,
    ) -> Result<&InterventionEntry, InterventionError> {
        if request.staff.trim().is_empty() {
            return Err(InterventionError::MissingStaff);
        }
        if request.student_id.trim().is_empty() {
            return Err(InterventionError::MissingStudent);
        }
        let follow_up = request
            .follow_up
            .or_else(|| date.checked_add_days(Days::new(DEFAULT_FOLLOW_UP_DAYS)))
            .unwrap_or(date);

        let entry = InterventionEntry {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            date,
            kind: request.kind,
            outcome: request.outcome,
            staff: request.staff,
            follow_up,
            notes: request.notes,
        };
        info!(
            student_id = %entry.student_id,
            kind = entry.kind.slug(),
            outcome = entry.outcome.slug(),
            "intervention logged"
        );
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    pub fn for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a InterventionEntry> + 'a {
        self.entries.iter().filter(move |e| e.student_id == student_id)
    }

    pub fn all(&self) -> &[InterventionEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(student: &str, staff: &str) -> InterventionRequest {
        InterventionRequest {
            student_id: student.into(),
            kind: InterventionKind::PhoneCall,
            outcome: InterventionOutcome::NoResponse,
            staff: staff.into(),
            follow_up: None,
            notes: "left voicemail".into(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn follow_up_defaults_to_a_week_out() {
        let mut log = InterventionLog::new();
        let e = log.record(request("GTC0042", "Ms. Kgosi"), day(2)).unwrap();
        assert_eq!(e.follow_up, day(9));

        let mut explicit = request("GTC0042", "Ms. Kgosi");
        explicit.follow_up = Some(day(20));
        let e = log.record(explicit, day(2)).unwrap();
        assert_eq!(e.follow_up, day(20));
    }

    #[test]
    fn staff_is_required() {
        let mut log = InterventionLog::new();
        assert!(matches!(
            log.record(request("GTC0042", " "), day(2)),
            Err(InterventionError::MissingStaff)
        ));
        assert!(log.all().is_empty());
    }

    #[test]
    fn entries_filter_by_student() {
        let mut log = InterventionLog::new();
        log.record(request("A", "x"), day(1)).unwrap();
        log.record(request("B", "x"), day(1)).unwrap();
        log.record(request("A", "y"), day(4)).unwrap();
        assert_eq!(log.for_student("A").count(), 2);
        assert_eq!(log.all().len(), 3);
    }

    #[test]
    fn kinds_parse_from_slug_or_label() {
        assert_eq!(InterventionKind::ALL.len(), 10);
        assert_eq!(InterventionOutcome::ALL.len(), 8);
        assert_eq!("sms".parse::<InterventionKind>().unwrap(), InterventionKind::SmsSent);
        assert_eq!(
            "Parent/Guardian Meeting".parse::<InterventionKind>().unwrap(),
            InterventionKind::ParentMeeting
        );
        assert_eq!(
            "RESOLVED".parse::<InterventionOutcome>().unwrap(),
            InterventionOutcome::Resolved
        );
        assert!(matches!(
            "carrier pigeon".parse::<InterventionKind>(),
            Err(InterventionError::UnknownKind(_))
        ));
    }

    #[test]
    fn csv_uses_display_labels() {
        let mut log = InterventionLog::new();
        log.record(request("GTC0042", "Ms. Kgosi"), day(2)).unwrap();
        let mut buf = Vec::new();
        log.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("id,student_id,date,intervention,outcome,staff,follow_up,notes"));
        assert!(text.contains("Phone Call,No response yet,Ms. Kgosi,2026-03-09"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interventions.csv");
        log.save_csv(&path).unwrap();
        assert_eq!(InterventionLog::load_csv(&path).unwrap().all(), log.all());
    }
}
