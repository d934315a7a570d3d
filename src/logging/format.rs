//! Log output: human or JSON lines via tracing, plus one-off NDJSON records for
//! assessments.

use crate::profile::CandidateProfile;
use crate::risk::RiskAssessment;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Audit record for one scored candidate. Identity fields are left out.
#[derive(Debug, Serialize)]
pub struct AssessmentLogEvent<'a> {
    pub ts: String,
    pub event: &'a str,
    pub campus: &'a str,
    pub program: &'a str,
    pub year_enrolled: i32,
    pub probability_pct: f64,
    pub risk_level: &'a str,
    pub risk_factors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_id: Option<&'a str>,
}

impl<'a> AssessmentLogEvent<'a> {
    pub fn from_assessment(profile: &'a CandidateProfile, assessment: &'a RiskAssessment) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            event: "assessment",
            campus: &profile.campus,
            program: &profile.program,
            year_enrolled: profile.year_enrolled,
            probability_pct: assessment.probability_pct,
            risk_level: assessment.level.as_str(),
            risk_factors: assessment.risk_factors.len(),
            reg_id: None,
        }
    }

    pub fn with_reg_id(mut self, reg_id: &'a str) -> Self {
        self.reg_id = Some(reg_id);
        self
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber. Level comes from RUST_LOG, else `default_level`.
    /// Logs go to stderr; stdout carries command output. Fails when a global
    /// subscriber is already set; the existing one stays in place.
    pub fn init(json: bool, default_level: &str) -> Result<(), TryInitError> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let registry = tracing_subscriber::registry().with(filter);
        if json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::NONE)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        }
    }

    /// Write a single JSON line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }
}
