//! Risk tiering, rule-based risk factors, action plans, and the scoring pipeline
//! that ties the assembler, classifier and tiering together.

mod actions;
mod engine;
mod factors;
mod scorer;

pub use actions::{action_plan, ActionPlan};
pub use engine::{RiskEngine, RiskLevel};
pub use factors::{derive_risk_factors, RiskFactor};
pub use scorer::{RiskScorer, ScoringError};

use serde::Serialize;

/// Result of scoring one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Dropout probability in percent, 0–100
    pub probability_pct: f64,
    pub level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    /// Enrollment recommendation headline for the level
    pub recommendation: String,
    pub recommended_actions: Vec<String>,
}

impl RiskAssessment {
    /// Probability rounded to whole percent, e.g. `"62%"`
    pub fn score_label(&self) -> String {
        format!("{:.0}%", self.probability_pct)
    }

    pub fn factor_messages(&self) -> Vec<String> {
        self.risk_factors.iter().map(|f| f.to_string()).collect()
    }
}
