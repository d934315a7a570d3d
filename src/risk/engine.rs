//! Maps a dropout probability through the configured cutoffs to a risk level and
//! assembles the full assessment.

use super::actions::action_plan;
use super::factors::derive_risk_factors;
use super::RiskAssessment;
use crate::config::{FlagConfig, RiskConfig};
use crate::profile::CandidateProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `< medium` → Low, `medium ≤ p < high` → Medium, `≥ high` → High.
    pub fn from_probability_pct(probability_pct: f64, config: &RiskConfig) -> Self {
        if probability_pct >= config.high_threshold_pct {
            RiskLevel::High
        } else if probability_pct >= config.medium_threshold_pct {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Medium => "MEDIUM RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskConfig,
    flags: FlagConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig, flags: FlagConfig) -> Self {
        Self { config, flags }
    }

    pub fn tier(&self, probability_pct: f64) -> RiskLevel {
        RiskLevel::from_probability_pct(probability_pct, &self.config)
    }

    /// Assessment from a model probability in [0, 1]. Risk factors come from the
    /// profile alone and never move the tier.
    pub fn evaluate(&self, profile: &CandidateProfile, probability: f64) -> RiskAssessment {
        let probability_pct = probability * 100.0;
        let level = self.tier(probability_pct);
        let plan = action_plan(level);
        RiskAssessment {
            probability_pct,
            level,
            risk_factors: derive_risk_factors(profile, &self.flags),
            recommendation: plan.headline.to_string(),
            recommended_actions: plan.actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default(), FlagConfig::default())
    }
}
