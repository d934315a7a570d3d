//! Enrollment recommendation and support plan per risk level.

use super::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPlan {
    pub headline: &'static str,
    pub summary: &'static str,
    pub actions: &'static [&'static str],
}

static STANDARD: ActionPlan = ActionPlan {
    headline: "APPROVE REGISTRATION",
    summary: "This student has a good profile for success. Proceed with standard enrollment.",
    actions: &["Assign to regular academic advisor, no special monitoring needed"],
};

static MONITORING: ActionPlan = ActionPlan {
    headline: "APPROVE WITH MONITORING",
    summary: "This student has some risk factors. Accept them but provide extra support.",
    actions: &[
        "Assign to an academic advisor experienced with at-risk students",
        "Check in after first month to see how they're coping",
        "Flag for early intervention if attendance drops below 80%",
    ],
};

static INTENSIVE_SUPPORT: ActionPlan = ActionPlan {
    headline: "APPROVE WITH INTENSIVE SUPPORT",
    summary: "This student has significant risk factors. They need proactive support to succeed.",
    actions: &[
        "Assign to Student Support Services immediately upon enrollment",
        "Weekly check-ins for first 8 weeks",
        "Connect with counselor if they live far or lack transport; arrange carpooling or accommodation",
        "Priority consideration for financial aid or work-study programs",
        "If attendance drops below 85% in first month, trigger immediate intervention",
    ],
};

pub fn action_plan(level: RiskLevel) -> &'static ActionPlan {
    match level {
        RiskLevel::Low => &STANDARD,
        RiskLevel::Medium => &MONITORING,
        RiskLevel::High => &INTENSIVE_SUPPORT,
    }
}
