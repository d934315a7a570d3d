//! Rule-based risk factors shown next to the tier as a human-readable cross-check.

use crate::config::FlagConfig;
use crate::profile::CandidateProfile;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFactor {
    FarDistance { distance_km: f32 },
    NoTransport,
    WorkingPartTime,
    LowParentEducation,
    NoFinancialAid,
    MatureAge { age: u32 },
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::FarDistance { distance_km } => write!(
                f,
                "Lives {distance_km:.0}km from campus; commute is difficult"
            ),
            RiskFactor::NoTransport => {
                f.write_str("No personal transport; relies on public transport")
            }
            RiskFactor::WorkingPartTime => {
                f.write_str("Working part-time; may struggle to balance job and studies")
            }
            RiskFactor::LowParentEducation => f.write_str(
                "Low parent/guardian education; less academic support at home",
            ),
            RiskFactor::NoFinancialAid => {
                f.write_str("Not applying for financial aid; may face financial pressure")
            }
            RiskFactor::MatureAge { age } => write!(
                f,
                "Age {age}; mature students often face work/family competing priorities"
            ),
        }
    }
}

/// Flags in fixed display order.
pub fn derive_risk_factors(profile: &CandidateProfile, flags: &FlagConfig) -> Vec<RiskFactor> {
    let mut out = Vec::new();
    if profile.distance_km > flags.far_distance_km {
        out.push(RiskFactor::FarDistance {
            distance_km: profile.distance_km,
        });
    }
    if !profile.has_transport {
        out.push(RiskFactor::NoTransport);
    }
    if profile.working_part_time {
        out.push(RiskFactor::WorkingPartTime);
    }
    if profile.has_low_parent_education() {
        out.push(RiskFactor::LowParentEducation);
    }
    if !profile.applying_for_financial_aid {
        out.push(RiskFactor::NoFinancialAid);
    }
    if profile.age > flags.mature_age {
        out.push(RiskFactor::MatureAge { age: profile.age });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_risk() -> CandidateProfile {
        CandidateProfile {
            name: "Lesedi".into(),
            national_id: "555".into(),
            age: 20,
            distance_km: 10.0,
            year_enrolled: 2025,
            gender: "Female".into(),
            campus: "Gaborone".into(),
            program: "Diploma in IT".into(),
            source: "Referral".into(),
            parent_education: "Tertiary".into(),
            has_transport: true,
            applying_for_financial_aid: true,
            working_part_time: false,
        }
    }

    #[test]
    fn clean_profile_has_no_factors() {
        assert!(derive_risk_factors(&low_risk(), &FlagConfig::default()).is_empty());
    }

    #[test]
    fn three_factor_profile_yields_exactly_three() {
        let mut p = low_risk();
        p.distance_km = 50.0;
        p.has_transport = false;
        p.parent_education = "None".into();
        assert_eq!(
            derive_risk_factors(&p, &FlagConfig::default()),
            vec![
                RiskFactor::FarDistance { distance_km: 50.0 },
                RiskFactor::NoTransport,
                RiskFactor::LowParentEducation,
            ]
        );
    }

    #[test]
    fn messages_carry_values() {
        assert_eq!(
            RiskFactor::FarDistance { distance_km: 55.4 }.to_string(),
            "Lives 55km from campus; commute is difficult"
        );
        assert!(RiskFactor::MatureAge { age: 35 }.to_string().starts_with("Age 35;"));
    }
}
