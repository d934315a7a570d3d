//! Descriptive aggregates over historical records. Means over an empty
//! selection are `None` rather than NaN.

use super::{HistoricalRisk, StudentRecord, StudentStatus};
use serde::Serialize;
use std::collections::BTreeMap;

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn share_pct(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn count_status(records: &[&StudentRecord], status: StudentStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn group_by<'a, K: Ord>(
    records: &'a [StudentRecord],
    key: impl Fn(&'a StudentRecord) -> K,
) -> BTreeMap<K, Vec<&'a StudentRecord>> {
    let mut groups: BTreeMap<K, Vec<&StudentRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(key(r)).or_default().push(r);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: StudentStatus,
    pub count: usize,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusGrade {
    pub status: StudentStatus,
    pub avg_grade_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub total: usize,
    pub active: usize,
    pub graduated: usize,
    pub dropped_out: usize,
    /// Most common status first
    pub statuses: Vec<StatusShare>,
    pub avg_attendance_pct: Option<f64>,
    pub avg_grade_pct: Option<f64>,
    /// Highest average grade first
    pub grade_by_status: Vec<StatusGrade>,
}

pub fn overview(records: &[StudentRecord]) -> OverviewReport {
    let total = records.len();
    let by_status = group_by(records, |r| r.status);

    let mut statuses: Vec<StatusShare> = by_status
        .iter()
        .map(|(status, group)| StatusShare {
            status: *status,
            count: group.len(),
            share_pct: share_pct(group.len(), total).unwrap_or(0.0),
        })
        .collect();
    statuses.sort_by(|a, b| b.count.cmp(&a.count).then(a.status.cmp(&b.status)));

    let mut grade_by_status: Vec<StatusGrade> = by_status
        .iter()
        .filter_map(|(status, group)| {
            mean(group.iter().map(|r| r.grade_average_pct)).map(|avg| StatusGrade {
                status: *status,
                avg_grade_pct: avg,
            })
        })
        .collect();
    grade_by_status.sort_by(|a, b| b.avg_grade_pct.total_cmp(&a.avg_grade_pct));

    let count = |s| by_status.get(&s).map_or(0, Vec::len);
    OverviewReport {
        total,
        active: count(StudentStatus::Active),
        graduated: count(StudentStatus::Graduated),
        dropped_out: count(StudentStatus::DroppedOut),
        statuses,
        avg_attendance_pct: mean(records.iter().map(|r| r.attendance_rate_pct)),
        avg_grade_pct: mean(records.iter().map(|r| r.grade_average_pct)),
        grade_by_status,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCount {
    pub level: HistoricalRisk,
    pub count: usize,
}

/// Risk picture of the currently enrolled students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub active: usize,
    pub at_risk: usize,
    pub at_risk_pct: Option<f64>,
    /// Critical first; levels with no students are omitted
    pub levels: Vec<LevelCount>,
}

pub fn risk_summary(records: &[StudentRecord]) -> RiskSummary {
    let active: Vec<&StudentRecord> = records.iter().filter(|r| r.is_active()).collect();
    let at_risk = active.iter().filter(|r| r.at_risk).count();
    let levels = HistoricalRisk::ALL
        .into_iter()
        .map(|level| LevelCount {
            level,
            count: active.iter().filter(|r| r.risk_level == Some(level)).count(),
        })
        .filter(|lc| lc.count > 0)
        .collect();
    RiskSummary {
        active: active.len(),
        at_risk,
        at_risk_pct: share_pct(at_risk, active.len()),
        levels,
    }
}

/// A single factor averaged over graduates and over dropouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorComparison {
    pub factor: &'static str,
    pub graduated: Option<f64>,
    pub dropped_out: Option<f64>,
}

/// What separated students who finished from those who left.
pub fn outcome_comparison(records: &[StudentRecord]) -> Vec<FactorComparison> {
    let grads: Vec<&StudentRecord> = records
        .iter()
        .filter(|r| r.status == StudentStatus::Graduated)
        .collect();
    let drops: Vec<&StudentRecord> = records
        .iter()
        .filter(|r| r.status == StudentStatus::DroppedOut)
        .collect();

    let compare = |factor: &'static str, value: fn(&StudentRecord) -> f64| FactorComparison {
        factor,
        graduated: mean(grads.iter().map(|r| value(r))),
        dropped_out: mean(drops.iter().map(|r| value(r))),
    };

    vec![
        compare("Attendance %", |r| r.attendance_rate_pct),
        compare("Grade Average %", |r| r.grade_average_pct),
        compare("Failed Courses", |r| r.courses_failed as f64),
        compare("Distance (km)", |r| r.distance_km),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AttendanceBand {
    #[serde(rename = "<60%")]
    Below60,
    #[serde(rename = "60-74%")]
    From60To74,
    #[serde(rename = "75-84%")]
    From75To84,
    #[serde(rename = "85%+")]
    From85,
}

impl AttendanceBand {
    pub const ALL: [AttendanceBand; 4] = [
        AttendanceBand::Below60,
        AttendanceBand::From60To74,
        AttendanceBand::From75To84,
        AttendanceBand::From85,
    ];

    /// Right-inclusive bins over (0, 100]; zero or out-of-range attendance has no band.
    pub fn of(attendance_pct: f64) -> Option<Self> {
        match attendance_pct {
            a if a > 0.0 && a <= 60.0 => Some(AttendanceBand::Below60),
            a if a > 60.0 && a <= 75.0 => Some(AttendanceBand::From60To74),
            a if a > 75.0 && a <= 85.0 => Some(AttendanceBand::From75To84),
            a if a > 85.0 && a <= 100.0 => Some(AttendanceBand::From85),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceBand::Below60 => "<60%",
            AttendanceBand::From60To74 => "60-74%",
            AttendanceBand::From75To84 => "75-84%",
            AttendanceBand::From85 => "85%+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSummary {
    pub program: String,
    pub total: usize,
    pub graduated: usize,
    pub dropped_out: usize,
    pub avg_attendance_pct: f64,
    pub avg_grade_pct: f64,
    pub grad_rate_pct: f64,
    pub dropout_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandOutcome {
    pub band: AttendanceBand,
    pub graduated: usize,
    pub dropped_out: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionReport {
    /// Share of finished students who graduated
    pub graduation_rate_pct: Option<f64>,
    pub dropout_rate_pct: Option<f64>,
    pub completed_avg_attendance_pct: Option<f64>,
    /// Alphabetical by program
    pub programs: Vec<ProgramSummary>,
    pub attendance_bands: Vec<BandOutcome>,
}

pub fn retention(records: &[StudentRecord]) -> RetentionReport {
    let completed: Vec<&StudentRecord> =
        records.iter().filter(|r| r.status.is_completed()).collect();
    let graduated = count_status(&completed, StudentStatus::Graduated);
    let dropped = count_status(&completed, StudentStatus::DroppedOut);

    let programs = group_by(records, |r| r.program.as_str())
        .into_iter()
        .map(|(program, group)| {
            let total = group.len();
            let graduated = count_status(&group, StudentStatus::Graduated);
            let dropped_out = count_status(&group, StudentStatus::DroppedOut);
            ProgramSummary {
                program: program.to_string(),
                total,
                graduated,
                dropped_out,
                avg_attendance_pct: round1(
                    mean(group.iter().map(|r| r.attendance_rate_pct)).unwrap_or(0.0),
                ),
                avg_grade_pct: round1(
                    mean(group.iter().map(|r| r.grade_average_pct)).unwrap_or(0.0),
                ),
                grad_rate_pct: round1(share_pct(graduated, total).unwrap_or(0.0)),
                dropout_rate_pct: round1(share_pct(dropped_out, total).unwrap_or(0.0)),
            }
        })
        .collect();

    let attendance_bands = AttendanceBand::ALL
        .into_iter()
        .map(|band| {
            let in_band: Vec<&StudentRecord> = completed
                .iter()
                .copied()
                .filter(|r| AttendanceBand::of(r.attendance_rate_pct) == Some(band))
                .collect();
            BandOutcome {
                band,
                graduated: count_status(&in_band, StudentStatus::Graduated),
                dropped_out: count_status(&in_band, StudentStatus::DroppedOut),
            }
        })
        .collect();

    RetentionReport {
        graduation_rate_pct: share_pct(graduated, completed.len()),
        dropout_rate_pct: share_pct(dropped, completed.len()),
        completed_avg_attendance_pct: mean(completed.iter().map(|r| r.attendance_rate_pct)),
        programs,
        attendance_bands,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub enrollments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcePerformance {
    pub source: String,
    pub enrollments: usize,
    pub graduated: usize,
    pub dropped_out: usize,
    pub dropout_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub by_year: Vec<YearCount>,
    /// Largest channel first
    pub sources: Vec<SourcePerformance>,
}

pub fn growth(records: &[StudentRecord]) -> GrowthReport {
    let by_year = group_by(records, |r| r.year_enrolled)
        .into_iter()
        .map(|(year, group)| YearCount {
            year,
            enrollments: group.len(),
        })
        .collect();

    let mut sources: Vec<SourcePerformance> = group_by(records, |r| r.enrollment_source.as_str())
        .into_iter()
        .map(|(source, group)| {
            let dropped_out = count_status(&group, StudentStatus::DroppedOut);
            SourcePerformance {
                source: source.to_string(),
                enrollments: group.len(),
                graduated: count_status(&group, StudentStatus::Graduated),
                dropped_out,
                dropout_rate_pct: round1(share_pct(dropped_out, group.len()).unwrap_or(0.0)),
            }
        })
        .collect();
    sources.sort_by(|a, b| b.enrollments.cmp(&a.enrollments));

    GrowthReport { by_year, sources }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampusPerformance {
    pub campus: String,
    pub students: usize,
    pub dropout_rate_pct: f64,
    pub avg_attendance_pct: f64,
    pub avg_grade_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampusReport {
    /// Alphabetical by campus
    pub campuses: Vec<CampusPerformance>,
    /// Lowest dropout rate
    pub best: Option<String>,
    /// Highest dropout rate
    pub worst: Option<String>,
}

pub fn campus(records: &[StudentRecord]) -> CampusReport {
    let campuses: Vec<CampusPerformance> = group_by(records, |r| r.campus.as_str())
        .into_iter()
        .map(|(campus, group)| CampusPerformance {
            campus: campus.to_string(),
            students: group.len(),
            dropout_rate_pct: round1(
                share_pct(count_status(&group, StudentStatus::DroppedOut), group.len())
                    .unwrap_or(0.0),
            ),
            avg_attendance_pct: round1(
                mean(group.iter().map(|r| r.attendance_rate_pct)).unwrap_or(0.0),
            ),
            avg_grade_pct: round1(mean(group.iter().map(|r| r.grade_average_pct)).unwrap_or(0.0)),
        })
        .collect();

    let mut ranked: Vec<&CampusPerformance> = campuses.iter().collect();
    ranked.sort_by(|a, b| a.dropout_rate_pct.total_cmp(&b.dropout_rate_pct));
    let best = ranked.first().map(|c| c.campus.clone());
    let worst = ranked.last().map(|c| c.campus.clone());

    CampusReport {
        campuses,
        best,
        worst,
    }
}
