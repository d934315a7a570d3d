//! Alert board: enrolled students flagged at risk, most urgent first.

use super::{HistoricalRisk, StudentRecord};
use std::cmp::Ordering;
use std::io::Write;

/// Active students flagged at risk. Ordered by dropout probability, highest
/// first, when the dataset carries one; otherwise by attendance, lowest first.
pub fn alert_board(records: &[StudentRecord]) -> Vec<&StudentRecord> {
    let mut flagged: Vec<&StudentRecord> = records
        .iter()
        .filter(|r| r.is_active() && r.at_risk)
        .collect();
    sort_by_urgency(&mut flagged);
    flagged
}

/// Active students in the Critical or High Risk band.
pub fn urgent_cases(records: &[StudentRecord]) -> Vec<&StudentRecord> {
    let mut urgent: Vec<&StudentRecord> = records
        .iter()
        .filter(|r| r.is_active() && r.risk_level.map_or(false, |l| l.is_urgent()))
        .collect();
    sort_by_urgency(&mut urgent);
    urgent
}

fn sort_by_urgency(records: &mut [&StudentRecord]) {
    if records.iter().any(|r| r.dropout_probability.is_some()) {
        records.sort_by(|a, b| match (a.dropout_probability, b.dropout_probability) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    } else {
        records.sort_by(|a, b| a.attendance_rate_pct.total_cmp(&b.attendance_rate_pct));
    }
}

/// Contact steps for staff working an alert at the given level.
pub fn escalation_steps(level: HistoricalRisk) -> &'static [&'static str] {
    match level {
        HistoricalRisk::Critical => &[
            "Call or meet student TODAY",
            "Contact parent/guardian if student is under 21",
            "Refer to counselor for support plan",
            "Log all contact in system",
        ],
        HistoricalRisk::High => &[
            "Schedule meeting within 5 days",
            "Review attendance and grades with student",
            "Offer tutoring or study group support",
            "Follow up in 2 weeks",
        ],
        HistoricalRisk::Medium => &[
            "Send friendly check-in email or SMS",
            "Remind them of tutoring hours available",
            "Monitor next 4 weeks",
        ],
        HistoricalRisk::Low => &[],
    }
}

/// Write a contact list in the layout staff download from the board.
pub fn write_alert_csv<W: Write>(records: &[&StudentRecord], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "Student ID",
        "Program",
        "Campus",
        "Attendance",
        "Avg Grade",
        "Failed Courses",
        "Warnings",
        "Risk",
    ])?;
    for r in records {
        out.write_record([
            r.student_id.clone(),
            r.program.clone(),
            r.campus.clone(),
            format!("{:.0}%", r.attendance_rate_pct),
            format!("{:.0}%", r.grade_average_pct),
            r.courses_failed.to_string(),
            r.warnings_issued.to_string(),
            r.risk_level.map(|l| l.label().to_string()).unwrap_or_default(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StudentStatus;

    fn student(id: &str, attendance: f64, probability: Option<f64>, level: Option<HistoricalRisk>) -> StudentRecord {
        StudentRecord {
            student_id: id.into(),
            age: 22,
            gender: "Male".into(),
            campus: "Gaborone".into(),
            program: "Diploma in IT".into(),
            year_enrolled: 2025,
            semester_enrolled: "Semester 1".into(),
            enrollment_source: "Radio".into(),
            distance_km: 20.0,
            has_transport: true,
            has_financial_aid: true,
            attendance_rate_pct: attendance,
            grade_average_pct: 50.0,
            courses_failed: 1,
            warnings_issued: 1,
            status: StudentStatus::Active,
            at_risk: true,
            risk_level: level,
            dropout_probability: probability,
        }
    }

    #[test]
    fn highest_probability_first() {
        let mut rs = vec![
            student("a", 70.0, Some(0.4), None),
            student("b", 60.0, Some(0.9), None),
            student("c", 65.0, None, None),
            student("d", 80.0, Some(0.7), None),
        ];
        rs.push(StudentRecord {
            status: StudentStatus::Graduated,
            ..student("e", 10.0, Some(0.99), None)
        });
        let ids: Vec<&str> = alert_board(&rs).iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn lowest_attendance_first_without_probabilities() {
        let rs = vec![student("a", 70.0, None, None), student("b", 55.0, None, None)];
        let ids: Vec<&str> = alert_board(&rs).iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn urgent_cases_are_critical_and_high() {
        let rs = vec![
            student("a", 70.0, Some(0.5), Some(HistoricalRisk::Medium)),
            student("b", 50.0, Some(0.8), Some(HistoricalRisk::Critical)),
            student("c", 62.0, Some(0.6), Some(HistoricalRisk::High)),
        ];
        let ids: Vec<&str> = urgent_cases(&rs).iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(escalation_steps(HistoricalRisk::Critical).len(), 4);
        assert!(escalation_steps(HistoricalRisk::Low).is_empty());
    }

    #[test]
    fn csv_export_formats_percentages() {
        let rs = vec![student("GTC0100", 72.4, Some(0.5), Some(HistoricalRisk::High))];
        let board = alert_board(&rs);
        let mut buf = Vec::new();
        write_alert_csv(&board, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Student ID,Program"));
        assert_eq!(lines.next().unwrap(), "GTC0100,Diploma in IT,Gaborone,72%,50%,1,1,High Risk");
    }
}
