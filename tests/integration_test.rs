//! Integration test: config load, artifact loading, end-to-end scoring, dataset
//! reports, registration queue and intervention log.

use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use student_success::{
    config::AppConfig,
    features::{FEATURE_DIM, FEATURE_NAMES},
    model::{
        load_classifier, ArtifactError, EncoderSet, FixedProbability, LabelEncoder,
        RiskClassifier,
    },
    profile::CandidateProfile,
    records::{alerts, report, RecordFilter, StudentDataset},
    risk::{action_plan, RiskFactor, RiskLevel, RiskScorer},
    session::{
        InterventionKind, InterventionLog, InterventionOutcome, InterventionRequest,
        RegistrationDraft, RegistrationQueue, RegistrationStatus,
    },
};

fn encoders() -> EncoderSet {
    EncoderSet::new(
        LabelEncoder::fit(["Francistown", "Gaborone", "Maun"]),
        LabelEncoder::fit(["Certificate in Welding", "Diploma in Accounting", "Diploma in IT"]),
        LabelEncoder::fit(["Radio", "Referral", "Social Media", "Walk-in"]),
        LabelEncoder::fit(["None", "Primary", "Secondary", "Tertiary"]),
        LabelEncoder::fit(["Female", "Male"]),
    )
}

fn scorer(probability: f64) -> RiskScorer {
    RiskScorer::from_config(
        &AppConfig::default(),
        RiskClassifier::new(encoders(), Box::new(FixedProbability(probability))),
    )
}

fn low_risk_profile() -> CandidateProfile {
    CandidateProfile {
        name: "Boitumelo Sechele".into(),
        national_id: "334455667".into(),
        age: 20,
        distance_km: 10.0,
        year_enrolled: 2025,
        gender: "Female".into(),
        campus: "Gaborone".into(),
        program: "Diploma in IT".into(),
        source: "Social Media".into(),
        parent_education: "Tertiary".into(),
        has_transport: true,
        applying_for_financial_aid: true,
        working_part_time: false,
    }
}

fn high_risk_profile() -> CandidateProfile {
    CandidateProfile {
        name: "Kabelo Ntsima".into(),
        national_id: "776655443".into(),
        age: 35,
        distance_km: 55.0,
        year_enrolled: 2025,
        gender: "Male".into(),
        campus: "Maun".into(),
        program: "Certificate in Welding".into(),
        source: "Radio".into(),
        parent_education: "Primary".into(),
        has_transport: false,
        applying_for_financial_aid: false,
        working_part_time: true,
    }
}

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn config_load_default() {
    let c = AppConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.risk.medium_threshold_pct, 30.0);
    assert_eq!(c.risk.high_threshold_pct, 55.0);
    assert_eq!(c.placeholders.attendance_rate_pct, 80.0);
    assert_eq!(c.placeholders.grade_average_pct, 55.0);
    assert!(!c.log.json);
}

#[test]
fn config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "config.json",
        r#"{"artifacts":{"dir":"/opt/models"},"flags":{"far_distance_km":25.0}}"#,
    );
    let c = AppConfig::load(&path);
    assert_eq!(c.artifacts.dir, PathBuf::from("/opt/models"));
    assert_eq!(c.artifacts.model_file, "model.json");
    assert_eq!(c.flags.far_distance_km, 25.0);
    assert_eq!(c.flags.mature_age, 30);
}

#[test]
fn low_risk_candidate_has_no_flags() {
    let a = scorer(0.18).assess(&low_risk_profile()).unwrap();
    assert_eq!(a.level, RiskLevel::Low);
    assert!(a.risk_factors.is_empty());
    assert_eq!(a.score_label(), "18%");
    assert_eq!(a.recommendation, "APPROVE REGISTRATION");
}

#[test]
fn high_risk_candidate_raises_all_six_flags() {
    let a = scorer(0.62).assess(&high_risk_profile()).unwrap();
    assert_eq!(a.level, RiskLevel::High);
    assert_eq!(
        a.risk_factors,
        vec![
            RiskFactor::FarDistance { distance_km: 55.0 },
            RiskFactor::NoTransport,
            RiskFactor::WorkingPartTime,
            RiskFactor::LowParentEducation,
            RiskFactor::NoFinancialAid,
            RiskFactor::MatureAge { age: 35 },
        ]
    );
    let plan = action_plan(RiskLevel::High);
    assert_eq!(a.recommendation, plan.headline);
    assert_eq!(a.recommended_actions, plan.actions);
}

#[test]
fn unknown_campus_still_scores() {
    let s = scorer(0.4);
    let mut p = low_risk_profile();
    p.campus = "Kasane".into();
    let a = s.assess(&p).unwrap();
    assert_eq!(a.level, RiskLevel::Medium);

    let fv = s.features(&p);
    for name in ["campus_enc", "program_enc", "source_enc", "parent_education_enc", "gender_enc"] {
        assert_eq!(fv.get(name), Some(0.0), "{name}");
    }
    assert_eq!(fv.get("age"), Some(20.0));
}

#[test]
fn scoring_is_idempotent() {
    let s = scorer(0.5499);
    let p = high_risk_profile();
    let first = s.assess(&p).unwrap();
    for _ in 0..5 {
        assert_eq!(s.assess(&p).unwrap(), first);
    }
    assert_eq!(s.features(&p), s.features(&p));
    assert_eq!(first.level, RiskLevel::Medium);
}

#[test]
fn derived_flags_toggle_independently() {
    let s = scorer(0.1);
    let base = low_risk_profile();
    let idx = |n: &str| FEATURE_NAMES.iter().position(|f| *f == n).unwrap();
    let far = idx("distance_far");
    let mature = idx("age_mature");
    let parent = idx("parent_low");

    let mut p = base.clone();
    p.distance_km = 41.0;
    let v = s.features(&p);
    assert_eq!(
        (v.as_slice()[far], v.as_slice()[mature], v.as_slice()[parent]),
        (1.0, 0.0, 0.0)
    );

    let mut p = base.clone();
    p.age = 31;
    let v = s.features(&p);
    assert_eq!(
        (v.as_slice()[far], v.as_slice()[mature], v.as_slice()[parent]),
        (0.0, 1.0, 0.0)
    );

    let mut p = base;
    p.parent_education = "None".into();
    let v = s.features(&p);
    assert_eq!(
        (v.as_slice()[far], v.as_slice()[mature], v.as_slice()[parent]),
        (0.0, 0.0, 1.0)
    );
    assert_eq!(v.as_slice().len(), FEATURE_DIM);
}

#[test]
fn classifier_loads_from_artifact_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "encoders.json",
        r#"{
            "campus": ["Maun", "Gaborone", "Francistown"],
            "program": ["Diploma in IT", "Certificate in Welding"],
            "source": ["Radio", "Walk-in"],
            "parent_education": ["Tertiary", "Secondary", "Primary", "None"],
            "gender": ["Male", "Female"]
        }"#,
    );
    let mut coefficients = vec![0.0; FEATURE_DIM];
    coefficients[1] = 0.04;
    write_file(
        dir.path(),
        "model.json",
        &serde_json::json!({ "coefficients": coefficients, "intercept": -1.0 }).to_string(),
    );
    let names: Vec<&str> = FEATURE_NAMES.to_vec();
    write_file(dir.path(), "features.json", &serde_json::to_string(&names).unwrap());

    let mut config = AppConfig::default();
    config.artifacts.dir = dir.path().to_path_buf();
    let classifier = load_classifier(&config.artifacts).unwrap();
    assert_eq!(
        classifier.encoders().classes(student_success::profile::CategoricalField::Campus),
        ["Francistown", "Gaborone", "Maun"]
    );

    let s = RiskScorer::from_config(&config, classifier);
    let a = s.assess(&high_risk_profile()).unwrap();
    // z = -1.0 + 0.04 * 55 = 1.2
    let expected = 100.0 / (1.0 + (-1.2f64).exp());
    assert!((a.probability_pct - expected).abs() < 1e-6);
    assert_eq!(a.level, RiskLevel::High);
}

#[test]
fn missing_model_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "encoders.json",
        r#"{"campus":["A"],"program":["P"],"source":["S"],"parent_education":["None"],"gender":["Male"]}"#,
    );
    let mut config = AppConfig::default();
    config.artifacts.dir = dir.path().to_path_buf();
    assert!(matches!(
        load_classifier(&config.artifacts),
        Err(ArtifactError::Io { .. })
    ));
}

#[test]
fn wrong_width_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "encoders.json",
        r#"{"campus":["A"],"program":["P"],"source":["S"],"parent_education":["None"],"gender":["Male"]}"#,
    );
    write_file(dir.path(), "model.json", r#"{"coefficients":[0.1,0.2],"intercept":0.0}"#);
    let mut config = AppConfig::default();
    config.artifacts.dir = dir.path().to_path_buf();
    assert!(matches!(
        load_classifier(&config.artifacts),
        Err(ArtifactError::Model(_))
    ));
}

const DATASET: &str = "\
student_id,age,gender,campus,program,year_enrolled,semester_enrolled,enrollment_source,distance_from_campus_km,has_transport,has_financial_aid,attendance_rate_pct,grade_average_pct,courses_failed,warnings_issued,status,at_risk,risk_level,dropout_probability
GTC0001,19,Female,Gaborone,Diploma in IT,2024,Semester 1,Radio,8,1,1,92,71,0,0,Graduated,0,Low Risk,0.05
GTC0002,31,Male,Maun,Certificate in Welding,2024,Semester 2,Walk-in,62,0,0,48,35,3,2,Dropped Out,1,Critical,0.91
GTC0003,22,Female,Maun,Diploma in IT,2025,Semester 1,Referral,20,1,0,58,41,2,1,Active,1,Critical,0.83
GTC0004,24,Male,Gaborone,Diploma in IT,2025,Semester 1,Radio,15,1,1,70,50,1,1,Active,1,High Risk,0.64
GTC0005,20,Female,Francistown,Certificate in Welding,2025,Semester 2,Radio,5,1,1,79,58,1,0,Active,0,Medium Risk,0.33
GTC0006,27,Male,Francistown,Diploma in IT,2026,Semester 1,Social Media,30,0,1,88,66,0,0,Active,0,Low Risk,0.12
";

#[test]
fn dataset_reports_and_alert_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "student_data_scored.csv", DATASET);
    let ds = StudentDataset::load(&path).unwrap();
    assert_eq!(ds.len(), 6);
    assert_eq!(ds.active_count(), 4);

    let board = alerts::alert_board(ds.records());
    let ids: Vec<&str> = board.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["GTC0003", "GTC0004"]);

    let mut out = Vec::new();
    alerts::write_alert_csv(&board, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);

    let overview = report::overview(ds.records());
    assert_eq!((overview.graduated, overview.dropped_out), (1, 1));

    let retention = report::retention(ds.records());
    assert_eq!(retention.graduation_rate_pct, Some(50.0));

    let summary = report::risk_summary(ds.records());
    assert_eq!(summary.at_risk, 2);
    assert_eq!(summary.at_risk_pct, Some(50.0));

    let maun = ds.filter(&RecordFilter {
        campus: Some("Maun".into()),
        ..RecordFilter::default()
    });
    let campus = report::campus(ds.records());
    assert_eq!(campus.worst.as_deref(), Some("Maun"));
    assert_eq!(maun.len(), 2);

    let growth = report::growth(ds.records());
    assert_eq!(growth.by_year.len(), 3);
    assert_eq!(growth.sources[0].source, "Radio");
}

#[test]
fn registration_then_intervention_flow() {
    let dir = tempfile::tempdir().unwrap();
    let queue_path = dir.path().join("registrations.csv");
    let log_path = dir.path().join("interventions.csv");
    let today = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();

    let s = scorer(0.62);
    let profile = high_risk_profile();
    let assessment = s.assess(&profile).unwrap();

    let mut queue = RegistrationQueue::load_csv(&queue_path).unwrap();
    let reg_id = queue
        .submit(RegistrationDraft::new(profile), &assessment, today)
        .unwrap()
        .reg_id
        .clone();
    queue.set_status(&reg_id, RegistrationStatus::Approved).unwrap();
    queue.save_csv(&queue_path).unwrap();

    let reloaded = RegistrationQueue::load_csv(&queue_path).unwrap();
    let reg = reloaded.get("REG-0001").unwrap();
    assert_eq!(reg.risk_level, RiskLevel::High);
    assert_eq!(reg.risk_score, "62%");
    assert_eq!(reloaded.counts().approved, 1);

    let mut log = InterventionLog::load_csv(&log_path).unwrap();
    log.record(
        InterventionRequest {
            student_id: "GTC0003".into(),
            kind: InterventionKind::CounselorReferral,
            outcome: InterventionOutcome::AgreedToPlan,
            staff: "Mr. Phiri".into(),
            follow_up: None,
            notes: "weekly check-ins agreed".into(),
        },
        today,
    )
    .unwrap();
    log.save_csv(&log_path).unwrap();

    let log = InterventionLog::load_csv(&log_path).unwrap();
    let entries: Vec<_> = log.for_student("GTC0003").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].follow_up, NaiveDate::from_ymd_opt(2026, 1, 26).unwrap());
}
