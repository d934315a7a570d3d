//! Command-line surface: one subcommand per staff screen, with config paths
//! overridable from the command line.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use student_success::config::AppConfig;
use student_success::logging::{AssessmentLogEvent, StructuredLogger};
use student_success::model::load_classifier;
use student_success::profile::CandidateProfile;
use student_success::records::alerts::{alert_board, escalation_steps, urgent_cases, write_alert_csv};
use student_success::records::report::{self, FactorComparison, RiskSummary};
use student_success::records::{HistoricalRisk, RecordFilter, StudentDataset, StudentRecord};
use student_success::risk::{RiskAssessment, RiskScorer};
use student_success::screen::Screen;
use student_success::session::{
    InterventionError, InterventionKind, InterventionLog, InterventionOutcome,
    InterventionRequest, RegistrationDraft, RegistrationError, RegistrationQueue,
    RegistrationStatus, Semester,
};
use tracing::info;

pub type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(
    name = "student-success",
    about = "Score new registrations for dropout risk and review student outcomes",
    version
)]
pub struct Cli {
    /// Config file; defaults to $STUDENT_SUCCESS_CONFIG, then config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    /// Artifact directory (model, encoders, feature manifest)
    #[arg(long, global = true)]
    pub artifacts: Option<PathBuf>,
    /// Scored student dataset CSV
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,
    /// Registration queue CSV to import and export
    #[arg(long, global = true)]
    pub registrations: Option<PathBuf>,
    /// Intervention log CSV to import and export
    #[arg(long, global = true)]
    pub interventions: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a candidate profile and optionally queue the registration
    Assess(AssessArgs),
    /// Review the registration queue or change a registration's status
    Queue(QueueArgs),
    /// Enrolled students flagged at risk, most urgent first
    Alerts(AlertArgs),
    /// Log a support intervention for a student
    Intervene(InterveneArgs),
    /// Full record for one student
    Record(RecordArgs),
    /// Descriptive reports over the student dataset
    Report(ReportArgs),
    /// List available screens
    Screens,
}

impl Cli {
    /// Paths given on the command line win over the config file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.artifacts {
            config.artifacts.dir = dir.clone();
        }
        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
        if self.registrations.is_some() {
            config.session.registrations = self.registrations.clone();
        }
        if self.interventions.is_some() {
            config.session.interventions = self.interventions.clone();
        }
    }
}

impl Command {
    pub fn screen(&self) -> Option<Screen> {
        match self {
            Command::Assess(_) => Some(Screen::Register),
            Command::Queue(_) => Some(Screen::RegistrationQueue),
            Command::Alerts(_) => Some(Screen::AlertBoard),
            Command::Intervene(_) => Some(Screen::LogIntervention),
            Command::Record(_) => Some(Screen::StudentRecord),
            Command::Report(args) => Some(args.kind.screen()),
            Command::Screens => None,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only this program
    #[arg(long)]
    pub program: Option<String>,
    /// Only this campus
    #[arg(long)]
    pub campus: Option<String>,
}

impl From<FilterArgs> for RecordFilter {
    fn from(args: FilterArgs) -> Self {
        RecordFilter {
            program: args.program,
            campus: args.campus,
        }
    }
}

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Candidate profile as JSON
    pub profile: PathBuf,
    /// Add the scored candidate to the registration queue
    #[arg(long)]
    pub save: bool,
    /// Semester of entry (1 or 2)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub semester: u8,
    /// Admissions officer saving the registration
    #[arg(long, default_value = "")]
    pub officer: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Mark a registration approved
    #[arg(long, value_name = "REG_ID")]
    pub approve: Option<String>,
    /// Mark a registration declined
    #[arg(long, value_name = "REG_ID", conflicts_with = "approve")]
    pub decline: Option<String>,
}

#[derive(Args, Debug)]
pub struct AlertArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Only Critical and High Risk students
    #[arg(long)]
    pub urgent: bool,
    /// Write the contact list as CSV
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InterveneArgs {
    pub student_id: String,
    /// e.g. phone-call, meeting, sms, counselor-referral
    #[arg(long)]
    pub kind: InterventionKind,
    /// e.g. responded-positively, no-response, resolved
    #[arg(long)]
    pub outcome: InterventionOutcome,
    #[arg(long)]
    pub staff: String,
    /// YYYY-MM-DD; defaults to a week from today
    #[arg(long)]
    pub follow_up: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    pub student_id: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportKind {
    Overview,
    AtRisk,
    Retention,
    Growth,
    Campus,
}

impl ReportKind {
    fn screen(&self) -> Screen {
        match self {
            ReportKind::Overview => Screen::Overview,
            ReportKind::AtRisk => Screen::AtRisk,
            ReportKind::Retention => Screen::Retention,
            ReportKind::Growth => Screen::Growth,
            ReportKind::Campus => Screen::Campus,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(value_enum)]
    pub kind: ReportKind,
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(cli: Cli, config: &AppConfig) -> CliResult {
    if let Some(screen) = cli.command.screen() {
        info!(screen = screen.slug(), "opening screen");
    }
    let json = cli.json;
    match cli.command {
        Command::Assess(args) => assess(args, config, json),
        Command::Queue(args) => queue(args, config, json),
        Command::Alerts(args) => alerts(args, config, json),
        Command::Intervene(args) => intervene(args, config, json),
        Command::Record(args) => record(args, config, json),
        Command::Report(args) => report(args, config, json),
        Command::Screens => screens(json),
    }
}

fn print_json(value: &impl Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

fn load_queue(config: &AppConfig) -> Result<RegistrationQueue, RegistrationError> {
    match &config.session.registrations {
        Some(path) => RegistrationQueue::load_csv(path),
        None => Ok(RegistrationQueue::new()),
    }
}

/// Returns whether the queue was written anywhere.
fn save_queue(queue: &RegistrationQueue, config: &AppConfig) -> Result<bool, RegistrationError> {
    match &config.session.registrations {
        Some(path) => queue.save_csv(path).map(|_| true),
        None => Ok(false),
    }
}

fn load_log(config: &AppConfig) -> Result<InterventionLog, InterventionError> {
    match &config.session.interventions {
        Some(path) => InterventionLog::load_csv(path),
        None => Ok(InterventionLog::new()),
    }
}

fn save_log(log: &InterventionLog, config: &AppConfig) -> Result<bool, InterventionError> {
    match &config.session.interventions {
        Some(path) => log.save_csv(path).map(|_| true),
        None => Ok(false),
    }
}

fn load_dataset(config: &AppConfig, filter: FilterArgs) -> Result<StudentDataset, Box<dyn std::error::Error + Send + Sync>> {
    let dataset = StudentDataset::load(&config.dataset.path)?;
    Ok(dataset.filter(&filter.into()))
}

#[derive(Serialize)]
struct AssessOutput<'a> {
    assessment: &'a RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    reg_id: Option<String>,
}

fn assess(args: AssessArgs, config: &AppConfig, json: bool) -> CliResult {
    let raw = std::fs::read_to_string(&args.profile)?;
    let profile: CandidateProfile = serde_json::from_str(&raw)?;
    if !profile.has_identity() {
        return Err(RegistrationError::MissingIdentity.into());
    }
    let scorer = RiskScorer::from_config(config, load_classifier(&config.artifacts)?);
    let assessment = scorer.assess(&profile)?;

    let mut exported = false;
    let reg_id = if args.save {
        let mut queue = load_queue(config)?;
        let draft = RegistrationDraft {
            profile: profile.clone(),
            semester: if args.semester == 2 {
                Semester::Second
            } else {
                Semester::First
            },
            phone: args.phone,
            officer: args.officer,
            notes: args.notes,
        };
        let reg_id = queue
            .submit(draft, &assessment, Local::now().date_naive())?
            .reg_id
            .clone();
        exported = save_queue(&queue, config)?;
        Some(reg_id)
    } else {
        None
    };

    if config.log.json {
        let mut event = AssessmentLogEvent::from_assessment(&profile, &assessment);
        if let Some(id) = reg_id.as_deref() {
            event = event.with_reg_id(id);
        }
        StructuredLogger::emit_json(&event, &mut std::io::stderr())?;
    }

    if json {
        return print_json(&AssessOutput {
            assessment: &assessment,
            reg_id,
        });
    }

    println!(
        "{}  ·  {}  ·  Predicted dropout risk: {}",
        assessment.level,
        profile.name,
        assessment.score_label()
    );
    println!();
    println!("Risk factors:");
    if assessment.risk_factors.is_empty() {
        println!("  No major risk factors identified at enrollment");
    }
    for message in assessment.factor_messages() {
        println!("  ! {message}");
    }
    println!();
    println!("Recommendation: {}", assessment.recommendation);
    for action in &assessment.recommended_actions {
        println!("  - {action}");
    }
    if let Some(id) = reg_id {
        println!();
        println!("Registration {id} saved, pending approval");
        if !exported {
            println!("(no --registrations file given; the queue ends with this run)");
        }
    }
    Ok(())
}

fn queue(args: QueueArgs, config: &AppConfig, json: bool) -> CliResult {
    let mut queue = load_queue(config)?;
    let update = args
        .approve
        .map(|id| (id, RegistrationStatus::Approved))
        .or_else(|| args.decline.map(|id| (id, RegistrationStatus::Declined)));
    if let Some((id, status)) = update {
        queue.set_status(&id, status)?;
        save_queue(&queue, config)?;
        info!(reg_id = %id, status = status.label(), "registration updated");
    }

    if json {
        #[derive(Serialize)]
        struct QueueOutput<'a> {
            counts: student_success::session::QueueCounts,
            registrations: &'a [student_success::session::Registration],
        }
        return print_json(&QueueOutput {
            counts: queue.counts(),
            registrations: queue.list(),
        });
    }

    let counts = queue.counts();
    println!(
        "Total registrations: {}  ·  Pending approval: {}  ·  Approved: {}",
        counts.total, counts.pending, counts.approved
    );
    if queue.list().is_empty() {
        println!("No registrations logged yet. Use `assess --save` to add applications.");
    }
    for r in queue.list() {
        println!(
            "{}  {}  {}  {}  {}  ({})  officer: {}  {}  [{}]",
            r.reg_id, r.student_name, r.program, r.campus, r.risk_level, r.risk_score, r.officer, r.date, r.status
        );
    }
    Ok(())
}

fn print_board(board: &[&StudentRecord]) {
    println!(
        "{:<10} {:<28} {:<14} {:>10} {:>9} {:>6} {:>8}  Risk",
        "Student", "Program", "Campus", "Attendance", "Avg Grade", "Failed", "Warnings"
    );
    for r in board {
        println!(
            "{:<10} {:<28} {:<14} {:>9.0}% {:>8.0}% {:>6} {:>8}  {}",
            r.student_id,
            r.program,
            r.campus,
            r.attendance_rate_pct,
            r.grade_average_pct,
            r.courses_failed,
            r.warnings_issued,
            r.risk_level.map(|l| l.label()).unwrap_or("-")
        );
    }
}

fn alerts(args: AlertArgs, config: &AppConfig, json: bool) -> CliResult {
    let dataset = load_dataset(config, args.filter)?;
    let board = if args.urgent {
        urgent_cases(dataset.records())
    } else {
        alert_board(dataset.records())
    };

    if let Some(path) = &args.export {
        write_alert_csv(&board, std::fs::File::create(path)?)?;
        info!(path = %path.display(), students = board.len(), "alert list exported");
    }
    if json {
        return print_json(&board);
    }

    let summary = report::risk_summary(dataset.records());
    for lc in &summary.levels {
        println!("{:<12} {:>5}", lc.level.label(), lc.count);
    }
    println!();
    if board.is_empty() {
        println!("No students currently flagged as at-risk.");
        return Ok(());
    }
    print_board(&board);
    println!();
    for level in [HistoricalRisk::Critical, HistoricalRisk::High, HistoricalRisk::Medium] {
        println!("{}:", level.label().to_uppercase());
        for (i, step) in escalation_steps(level).iter().enumerate() {
            println!("  Step {}: {step}", i + 1);
        }
    }
    Ok(())
}

fn intervene(args: InterveneArgs, config: &AppConfig, json: bool) -> CliResult {
    let dataset = StudentDataset::load(&config.dataset.path)?;
    dataset.intervention_target(&args.student_id)?;

    let mut log = load_log(config)?;
    let entry = log
        .record(
            InterventionRequest {
                student_id: args.student_id,
                kind: args.kind,
                outcome: args.outcome,
                staff: args.staff,
                follow_up: args.follow_up,
                notes: args.notes,
            },
            Local::now().date_naive(),
        )?
        .clone();
    save_log(&log, config)?;

    if json {
        return print_json(&entry);
    }
    println!(
        "Intervention logged for {}: {} ({}), follow up {}",
        entry.student_id, entry.kind, entry.outcome, entry.follow_up
    );
    Ok(())
}

fn record(args: RecordArgs, config: &AppConfig, json: bool) -> CliResult {
    let dataset = StudentDataset::load(&config.dataset.path)?;
    let r = dataset
        .find(&args.student_id)
        .ok_or_else(|| format!("no student with id {}", args.student_id))?;
    let log = load_log(config)?;
    let history: Vec<_> = log.for_student(&r.student_id).collect();

    if json {
        #[derive(Serialize)]
        struct RecordOutput<'a> {
            record: &'a StudentRecord,
            interventions: Vec<&'a student_success::session::InterventionEntry>,
        }
        return print_json(&RecordOutput {
            record: r,
            interventions: history,
        });
    }

    println!("{}  ·  {}  ·  {}  ·  {}", r.student_id, r.program, r.campus, r.status);
    println!("Enrolled {} {} via {}", r.year_enrolled, r.semester_enrolled, r.enrollment_source);
    println!("Age {}  ·  {}  ·  {:.0}km from campus", r.age, r.gender, r.distance_km);
    println!(
        "Transport: {}  ·  Financial aid: {}",
        if r.has_transport { "Yes" } else { "No" },
        if r.has_financial_aid { "Yes" } else { "No" }
    );
    println!(
        "Attendance {:.0}%  ·  Grade {:.0}%  ·  Failed courses {}  ·  Warnings {}",
        r.attendance_rate_pct, r.grade_average_pct, r.courses_failed, r.warnings_issued
    );
    if let Some(level) = r.risk_level {
        let probability = r
            .dropout_probability
            .map(|p| format!(" ({:.0}%)", p * 100.0))
            .unwrap_or_default();
        println!("Risk: {level}{probability}  ·  {}", level.description());
    }
    if !history.is_empty() {
        println!();
        println!("Interventions:");
        for e in history {
            println!("  {}  {}  {}  by {}  follow up {}", e.date, e.kind, e.outcome, e.staff, e.follow_up);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct AtRiskView<'a> {
    summary: RiskSummary,
    comparison: Vec<FactorComparison>,
    urgent: Vec<&'a StudentRecord>,
}

fn report(args: ReportArgs, config: &AppConfig, json: bool) -> CliResult {
    let dataset = load_dataset(config, args.filter)?;
    let records = dataset.records();

    match args.kind {
        ReportKind::Overview => {
            let o = report::overview(records);
            if json {
                return print_json(&o);
            }
            println!(
                "Total students: {}  ·  Active: {}  ·  Graduated: {}  ·  Dropped out: {}",
                o.total, o.active, o.graduated, o.dropped_out
            );
            println!(
                "Average attendance: {}  ·  Average grade: {}",
                pct(o.avg_attendance_pct),
                pct(o.avg_grade_pct)
            );
            for s in &o.statuses {
                println!("  {:<12} {:>6} {:>6.1}%", s.status.label(), s.count, s.share_pct);
            }
            for g in &o.grade_by_status {
                println!("  {:<12} avg grade {:.1}%", g.status.label(), g.avg_grade_pct);
            }
        }
        ReportKind::AtRisk => {
            let view = AtRiskView {
                summary: report::risk_summary(records),
                comparison: report::outcome_comparison(records),
                urgent: urgent_cases(records),
            };
            if json {
                return print_json(&view);
            }
            println!(
                "Active students: {}  ·  Flagged at risk: {} ({})",
                view.summary.active,
                view.summary.at_risk,
                pct(view.summary.at_risk_pct)
            );
            for lc in &view.summary.levels {
                println!("  {:<12} {:>5}  {}", lc.level.label(), lc.count, lc.level.description());
            }
            println!();
            println!("{:<18} {:>10} {:>10}", "Factor", "Graduates", "Dropouts");
            for c in &view.comparison {
                let cell = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));
                println!("{:<18} {:>10} {:>10}", c.factor, cell(c.graduated), cell(c.dropped_out));
            }
            println!();
            if view.urgent.is_empty() {
                println!("No students currently in Critical or High Risk category.");
            } else {
                print_board(&view.urgent);
            }
        }
        ReportKind::Retention => {
            let r = report::retention(records);
            if json {
                return print_json(&r);
            }
            println!(
                "Graduation rate: {}  ·  Dropout rate: {}  ·  Avg attendance (completed): {}",
                pct(r.graduation_rate_pct),
                pct(r.dropout_rate_pct),
                pct(r.completed_avg_attendance_pct)
            );
            for p in &r.programs {
                println!(
                    "  {:<28} {:>5} students  grad {:>5.1}%  drop {:>5.1}%  att {:>5.1}%  grade {:>5.1}%",
                    p.program, p.total, p.grad_rate_pct, p.dropout_rate_pct, p.avg_attendance_pct, p.avg_grade_pct
                );
            }
            for b in &r.attendance_bands {
                println!("  {:<7} graduated {:>5}  dropped out {:>5}", b.band.label(), b.graduated, b.dropped_out);
            }
        }
        ReportKind::Growth => {
            let g = report::growth(records);
            if json {
                return print_json(&g);
            }
            for y in &g.by_year {
                println!("  {}  {:>6} enrollments", y.year, y.enrollments);
            }
            for s in &g.sources {
                println!(
                    "  {:<20} {:>6} enrolled  {:>5.1}% dropout",
                    s.source, s.enrollments, s.dropout_rate_pct
                );
            }
        }
        ReportKind::Campus => {
            let c = report::campus(records);
            if json {
                return print_json(&c);
            }
            for p in &c.campuses {
                println!(
                    "  {:<14} {:>6} students  dropout {:>5.1}%  att {:>5.1}%  grade {:>5.1}%",
                    p.campus, p.students, p.dropout_rate_pct, p.avg_attendance_pct, p.avg_grade_pct
                );
            }
            if let (Some(best), Some(worst)) = (&c.best, &c.worst) {
                println!("Best: {best}  ·  Needs attention: {worst}");
            }
        }
    }
    Ok(())
}

fn screens(json: bool) -> CliResult {
    if json {
        #[derive(Serialize)]
        struct ScreenView {
            slug: &'static str,
            title: &'static str,
            surface: student_success::screen::Surface,
        }
        let views: Vec<ScreenView> = Screen::ALL
            .iter()
            .map(|s| ScreenView {
                slug: s.slug(),
                title: s.title(),
                surface: s.surface(),
            })
            .collect();
        return print_json(&views);
    }
    for s in Screen::ALL {
        println!("{:<20} {:<26} {:?}", s.slug(), s.title(), s.surface());
    }
    Ok(())
}
