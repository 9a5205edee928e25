use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args as ClapArgs, Parser, Subcommand};
use record_catalog::PatientCatalog;
use record_core::{
    calendar::WEEK_DAYS, CalendarStep, CalendarView, ChartSelection, DetailSession, ListedExam,
    MedicalExam, Patient, Route, ViewerConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "record-cli",
    about = "Browse patient records and the views derived from them."
)]
struct Args {
    /// JSON catalog to load instead of the bundled patients.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// JSON viewer configuration; missing keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Reference day (YYYY-MM-DD) used instead of the local clock.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List patients whose name or id contains the query.
    Patients { query: Option<String> },
    /// Show one patient with the filtered exam list.
    Show(ViewArgs),
    /// Lay out the timeline chart of one patient.
    Chart(ViewArgs),
    /// Render one calendar month of a patient's exams.
    Calendar {
        id: String,
        /// Month to open as YYYY-MM; defaults to the earliest exam.
        #[arg(long)]
        month: Option<String>,
        /// Controls applied in order, e.g. `next-month` or `previous-exam`.
        #[arg(long = "step")]
        steps: Vec<String>,
    },
    /// Resolve an application path to its view.
    Route { path: String },
}

#[derive(ClapArgs, Debug)]
struct ViewArgs {
    id: String,
    /// Time window label or code (`all`, `1w`, `3m`, `3 Years`, ...).
    #[arg(long)]
    window: Option<String>,
    /// `department` or `anatomy`.
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    anatomy: Option<String>,
    /// `date-desc`, `date-asc`, `sector` or `diagnosis`.
    #[arg(long)]
    sort: Option<String>,
    /// Deselect every region whose name or sector matches.
    #[arg(long = "hide")]
    hidden: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let catalog = load_catalog(args.catalog.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let now = match args.today {
        Some(day) => day.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    };

    match &args.command {
        Command::Patients { query } => {
            let patients = catalog.search_patients(query.as_deref().unwrap_or(""));
            if args.json {
                println!("{}", serde_json::to_string_pretty(&patients)?);
                return Ok(());
            }
            for patient in &patients {
                let last = patient
                    .last_exam()
                    .map(|exam| exam.date.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {:<20} {:>3} ans  {} exams, last {}",
                    patient.id,
                    patient.full_name(),
                    patient.age_on(now.date()),
                    patient.medical_history.len(),
                    last
                );
            }
        }
        Command::Show(view) => {
            let patient = find_patient(&catalog, &view.id)?;
            let session = build_session(&catalog, view)?;
            let views = session.derive(&patient, now, &config);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&views)?);
                return Ok(());
            }
            print_patient(&patient, now);
            for row in &views.exams {
                print_exam(row);
            }
            println!("Regions:");
            for region in &views.body_regions {
                println!("  {:<22} {}", region.name, region.exam_count);
            }
        }
        Command::Chart(view) => {
            let patient = find_patient(&catalog, &view.id)?;
            let session = build_session(&catalog, view)?;
            let chart = session.derive(&patient, now, &config).chart;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
                return Ok(());
            }
            println!(
                "{}x{}  years {:?}  today at {}{}",
                chart.width,
                chart.height,
                chart.x_labels,
                chart.today_x,
                if chart.today_visible { "" } else { " (outside axis)" }
            );
            for (row, label) in chart.y_labels.iter().enumerate() {
                let ids: Vec<&str> = chart
                    .exams
                    .iter()
                    .filter(|point| &point.group == label)
                    .map(|point| point.exam.id.as_str())
                    .collect();
                println!("  {row} {:<12} {}", label, ids.join(", "));
            }
        }
        Command::Calendar { id, month, steps } => {
            let patient = find_patient(&catalog, id)?;
            let exams: Vec<&MedicalExam> = patient.medical_history.iter().collect();
            let mut calendar = match month {
                Some(month) => parse_month(month, config.min_calendar_year)?,
                None => {
                    CalendarView::at_earliest_exam(&exams, now.date(), config.min_calendar_year)
                }
            };
            for step in steps {
                let step: CalendarStep = step
                    .parse()
                    .with_context(|| format!("invalid calendar step {step:?}"))?;
                if !step.apply(&mut calendar, &exams, now.date()) {
                    tracing::info!(?step, "calendar step unavailable");
                }
            }
            let snapshot = calendar.snapshot(&exams, now.date());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }
            println!("{}", snapshot.title);
            println!("{}", WEEK_DAYS.map(|day| format!("{day:>4}")).join(""));
            for week in snapshot.days.chunks(7) {
                let line: String = week
                    .iter()
                    .map(|day| match (day.in_month, day.exams.is_empty()) {
                        (false, _) => "   .".to_string(),
                        (true, true) => format!("{:>4}", day.number),
                        (true, false) => format!("{:>3}*", day.number),
                    })
                    .collect();
                println!("{line}");
            }
            for day in snapshot.days.iter().filter(|day| day.in_month && day.badge_level > 0) {
                println!("{}  {}", day.date, day.tooltip.replace('\n', "; "));
            }
        }
        Command::Route { path } => {
            let route = Route::resolve(path);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                println!("{route:?} -> {}", route.path());
            }
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<PatientCatalog> {
    let Some(path) = path else {
        return Ok(PatientCatalog::builtin());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("could not read catalog {path:?}"))?;
    PatientCatalog::from_json_str(&data).with_context(|| format!("invalid catalog {path:?}"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {path:?}"))?;
    ViewerConfig::from_json_str(&data).with_context(|| format!("invalid config {path:?}"))
}

fn find_patient(catalog: &PatientCatalog, id: &str) -> anyhow::Result<Patient> {
    match catalog.patient_by_id(id) {
        Some(patient) => Ok(patient),
        None => bail!("no patient with id {id:?}"),
    }
}

fn build_session(catalog: &PatientCatalog, view: &ViewArgs) -> anyhow::Result<DetailSession> {
    let mut session = DetailSession::new(catalog.anatomical_regions());
    for term in &view.hidden {
        session.regions.set_search_term(term);
        session.regions.deselect_all();
    }
    session.regions.set_search_term("");

    if let Some(window) = &view.window {
        session.window = window.parse()?;
    }
    session.chart = ChartSelection::from_labels(
        view.mode.as_deref(),
        view.department.as_deref(),
        view.anatomy.as_deref(),
    )?;
    if let Some(sort) = &view.sort {
        session.sort = sort.parse()?;
    }
    Ok(session)
}

fn parse_month(input: &str, min_year: i32) -> anyhow::Result<CalendarView> {
    let (year, month) = input
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got {input:?}"))?;
    let year: i32 = year.parse().with_context(|| format!("invalid year in {input:?}"))?;
    let month: u32 = month.parse().with_context(|| format!("invalid month in {input:?}"))?;
    Ok(CalendarView::new(year, month, min_year)?)
}

fn print_patient(patient: &Patient, now: NaiveDateTime) {
    let bmi = patient
        .bmi()
        .map(|bmi| format!("{bmi:.1}"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} ({})  {} ans  {}  IMC {}",
        patient.full_name(),
        patient.id,
        patient.age_on(now.date()),
        patient.blood_type,
        bmi
    );
}

fn print_exam(row: &ListedExam) {
    let exam = &row.exam;
    println!(
        "{}  {:<7} {}  [{} / {}]",
        exam.date,
        exam.id,
        exam.tooltip(),
        exam.diagnosis.label(),
        exam.severity.label()
    );
    println!("    {}", row.excerpt);
}
