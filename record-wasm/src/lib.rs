//! Framework-neutral WASM <-> JavaScript bridge over the viewer engine.
//!
//! The front-end keeps the view state as a plain object (see `JsSession`) and
//! passes it back on every call; nothing is stored on the Rust side apart from
//! the read-only catalog.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate, NaiveDateTime};
use record_catalog::PatientCatalog;
use record_core::overview::exams_for_region;
use record_core::{
    CalendarStep, CalendarView, ChartSelection, DerivedViews, DetailSession, ExamSelection,
    MedicalExam, Patient, RecordError, Route, ViewerConfig,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsViewerConfig {
    #[serde(default)]
    min_calendar_year: Option<i32>,
    #[serde(default)]
    row_height: Option<f64>,
    #[serde(default)]
    row_offset: Option<f64>,
    #[serde(default)]
    year_width: Option<f64>,
    #[serde(default)]
    min_chart_width: Option<f64>,
    #[serde(default)]
    min_chart_height: Option<f64>,
    #[serde(default)]
    excerpt_length: Option<usize>,
}

impl From<JsViewerConfig> for ViewerConfig {
    fn from(cfg: JsViewerConfig) -> Self {
        let mut base = ViewerConfig::default();
        if let Some(year) = cfg.min_calendar_year {
            base.min_calendar_year = year;
        }
        if let Some(height) = cfg.row_height {
            base.row_height = height;
        }
        if let Some(offset) = cfg.row_offset {
            base.row_offset = offset;
        }
        if let Some(width) = cfg.year_width {
            base.year_width = width;
        }
        if let Some(width) = cfg.min_chart_width {
            base.min_chart_width = width;
        }
        if let Some(height) = cfg.min_chart_height {
            base.min_chart_height = height;
        }
        if let Some(length) = cfg.excerpt_length {
            base.excerpt_length = length;
        }
        base
    }
}

/// View state as kept by the JavaScript side. Options use their display labels.
#[derive(Deserialize, Default)]
struct JsSession {
    /// Ids of deselected regions; every other region stays selected.
    #[serde(default)]
    deselected_regions: Vec<String>,
    #[serde(default)]
    window: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    anatomy: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    /// Modal focus and batch, as last returned by the bridge.
    #[serde(default)]
    selection: Option<ExamSelection>,
    #[serde(default)]
    calendar: Option<JsMonth>,
}

#[derive(Deserialize, Serialize, Clone, Copy)]
struct JsMonth {
    year: i32,
    month: u32,
}

#[derive(Serialize)]
struct PatientDetail<'a> {
    patient: &'a Patient,
    age: u32,
    bmi: Option<f64>,
    views: DerivedViews,
    selection: &'a ExamSelection,
}

#[derive(Serialize)]
struct PatientCard<'a> {
    patient: &'a Patient,
    age: u32,
    last_exam: Option<&'a MedicalExam>,
}

fn catalog() -> &'static PatientCatalog {
    static CATALOG: OnceLock<PatientCatalog> = OnceLock::new();
    CATALOG.get_or_init(PatientCatalog::builtin)
}

fn find_patient(patient_id: &str) -> Option<&'static Patient> {
    catalog().patients().iter().find(|p| p.id == patient_id)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Patients matching a search query, as list cards.
#[wasm_bindgen]
pub fn search_patients(query: &str) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let today = now().date();
    let patients = catalog().search_patients(query);
    let cards: Vec<PatientCard<'_>> = patients
        .iter()
        .map(|patient| PatientCard {
            patient,
            age: patient.age_on(today),
            last_exam: patient.last_exam(),
        })
        .collect();

    to_value(&cards)
        .map_err(|err| JsValue::from_str(&format!("could not serialize patients: {err}")))
}

/// Fresh region catalog, every region selected.
#[wasm_bindgen]
pub fn anatomical_regions() -> Result<JsValue, JsValue> {
    to_value(&catalog().anatomical_regions())
        .map_err(|err| JsValue::from_str(&format!("could not serialize regions: {err}")))
}

/// Derived detail views of one patient, or `null` when the id is unknown.
#[wasm_bindgen]
pub fn patient_detail(
    patient_id: &str,
    session: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let Some(patient) = find_patient(patient_id) else {
        return Ok(JsValue::NULL);
    };

    let cfg = read_config(config)?;
    let session = read_session(session, &cfg)?;

    let now = now();
    let detail = PatientDetail {
        patient,
        age: patient.age_on(now.date()),
        bmi: patient.bmi(),
        views: session.derive(patient, now, &cfg),
        selection: &session.selection,
    };

    to_value(&detail)
        .map_err(|err| JsValue::from_str(&format!("could not serialize views: {err}")))
}

/// Applies one calendar control over the visible exams and returns the month to display.
#[wasm_bindgen]
pub fn step_calendar(
    patient_id: &str,
    step: &str,
    session: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let cfg = read_config(config)?;
    let step: CalendarStep = step.parse().map_err(format_record_error)?;
    let Some(patient) = find_patient(patient_id) else {
        return Ok(JsValue::NULL);
    };

    let mut session = read_session(session, &cfg)?;
    let now = now();
    session.step_calendar(patient, step, now, &cfg);
    let view = session.calendar_view(patient, now, &cfg);

    to_value(&JsMonth {
        year: view.year(),
        month: view.month(),
    })
    .map_err(|err| JsValue::from_str(&format!("could not serialize month: {err}")))
}

/// Chart point click; a modifier click toggles the exam in the batch.
#[wasm_bindgen]
pub fn click_exam(
    patient_id: &str,
    exam_id: &str,
    with_modifier: bool,
    session: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let mut session = read_session(session, &ViewerConfig::default())?;
    if let Some(patient) = find_patient(patient_id) {
        session.click_exam(patient, exam_id, with_modifier);
    }
    write_selection(&session.selection)
}

/// Opens the visible exams of a `YYYY-MM-DD` calendar day.
#[wasm_bindgen]
pub fn open_calendar_day(
    patient_id: &str,
    date: &str,
    session: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let date: NaiveDate = date
        .parse()
        .map_err(|err| JsValue::from_str(&format!("could not read date {date:?}: {err}")))?;
    let mut session = read_session(session, &ViewerConfig::default())?;
    if let Some(patient) = find_patient(patient_id) {
        session.open_calendar_day(patient, date, now());
    }
    write_selection(&session.selection)
}

#[wasm_bindgen]
pub fn open_batch(session: Option<JsValue>) -> Result<JsValue, JsValue> {
    let mut session = read_session(session, &ViewerConfig::default())?;
    session.selection.open_batch();
    write_selection(&session.selection)
}

/// Closes the modal. The batch is kept.
#[wasm_bindgen]
pub fn close_selection(session: Option<JsValue>) -> Result<JsValue, JsValue> {
    let mut session = read_session(session, &ViewerConfig::default())?;
    session.selection.close();
    write_selection(&session.selection)
}

/// Exams behind one body-diagram region; empty when the region is deselected.
#[wasm_bindgen]
pub fn region_exams(
    patient_id: &str,
    region: &str,
    session: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let session = read_session(session, &ViewerConfig::default())?;
    let exams = match find_patient(patient_id) {
        Some(patient) => {
            exams_for_region(&patient.medical_history, &session.regions.selected(), region)
        }
        None => Vec::new(),
    };
    to_value(&exams)
        .map_err(|err| JsValue::from_str(&format!("could not serialize exams: {err}")))
}

#[wasm_bindgen]
pub fn resolve_route(path: &str) -> Result<JsValue, JsValue> {
    to_value(&Route::resolve(path))
        .map_err(|err| JsValue::from_str(&format!("could not serialize route: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<ViewerConfig, JsValue> {
    match config {
        Some(js_cfg) => {
            let cfg: JsViewerConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read config: {err}")))?;
            Ok(ViewerConfig::from(cfg))
        }
        None => Ok(ViewerConfig::default()),
    }
}

fn read_session(session: Option<JsValue>, cfg: &ViewerConfig) -> Result<DetailSession, JsValue> {
    let js = match session {
        Some(value) => from_value::<JsSession>(value)
            .map_err(|err| JsValue::from_str(&format!("could not read session: {err}")))?,
        None => JsSession::default(),
    };
    build_session(js, cfg).map_err(format_record_error)
}

fn build_session(js: JsSession, cfg: &ViewerConfig) -> Result<DetailSession, RecordError> {
    let mut session = DetailSession::new(catalog().anatomical_regions());
    for id in &js.deselected_regions {
        session.regions.set_selected(id, false);
    }

    if let Some(window) = js.window.as_deref() {
        session.window = window.parse()?;
    }
    session.chart = ChartSelection::from_labels(
        js.mode.as_deref(),
        js.department.as_deref(),
        js.anatomy.as_deref(),
    )?;
    if let Some(sort) = js.sort.as_deref() {
        session.sort = sort.parse()?;
    }
    if let Some(selection) = js.selection {
        session.selection = selection;
    }
    if let Some(JsMonth { year, month }) = js.calendar {
        session.calendar = Some(CalendarView::new(year, month, cfg.min_calendar_year)?);
    }
    Ok(session)
}

fn write_selection(selection: &ExamSelection) -> Result<JsValue, JsValue> {
    to_value(selection)
        .map_err(|err| JsValue::from_str(&format!("could not serialize selection: {err}")))
}

fn format_record_error(err: RecordError) -> JsValue {
    JsValue::from_str(&format!("Viewer error: {err}"))
}
