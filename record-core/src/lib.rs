//! Core view-model derivation for the patient record viewer.

use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod chart;
pub mod classify;
pub mod filter;
mod model;
pub mod overview;
pub mod regions;
pub mod route;
pub mod selection;
pub mod session;

pub use calendar::{CalendarDay, CalendarMonth, CalendarStep, CalendarView};
pub use chart::{ChartExam, ChartLayout};
pub use classify::{region_to_anatomy_group, sector_to_department, AnatomyGroup, Department};
pub use filter::{sort_exams, ChartSelection, ExamFilter, SortOrder, TimelineWindow, ViewMode};
pub use model::{
    AnatomicalRegion, Diagnosis, EmergencyContact, Gender, MedicalExam, Patient, Severity,
};
pub use overview::{RegionSummary, SectorGrid};
pub use regions::RegionFilter;
pub use route::Route;
pub use selection::{ExamSelection, Focus};
pub use session::{DerivedViews, DetailSession, ListedExam};

/// Geometry and bounds of the derived views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Earliest year the calendar may navigate to.
    pub min_calendar_year: i32,
    pub row_height: f64,
    /// Vertical offset of the first chart row.
    pub row_offset: f64,
    /// Width of one year column on the chart.
    pub year_width: f64,
    pub min_chart_width: f64,
    pub min_chart_height: f64,
    /// Characters of the full report kept in list excerpts.
    pub excerpt_length: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_calendar_year: 2020,
            row_height: 60.0,
            row_offset: 30.0,
            year_width: 200.0,
            min_chart_width: 1000.0,
            min_chart_height: 500.0,
            excerpt_length: 150,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(input: &str) -> Result<Self, RecordError> {
        serde_json::from_str(input).map_err(|err| RecordError::Parse(err.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("could not read input: {0}")]
    Parse(String),
    #[error("no such month {month} in year {year}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("unknown option: {0}")]
    UnknownOption(String),
}
