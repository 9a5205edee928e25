//! Detail-view session: filter state in, derived views out.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDay, CalendarMonth, CalendarStep, CalendarView};
use crate::chart::ChartLayout;
use crate::filter::{sort_exams, ChartSelection, ExamFilter, SortOrder, TimelineWindow};
use crate::overview::{region_summaries, RegionSummary, SectorGrid};
use crate::regions::RegionFilter;
use crate::selection::ExamSelection;
use crate::{AnatomicalRegion, MedicalExam, Patient, ViewerConfig};

/// State owned by one visit of a patient's detail view. Nothing here outlives the visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailSession {
    pub regions: RegionFilter,
    #[serde(default)]
    pub window: TimelineWindow,
    #[serde(default)]
    pub chart: ChartSelection,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub selection: ExamSelection,
    /// `None` until the calendar is first shown; it then opens on the earliest exam.
    #[serde(default)]
    pub calendar: Option<CalendarView>,
}

/// An exam row of the list, with its report excerpt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListedExam {
    #[serde(flatten)]
    pub exam: MedicalExam,
    pub excerpt: String,
}

/// Everything the detail view renders, recomputed from scratch on each change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedViews {
    /// Region-filtered history in the chosen order.
    pub exams: Vec<ListedExam>,
    pub chart: ChartLayout,
    pub sector_grid: SectorGrid,
    pub calendar: CalendarMonth,
    pub body_regions: Vec<RegionSummary>,
}

impl DetailSession {
    pub fn new(regions: Vec<AnatomicalRegion>) -> Self {
        Self {
            regions: RegionFilter::new(regions),
            ..Self::default()
        }
    }

    /// Filter for the list, grid and calendar: regions only.
    pub fn list_filter(&self) -> ExamFilter {
        ExamFilter::new(self.regions.selected_names())
    }

    /// Filter for the chart: regions, time window and grouping.
    pub fn chart_filter(&self) -> ExamFilter {
        self.list_filter()
            .with_window(self.window)
            .with_grouping(self.chart)
    }

    /// Calendar for this session, opened on the earliest visible exam when unset.
    pub fn calendar_view(
        &self,
        patient: &Patient,
        now: NaiveDateTime,
        config: &ViewerConfig,
    ) -> CalendarView {
        self.calendar.unwrap_or_else(|| {
            let exams = self.list_filter().apply(&patient.medical_history, now);
            CalendarView::at_earliest_exam(&exams, now.date(), config.min_calendar_year)
        })
    }

    /// Applies a calendar control over the region-filtered history and keeps the
    /// resulting month. Returns whether the month changed.
    pub fn step_calendar(
        &mut self,
        patient: &Patient,
        step: CalendarStep,
        now: NaiveDateTime,
        config: &ViewerConfig,
    ) -> bool {
        let mut view = self.calendar_view(patient, now, config);
        let exams = self.list_filter().apply(&patient.medical_history, now);
        let moved = step.apply(&mut view, &exams, now.date());
        self.calendar = Some(view);
        moved
    }

    /// Chart click on an exam of the patient. Unknown ids are ignored.
    pub fn click_exam(&mut self, patient: &Patient, exam_id: &str, with_modifier: bool) -> bool {
        match patient.medical_history.iter().find(|exam| exam.id == exam_id) {
            Some(exam) => {
                self.selection.click(exam, with_modifier);
                true
            }
            None => false,
        }
    }

    /// Opens the visible exams of one calendar day.
    pub fn open_calendar_day(
        &mut self,
        patient: &Patient,
        date: NaiveDate,
        now: NaiveDateTime,
    ) {
        let on_day: Vec<MedicalExam> = self
            .list_filter()
            .apply(&patient.medical_history, now)
            .into_iter()
            .filter(|exam| exam.date == date)
            .cloned()
            .collect();
        self.selection.open_day(&CalendarDay::new(date, true, on_day));
    }

    pub fn derive(
        &self,
        patient: &Patient,
        now: NaiveDateTime,
        config: &ViewerConfig,
    ) -> DerivedViews {
        let history = &patient.medical_history;

        let mut listed = self.list_filter().apply(history, now);
        sort_exams(&mut listed, self.sort);

        let charted = self.chart_filter().apply(history, now);
        let chart = ChartLayout::build(
            &charted,
            self.chart.mode,
            &self.selection.batch_ids(),
            now.date(),
            config,
        );

        let calendar = self
            .calendar_view(patient, now, config)
            .snapshot(&listed, now.date());

        tracing::debug!(
            patient = %patient.id,
            listed = listed.len(),
            charted = chart.exams.len(),
            "derived detail views"
        );

        DerivedViews {
            sector_grid: SectorGrid::build(&listed),
            body_regions: region_summaries(history, &self.regions.selected()),
            exams: listed
                .into_iter()
                .map(|exam| ListedExam {
                    excerpt: exam.excerpt(config.excerpt_length),
                    exam: exam.clone(),
                })
                .collect(),
            chart,
            calendar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{exam, patient};
    use crate::{Department, Focus, ViewMode};

    fn region(id: &str, name: &str, sector: &str) -> AnatomicalRegion {
        AnatomicalRegion {
            id: id.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            selected: true,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn setup() -> (Patient, DetailSession) {
        let patient = patient(vec![
            exam("1", "2024-01-08", "Cœur", "Cardiologie"),
            exam("2", "2023-08-30", "Yeux", "Ophtalmologie"),
            exam("3", "2022-12-15", "Abdomen", "Gastroentérologie"),
        ]);
        let session = DetailSession::new(vec![
            region("heart", "Cœur", "Cardiologie"),
            region("eyes", "Yeux", "Ophtalmologie"),
            region("abdomen", "Abdomen", "Gastroentérologie"),
        ]);
        (patient, session)
    }

    #[test]
    fn derives_every_view_from_one_state() {
        let (patient, mut session) = setup();
        session.regions.toggle("abdomen");
        let views = session.derive(&patient, now(), &ViewerConfig::default());

        let ids: Vec<&str> = views.exams.iter().map(|e| e.exam.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(views.chart.exams.len(), 2);
        assert_eq!(views.sector_grid.years, vec![2023, 2024]);
        assert_eq!((views.calendar.year, views.calendar.month), (2023, 8));
        assert_eq!(views.body_regions.len(), 2);
    }

    #[test]
    fn list_rows_carry_configured_excerpt() {
        let (mut patient, session) = setup();
        patient.medical_history[0].full_report = "Rythme sinusal régulier.".to_string();
        let config = ViewerConfig {
            excerpt_length: 6,
            ..ViewerConfig::default()
        };
        let views = session.derive(&patient, now(), &config);
        let heart = views
            .exams
            .iter()
            .find(|row| row.exam.id == "1")
            .expect("heart exam listed");
        assert_eq!(heart.excerpt, "Rythme...");
    }

    #[test]
    fn window_and_grouping_narrow_the_chart_only() {
        let (patient, mut session) = setup();
        session.window = TimelineWindow::OneYear;
        session.chart = ChartSelection {
            mode: ViewMode::Department,
            department: Some(Department::Radio),
            anatomy: None,
        };
        let views = session.derive(&patient, now(), &ViewerConfig::default());
        assert_eq!(views.exams.len(), 3);
        let charted: Vec<&str> = views.chart.exams.iter().map(|e| e.exam.id.as_str()).collect();
        assert_eq!(charted, ["1"]);
    }

    #[test]
    fn batch_marks_chart_points() {
        let (patient, mut session) = setup();
        let eyes = patient.medical_history[1].clone();
        session.selection.toggle(&eyes);
        let views = session.derive(&patient, now(), &ViewerConfig::default());
        let marked: Vec<&str> = views
            .chart
            .exams
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.exam.id.as_str())
            .collect();
        assert_eq!(marked, ["2"]);
    }

    #[test]
    fn exam_jumps_skip_deselected_regions() {
        let (patient, mut session) = setup();
        let config = ViewerConfig::default();
        session.calendar = Some(CalendarView::new(2024, 1, 2020).unwrap());
        session.regions.toggle("eyes");

        assert!(session.step_calendar(&patient, CalendarStep::PreviousExam, now(), &config));
        let views = session.derive(&patient, now(), &config);
        assert_eq!((views.calendar.year, views.calendar.month), (2022, 12));

        session.calendar = Some(CalendarView::new(2024, 1, 2020).unwrap());
        session.regions.toggle("abdomen");
        let views = session.derive(&patient, now(), &config);
        assert!(!views.calendar.has_previous_exam);
        assert!(!session.step_calendar(&patient, CalendarStep::PreviousExam, now(), &config));
        assert_eq!(session.calendar.map(|view| view.month()), Some(1));
    }

    #[test]
    fn clicks_and_days_drive_the_focus() {
        let (patient, mut session) = setup();
        assert!(session.click_exam(&patient, "2", true));
        assert!(!session.click_exam(&patient, "missing", false));
        assert_eq!(session.selection.focus(), &Focus::None);
        assert!(session.selection.is_batched("2"));

        let new_year = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        session.open_calendar_day(&patient, new_year, now());
        assert_eq!(
            session.selection.focus(),
            &Focus::Single(patient.medical_history[0].clone())
        );

        session.regions.toggle("heart");
        session.selection.close();
        session.open_calendar_day(&patient, new_year, now());
        assert_eq!(session.selection.focus(), &Focus::None);
    }

    #[test]
    fn kept_calendar_is_not_retargeted() {
        let (patient, mut session) = setup();
        session.calendar = Some(CalendarView::new(2024, 1, 2020).unwrap());
        let views = session.derive(&patient, now(), &ViewerConfig::default());
        assert_eq!((views.calendar.year, views.calendar.month), (2024, 1));
        assert!(views.calendar.has_previous_exam);
        assert!(!views.calendar.has_next_exam);
    }
}
