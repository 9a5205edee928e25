//! Scatter chart of exams: one row per department or anatomy group, one column per year.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classify::{region_to_anatomy_group, sector_to_department, AnatomyGroup, Department};
use crate::filter::ViewMode;
use crate::{MedicalExam, ViewerConfig};

/// An exam placed on the chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartExam {
    #[serde(flatten)]
    pub exam: MedicalExam,
    pub x: f64,
    pub y: f64,
    pub selected: bool,
    pub color: String,
    /// Row label the exam was placed on.
    pub group: String,
    pub tooltip: String,
}

/// Everything the chart needs to draw itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartLayout {
    pub mode: ViewMode,
    pub y_labels: Vec<String>,
    pub x_labels: Vec<i32>,
    pub exams: Vec<ChartExam>,
    pub width: f64,
    pub height: f64,
    /// Horizontal position of the "today" marker, `0.0` when the current year has no column.
    pub today_x: f64,
    pub today_visible: bool,
}

impl ChartLayout {
    pub fn build(
        exams: &[&MedicalExam],
        mode: ViewMode,
        selected_ids: &BTreeSet<String>,
        today: NaiveDate,
        config: &ViewerConfig,
    ) -> Self {
        let y_labels = row_labels(mode);
        let x_labels = year_axis(exams);

        let chart_exams: Vec<ChartExam> = exams
            .iter()
            .map(|exam| {
                let (row, color, group) = placement(exam, mode);
                ChartExam {
                    exam: (*exam).clone(),
                    x: x_position(exam.date, &x_labels, config).unwrap_or(0.0),
                    y: y_position(row, config),
                    selected: selected_ids.contains(&exam.id),
                    color: color.to_string(),
                    group: group.to_string(),
                    tooltip: exam.tooltip(),
                }
            })
            .collect();

        let today_position = x_position(today, &x_labels, config);
        if today_position.is_none() && !x_labels.is_empty() {
            tracing::warn!(
                year = today.year(),
                "current year has no chart column, today marker pinned to origin"
            );
        }

        let width = config
            .min_chart_width
            .max(x_labels.len() as f64 * config.year_width);
        let height = config
            .min_chart_height
            .max(y_labels.len() as f64 * config.row_height);

        tracing::debug!(
            exams = chart_exams.len(),
            years = x_labels.len(),
            width,
            height,
            "built exam chart"
        );

        Self {
            mode,
            y_labels,
            x_labels,
            exams: chart_exams,
            width,
            height,
            today_x: today_position.unwrap_or(0.0),
            today_visible: today_position.is_some(),
        }
    }

    /// Left edge of a year column, if the year is on the axis.
    pub fn year_start(&self, year: i32, config: &ViewerConfig) -> Option<f64> {
        self.x_labels
            .iter()
            .position(|label| *label == year)
            .map(|index| index as f64 * config.year_width)
    }
}

/// Row labels for a mode, top to bottom.
pub fn row_labels(mode: ViewMode) -> Vec<String> {
    match mode {
        ViewMode::Department => Department::ALL.iter().map(|d| d.label().to_string()).collect(),
        ViewMode::Anatomy => AnatomyGroup::ALL.iter().map(|g| g.label().to_string()).collect(),
    }
}

/// Sorted distinct years of the given exams.
pub fn year_axis(exams: &[&MedicalExam]) -> Vec<i32> {
    exams
        .iter()
        .map(|exam| exam.date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Year column offset plus the month interpolated across the column.
pub fn x_position(date: NaiveDate, years: &[i32], config: &ViewerConfig) -> Option<f64> {
    let index = years.iter().position(|year| *year == date.year())?;
    let month_offset = f64::from(date.month0()) / 12.0 * config.year_width;
    Some(index as f64 * config.year_width + month_offset)
}

pub fn y_position(row: usize, config: &ViewerConfig) -> f64 {
    row as f64 * config.row_height + config.row_offset
}

fn placement(exam: &MedicalExam, mode: ViewMode) -> (usize, &'static str, &'static str) {
    match mode {
        ViewMode::Department => {
            let dept = sector_to_department(&exam.medical_sector);
            (dept.index(), dept.color(), dept.label())
        }
        ViewMode::Anatomy => {
            let group = region_to_anatomy_group(&exam.anatomical_region);
            (group.index(), group.color(), group.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::exam;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<MedicalExam> {
        vec![
            exam("a", "2022-01-15", "Cœur", "Cardiologie"),
            exam("b", "2024-07-02", "Yeux", "Ophtalmologie"),
            exam("c", "2024-10-20", "Genou", "Orthopédie"),
        ]
    }

    #[test]
    fn years_are_sorted_and_distinct() {
        let exams = sample();
        let refs: Vec<&MedicalExam> = exams.iter().rev().collect();
        assert_eq!(year_axis(&refs), vec![2022, 2024]);
    }

    #[test]
    fn coordinates_follow_row_and_month() {
        let exams = sample();
        let refs: Vec<&MedicalExam> = exams.iter().collect();
        let config = ViewerConfig::default();
        let selected = BTreeSet::from(["b".to_string()]);
        let layout = ChartLayout::build(
            &refs,
            ViewMode::Department,
            &selected,
            day(2024, 4, 1),
            &config,
        );

        let eyes = &layout.exams[1];
        assert_eq!(eyes.group, "OPH");
        assert_eq!(eyes.y, 3.0 * 60.0 + 30.0);
        assert!((eyes.x - (200.0 + 6.0 / 12.0 * 200.0)).abs() < 1e-9);
        assert!(eyes.selected);
        assert_eq!(eyes.color, "#06ffa5");
        assert_eq!(eyes.tooltip, "Exam b (Ophtalmologie)");

        let heart = &layout.exams[0];
        assert_eq!(heart.x, 0.0);
        assert_eq!(heart.y, 30.0);
        assert!(!heart.selected);

        assert!(layout.today_visible);
        assert!((layout.today_x - (200.0 + 3.0 / 12.0 * 200.0)).abs() < 1e-9);
        assert_eq!(layout.year_start(2024, &config), Some(200.0));
        assert_eq!(layout.year_start(2023, &config), None);
    }

    #[test]
    fn today_marker_falls_back_to_origin() {
        let exams = sample();
        let refs: Vec<&MedicalExam> = exams.iter().collect();
        let layout = ChartLayout::build(
            &refs,
            ViewMode::Anatomy,
            &BTreeSet::new(),
            day(2026, 10, 14),
            &ViewerConfig::default(),
        );
        assert!(!layout.today_visible);
        assert_eq!(layout.today_x, 0.0);

        let empty = ChartLayout::build(
            &[],
            ViewMode::Anatomy,
            &BTreeSet::new(),
            day(2026, 10, 14),
            &ViewerConfig::default(),
        );
        assert!(empty.x_labels.is_empty());
        assert_eq!(empty.today_x, 0.0);
    }

    #[test]
    fn canvas_grows_past_minimum() {
        let exams: Vec<MedicalExam> = (2010..2018)
            .map(|year| exam(&year.to_string(), &format!("{year}-03-01"), "Genou", "Orthopédie"))
            .collect();
        let refs: Vec<&MedicalExam> = exams.iter().collect();
        let config = ViewerConfig::default();
        let layout = ChartLayout::build(
            &refs,
            ViewMode::Anatomy,
            &BTreeSet::new(),
            day(2017, 1, 1),
            &config,
        );
        assert_eq!(layout.width, 1600.0);
        assert_eq!(layout.height, 600.0);
        assert_eq!(layout.y_labels.len(), 10);
        assert_eq!(layout.exams[0].group, "Lower Body");
        assert_eq!(layout.exams[0].y, 3.0 * 60.0 + 30.0);

        let dept = ChartLayout::build(
            &refs[..1],
            ViewMode::Department,
            &BTreeSet::new(),
            day(2017, 1, 1),
            &config,
        );
        assert_eq!(dept.width, 1000.0);
        assert_eq!(dept.height, 500.0);
    }
}
