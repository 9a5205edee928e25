//! Month grid of the exam calendar and its navigation.

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{MedicalExam, RecordError};

/// Cells in a grid: six Monday-first weeks.
pub const GRID_CELLS: usize = 42;

/// Badge colour steps stop at this count.
const MAX_BADGE_LEVEL: usize = 5;

const MONTH_NAMES: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre",
    "Octobre", "Novembre", "Décembre",
];

pub const WEEK_DAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

/// French name of a month in 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub number: u32,
    pub in_month: bool,
    pub date: NaiveDate,
    pub exams: Vec<MedicalExam>,
    /// Badge colour step, `min(exam count, 5)`.
    pub badge_level: usize,
    /// Hover text; empty for a day without exams.
    pub tooltip: String,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, in_month: bool, exams: Vec<MedicalExam>) -> Self {
        let tooltip = match exams.as_slice() {
            [single] => format!("{} - {}", single.title, single.medical_sector),
            many => many
                .iter()
                .map(MedicalExam::tooltip)
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Self {
            number: date.day(),
            in_month,
            date,
            badge_level: exams.len().min(MAX_BADGE_LEVEL),
            tooltip,
            exams,
        }
    }
}

/// The month currently displayed, bounded by `min_year` below and by today above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarView {
    first_day: NaiveDate,
    min_year: i32,
}

impl CalendarView {
    pub fn new(year: i32, month: u32, min_year: i32) -> Result<Self, RecordError> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(RecordError::InvalidMonth { year, month })?;
        Ok(Self { first_day, min_year })
    }

    /// Opens on the month of the earliest exam, or on the current month without exams.
    pub fn at_earliest_exam(exams: &[&MedicalExam], today: NaiveDate, min_year: i32) -> Self {
        let anchor = exams.iter().map(|exam| exam.date).min().unwrap_or(today);
        Self {
            first_day: month_start(anchor),
            min_year,
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Month in 1..=12.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first_day)
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month()).unwrap_or_default(), self.year())
    }

    /// The 42 cells starting on the Monday on or before the first of the month.
    pub fn days(&self, exams: &[&MedicalExam]) -> Vec<CalendarDay> {
        let offset = self.first_day.weekday().num_days_from_monday();
        let start = self
            .first_day
            .checked_sub_days(chrono::Days::new(u64::from(offset)))
            .unwrap_or(self.first_day);

        start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| {
                let in_month = date.year() == self.year() && date.month() == self.month();
                let on_day = exams
                    .iter()
                    .filter(|exam| exam.date == date)
                    .map(|exam| (*exam).clone())
                    .collect();
                CalendarDay::new(date, in_month, on_day)
            })
            .collect()
    }

    pub fn can_go_previous_month(&self) -> bool {
        (self.year(), self.month()) > (self.min_year, 1)
    }

    pub fn can_go_next_month(&self, today: NaiveDate) -> bool {
        (self.year(), self.month()) < (today.year(), today.month())
    }

    pub fn can_go_previous_year(&self) -> bool {
        self.year() > self.min_year
    }

    pub fn can_go_next_year(&self, today: NaiveDate) -> bool {
        self.year() < today.year()
    }

    /// Steps one month back, rolling the year in January. Returns whether it moved.
    pub fn previous_month(&mut self) -> bool {
        if !self.can_go_previous_month() {
            return false;
        }
        self.shift(|day| day.checked_sub_months(Months::new(1)))
    }

    pub fn next_month(&mut self, today: NaiveDate) -> bool {
        if !self.can_go_next_month(today) {
            return false;
        }
        self.shift(|day| day.checked_add_months(Months::new(1)))
    }

    pub fn previous_year(&mut self) -> bool {
        if !self.can_go_previous_year() {
            return false;
        }
        self.shift(|day| day.checked_sub_months(Months::new(12)))
    }

    /// Steps one year forward. Landing in the current year never passes the current month.
    pub fn next_year(&mut self, today: NaiveDate) -> bool {
        if !self.can_go_next_year(today) {
            return false;
        }
        let limit = month_start(today);
        self.shift(|day| day.checked_add_months(Months::new(12)).map(|next| next.min(limit)))
    }

    /// Latest exam dated before the first day of the displayed month.
    pub fn previous_exam<'a>(&self, exams: &[&'a MedicalExam]) -> Option<&'a MedicalExam> {
        exams
            .iter()
            .copied()
            .filter(|exam| exam.date < self.first_day)
            .max_by_key(|exam| exam.date)
    }

    /// Earliest exam dated after the last day of the displayed month.
    pub fn next_exam<'a>(&self, exams: &[&'a MedicalExam]) -> Option<&'a MedicalExam> {
        let last_day = self.last_day();
        exams
            .iter()
            .copied()
            .filter(|exam| exam.date > last_day)
            .min_by_key(|exam| exam.date)
    }

    /// Retargets on the month of the previous exam. Returns whether one existed.
    pub fn jump_to_previous_exam(&mut self, exams: &[&MedicalExam]) -> bool {
        match self.previous_exam(exams) {
            Some(exam) => {
                tracing::debug!(exam = %exam.id, "calendar jumped to previous exam");
                self.first_day = month_start(exam.date);
                true
            }
            None => false,
        }
    }

    pub fn jump_to_next_exam(&mut self, exams: &[&MedicalExam]) -> bool {
        match self.next_exam(exams) {
            Some(exam) => {
                tracing::debug!(exam = %exam.id, "calendar jumped to next exam");
                self.first_day = month_start(exam.date);
                true
            }
            None => false,
        }
    }

    /// Grid plus the enabled state of every control, ready for rendering.
    pub fn snapshot(&self, exams: &[&MedicalExam], today: NaiveDate) -> CalendarMonth {
        CalendarMonth {
            year: self.year(),
            month: self.month(),
            title: self.title(),
            days: self.days(exams),
            can_go_previous_month: self.can_go_previous_month(),
            can_go_next_month: self.can_go_next_month(today),
            can_go_previous_year: self.can_go_previous_year(),
            can_go_next_year: self.can_go_next_year(today),
            has_previous_exam: self.previous_exam(exams).is_some(),
            has_next_exam: self.next_exam(exams).is_some(),
        }
    }

    fn shift(&mut self, step: impl FnOnce(NaiveDate) -> Option<NaiveDate>) -> bool {
        match step(self.first_day) {
            Some(day) => {
                self.first_day = month_start(day);
                true
            }
            None => false,
        }
    }
}

/// A calendar control, as sent by a front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarStep {
    PreviousMonth,
    NextMonth,
    PreviousYear,
    NextYear,
    PreviousExam,
    NextExam,
}

impl CalendarStep {
    /// Applies the step. Returns whether the displayed month changed.
    pub fn apply(self, view: &mut CalendarView, exams: &[&MedicalExam], today: NaiveDate) -> bool {
        match self {
            CalendarStep::PreviousMonth => view.previous_month(),
            CalendarStep::NextMonth => view.next_month(today),
            CalendarStep::PreviousYear => view.previous_year(),
            CalendarStep::NextYear => view.next_year(today),
            CalendarStep::PreviousExam => view.jump_to_previous_exam(exams),
            CalendarStep::NextExam => view.jump_to_next_exam(exams),
        }
    }
}

impl FromStr for CalendarStep {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "previous_month" | "prev_month" => Ok(CalendarStep::PreviousMonth),
            "next_month" => Ok(CalendarStep::NextMonth),
            "previous_year" | "prev_year" => Ok(CalendarStep::PreviousYear),
            "next_year" => Ok(CalendarStep::NextYear),
            "previous_exam" | "prev_exam" => Ok(CalendarStep::PreviousExam),
            "next_exam" => Ok(CalendarStep::NextExam),
            _ => Err(RecordError::UnknownOption(format!("calendar step {s:?}"))),
        }
    }
}

/// Rendered state of one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub days: Vec<CalendarDay>,
    pub can_go_previous_month: bool,
    pub can_go_next_month: bool,
    pub can_go_previous_year: bool,
    pub can_go_next_year: bool,
    pub has_previous_exam: bool,
    pub has_next_exam: bool,
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
