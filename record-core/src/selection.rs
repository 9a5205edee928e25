//! Which exams are open in the report modal, and the batch being collected for it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;
use crate::MedicalExam;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", content = "exams", rename_all = "snake_case")]
pub enum Focus {
    #[default]
    None,
    Single(MedicalExam),
    Multi(Vec<MedicalExam>),
}

/// Modal focus plus the accumulated multi-select batch.
///
/// Closing the modal leaves the batch untouched; only [`ExamSelection::reset`]
/// clears everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExamSelection {
    focus: Focus,
    batch: Vec<MedicalExam>,
}

impl ExamSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn batch(&self) -> &[MedicalExam] {
        &self.batch
    }

    /// Ids of the batch, as the chart marks selected points.
    pub fn batch_ids(&self) -> BTreeSet<String> {
        self.batch.iter().map(|exam| exam.id.clone()).collect()
    }

    pub fn is_batched(&self, exam_id: &str) -> bool {
        self.batch.iter().any(|exam| exam.id == exam_id)
    }

    /// Chart point click: a modifier toggles batch membership, a plain click opens the exam.
    pub fn click(&mut self, exam: &MedicalExam, with_modifier: bool) {
        if with_modifier {
            self.toggle(exam);
        } else {
            self.open(exam);
        }
    }

    /// Replaces any current focus with this one exam.
    pub fn open(&mut self, exam: &MedicalExam) {
        self.focus = Focus::Single(exam.clone());
    }

    /// Adds or removes an exam from the batch. Returns whether it is now batched.
    pub fn toggle(&mut self, exam: &MedicalExam) -> bool {
        if let Some(index) = self.batch.iter().position(|batched| batched.id == exam.id) {
            self.batch.remove(index);
            false
        } else {
            self.batch.push(exam.clone());
            true
        }
    }

    /// Opens the whole batch. An empty batch leaves the focus as it was.
    pub fn open_batch(&mut self) -> bool {
        if self.batch.is_empty() {
            return false;
        }
        self.focus = Focus::Multi(self.batch.clone());
        true
    }

    /// One exam opens alone, several open together, an empty day does nothing.
    pub fn open_day(&mut self, day: &CalendarDay) {
        match day.exams.as_slice() {
            [] => {}
            [single] => self.focus = Focus::Single(single.clone()),
            many => self.focus = Focus::Multi(many.to_vec()),
        }
    }

    pub fn close(&mut self) {
        self.focus = Focus::None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::fixtures::exam;

    fn day_with(exams: Vec<MedicalExam>) -> CalendarDay {
        CalendarDay::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), true, exams)
    }

    #[test]
    fn plain_click_replaces_focus() {
        let a = exam("a", "2024-01-08", "Cœur", "Cardiologie");
        let b = exam("b", "2024-01-09", "Genou", "Orthopédie");
        let mut selection = ExamSelection::new();
        assert_eq!(selection.focus(), &Focus::None);

        selection.click(&a, false);
        selection.click(&b, false);
        assert_eq!(selection.focus(), &Focus::Single(b));
    }

    #[test]
    fn modifier_click_builds_batch_without_focus() {
        let a = exam("a", "2024-01-08", "Cœur", "Cardiologie");
        let b = exam("b", "2024-01-09", "Genou", "Orthopédie");
        let mut selection = ExamSelection::new();

        selection.click(&a, true);
        selection.click(&b, true);
        selection.click(&a, true);
        assert_eq!(selection.focus(), &Focus::None);
        assert!(!selection.is_batched("a"));
        assert!(selection.is_batched("b"));

        selection.click(&a, true);
        assert!(selection.open_batch());
        assert_eq!(selection.focus(), &Focus::Multi(vec![b.clone(), a.clone()]));

        selection.close();
        assert_eq!(selection.focus(), &Focus::None);
        assert_eq!(selection.batch().len(), 2);

        selection.reset();
        assert!(selection.batch().is_empty());
    }

    #[test]
    fn empty_batch_does_not_open() {
        let a = exam("a", "2024-01-08", "Cœur", "Cardiologie");
        let mut selection = ExamSelection::new();
        selection.open(&a);
        assert!(!selection.open_batch());
        assert_eq!(selection.focus(), &Focus::Single(a));
    }

    #[test]
    fn calendar_days_open_by_exam_count() {
        let a = exam("a", "2024-01-08", "Cœur", "Cardiologie");
        let b = exam("b", "2024-01-08", "Genou", "Orthopédie");
        let c = exam("c", "2024-01-08", "Yeux", "Ophtalmologie");
        let mut selection = ExamSelection::new();

        selection.open_day(&day_with(vec![]));
        assert_eq!(selection.focus(), &Focus::None);

        selection.open_day(&day_with(vec![a.clone()]));
        assert_eq!(selection.focus(), &Focus::Single(a.clone()));

        selection.open_day(&day_with(vec![a.clone(), b.clone(), c.clone()]));
        assert_eq!(selection.focus(), &Focus::Multi(vec![a, b, c]));
    }
}
