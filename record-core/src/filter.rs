//! Exam filtering by region, time window and chart grouping, plus the list orders.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::classify::{region_to_anatomy_group, sector_to_department, AnatomyGroup, Department};
use crate::{MedicalExam, RecordError};

/// How far back the chart looks, relative to the evaluation instant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimelineWindow {
    #[default]
    All,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    MoreThanThreeYears,
}

impl TimelineWindow {
    pub const ALL: [TimelineWindow; 8] = [
        TimelineWindow::All,
        TimelineWindow::OneWeek,
        TimelineWindow::OneMonth,
        TimelineWindow::ThreeMonths,
        TimelineWindow::SixMonths,
        TimelineWindow::OneYear,
        TimelineWindow::ThreeYears,
        TimelineWindow::MoreThanThreeYears,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimelineWindow::All => "ALL",
            TimelineWindow::OneWeek => "1 Week",
            TimelineWindow::OneMonth => "1 Month",
            TimelineWindow::ThreeMonths => "3 Months",
            TimelineWindow::SixMonths => "6 Months",
            TimelineWindow::OneYear => "1 Year",
            TimelineWindow::ThreeYears => "3 Years",
            TimelineWindow::MoreThanThreeYears => "More than 3 years",
        }
    }

    fn short_code(self) -> &'static str {
        match self {
            TimelineWindow::All => "all",
            TimelineWindow::OneWeek => "1w",
            TimelineWindow::OneMonth => "1m",
            TimelineWindow::ThreeMonths => "3m",
            TimelineWindow::SixMonths => "6m",
            TimelineWindow::OneYear => "1y",
            TimelineWindow::ThreeYears => "3y",
            TimelineWindow::MoreThanThreeYears => "3y+",
        }
    }

    /// Earliest instant an exam may carry to stay visible. `None` means unbounded.
    ///
    /// The week window subtracts a fixed duration from `now`; the month and year
    /// windows step back on the calendar and start at midnight. A day missing from
    /// the target month clamps to that month's last day (31 March minus one month
    /// is 29 February) rather than rolling over into the next month.
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let months_back = |months: u32| {
            let day = now
                .date()
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN);
            day.and_time(NaiveTime::MIN)
        };

        match self {
            TimelineWindow::All => None,
            TimelineWindow::OneWeek => {
                Some(now.checked_sub_signed(Duration::days(7)).unwrap_or(NaiveDateTime::MIN))
            }
            TimelineWindow::OneMonth => Some(months_back(1)),
            TimelineWindow::ThreeMonths => Some(months_back(3)),
            TimelineWindow::SixMonths => Some(months_back(6)),
            TimelineWindow::OneYear => Some(months_back(12)),
            TimelineWindow::ThreeYears => Some(months_back(36)),
            TimelineWindow::MoreThanThreeYears => {
                NaiveDate::from_ymd_opt(1970, 1, 1).map(|day| day.and_time(NaiveTime::MIN))
            }
        }
    }

    pub fn admits(self, exam: &MedicalExam, now: NaiveDateTime) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => exam.date.and_time(NaiveTime::MIN) >= cutoff,
            None => true,
        }
    }
}

impl fmt::Display for TimelineWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimelineWindow {
    type Err = RecordError;

    /// Accepts the display label (`"3 Months"`) or the short code (`"3m"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|window| {
                window.label().eq_ignore_ascii_case(needle)
                    || window.short_code().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| RecordError::UnknownOption(format!("timeline window {s:?}")))
    }
}

/// Row axis of the scatter chart.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Department,
    Anatomy,
}

impl FromStr for ViewMode {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "department" | "dept" => Ok(ViewMode::Department),
            "anatomy" => Ok(ViewMode::Anatomy),
            _ => Err(RecordError::UnknownOption(format!("view mode {s:?}"))),
        }
    }
}

/// Chart grouping and the group the user narrowed it to, if any.
///
/// Both narrowings are kept so switching modes back and forth restores the
/// previous choice; only the one matching `mode` is applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSelection {
    pub mode: ViewMode,
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(default)]
    pub anatomy: Option<AnatomyGroup>,
}

impl ChartSelection {
    /// Builds a selection from front-end labels. An absent label or `"ALL"` leaves
    /// that grouping unnarrowed, and an absent mode keeps the default.
    pub fn from_labels(
        mode: Option<&str>,
        department: Option<&str>,
        anatomy: Option<&str>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            mode: mode.map(str::parse).transpose()?.unwrap_or_default(),
            department: parse_group(department)?,
            anatomy: parse_group(anatomy)?,
        })
    }

    pub fn matches(&self, exam: &MedicalExam) -> bool {
        match self.mode {
            ViewMode::Department => self
                .department
                .map_or(true, |dept| sector_to_department(&exam.medical_sector) == dept),
            ViewMode::Anatomy => self
                .anatomy
                .map_or(true, |group| region_to_anatomy_group(&exam.anatomical_region) == group),
        }
    }
}

fn parse_group<T>(label: Option<&str>) -> Result<Option<T>, RecordError>
where
    T: FromStr<Err = RecordError>,
{
    match label.map(str::trim) {
        None => Ok(None),
        Some(label) if label.eq_ignore_ascii_case("all") => Ok(None),
        Some(label) => label.parse().map(Some),
    }
}

/// Filter state handed down to every view fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExamFilter {
    /// Names of the selected anatomical regions.
    pub regions: BTreeSet<String>,
    #[serde(default)]
    pub window: TimelineWindow,
    #[serde(default)]
    pub grouping: Option<ChartSelection>,
}

impl ExamFilter {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            window: TimelineWindow::All,
            grouping: None,
        }
    }

    pub fn with_window(mut self, window: TimelineWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_grouping(mut self, grouping: ChartSelection) -> Self {
        self.grouping = Some(grouping);
        self
    }

    /// Region membership first, then the time window, then the chart grouping.
    /// Input order is preserved.
    pub fn apply<'a>(&self, exams: &'a [MedicalExam], now: NaiveDateTime) -> Vec<&'a MedicalExam> {
        let filtered: Vec<&MedicalExam> = exams
            .iter()
            .filter(|exam| self.regions.contains(&exam.anatomical_region))
            .filter(|exam| self.window.admits(exam, now))
            .filter(|exam| self.grouping.map_or(true, |grouping| grouping.matches(exam)))
            .collect();

        tracing::debug!(
            total = exams.len(),
            kept = filtered.len(),
            window = self.window.label(),
            "filtered exam history"
        );
        filtered
    }
}

/// Orders offered by the exam list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
    Sector,
    Diagnosis,
}

impl FromStr for SortOrder {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date-asc" => Ok(SortOrder::DateAsc),
            "date-desc" => Ok(SortOrder::DateDesc),
            "sector" => Ok(SortOrder::Sector),
            "diagnosis" => Ok(SortOrder::Diagnosis),
            _ => Err(RecordError::UnknownOption(format!("sort order {s:?}"))),
        }
    }
}

/// Accent- and case-folded form of a label, so "Néphrologie" sorts next to "Neurologie".
fn collation_key(label: &str) -> String {
    label
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Stable sort: ties keep their relative input order.
pub fn sort_exams(exams: &mut [&MedicalExam], order: SortOrder) {
    match order {
        SortOrder::DateAsc => exams.sort_by_key(|exam| exam.date),
        SortOrder::DateDesc => exams.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Sector => exams.sort_by(|a, b| {
            collation_key(&a.medical_sector)
                .cmp(&collation_key(&b.medical_sector))
                .then_with(|| a.medical_sector.cmp(&b.medical_sector))
        }),
        SortOrder::Diagnosis => {
            exams.sort_by(|a, b| a.diagnosis.as_str().cmp(b.diagnosis.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::exam;
    use crate::Diagnosis;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn history() -> Vec<MedicalExam> {
        vec![
            exam("1", "2024-03-01", "Cœur", "Cardiologie"),
            exam("2", "2024-02-20", "Yeux", "Ophtalmologie"),
            exam("3", "2023-12-31", "Genou", "Orthopédie"),
            exam("4", "2021-01-10", "Oreilles", "ORL"),
            exam("5", "2024-02-28", "Fémur", "Orthopédie"),
        ]
    }

    fn all_regions() -> ExamFilter {
        ExamFilter::new(["Cœur", "Yeux", "Genou", "Oreilles", "Fémur"])
    }

    fn ids(exams: &[&MedicalExam]) -> Vec<String> {
        exams.iter().map(|exam| exam.id.clone()).collect()
    }

    #[test]
    fn month_windows_clamp_to_month_end_instead_of_rolling_over() {
        let now = at(2024, 3, 31, 15);
        assert_eq!(TimelineWindow::OneMonth.cutoff(now), Some(at(2024, 2, 29, 0)));
        assert_eq!(TimelineWindow::OneYear.cutoff(now), Some(at(2023, 3, 31, 0)));
        assert_eq!(TimelineWindow::ThreeYears.cutoff(now), Some(at(2021, 3, 31, 0)));
        assert_eq!(TimelineWindow::All.cutoff(now), None);

        let leap_day = vec![exam("1", "2024-02-29", "Cœur", "Cardiologie")];
        let kept = ExamFilter::new(["Cœur"])
            .with_window(TimelineWindow::OneMonth)
            .apply(&leap_day, now);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn week_window_keeps_time_of_day() {
        let now = at(2024, 3, 8, 9);
        assert_eq!(TimelineWindow::OneWeek.cutoff(now), Some(at(2024, 3, 1, 9)));
        // Midnight of the first day is already before the cutoff.
        let exams = history();
        assert!(all_regions()
            .with_window(TimelineWindow::OneWeek)
            .apply(&exams, now)
            .is_empty());
    }

    #[test]
    fn window_partitions_on_cutoff() {
        let exams = history();
        let now = at(2024, 3, 15, 10);
        for window in TimelineWindow::ALL {
            let kept = all_regions().with_window(window).apply(&exams, now);
            let kept_ids = ids(&kept);
            for exam in &exams {
                let visible = kept_ids.contains(&exam.id);
                match window.cutoff(now) {
                    Some(cutoff) => {
                        assert_eq!(visible, exam.date.and_time(NaiveTime::MIN) >= cutoff)
                    }
                    None => assert!(visible),
                }
            }
        }
    }

    #[test]
    fn regions_filter_first() {
        let exams = history();
        let filter = ExamFilter::new(["Cœur", "Genou"]);
        assert_eq!(ids(&filter.apply(&exams, at(2024, 3, 15, 0))), ["1", "3"]);
        assert!(ExamFilter::default().apply(&exams, at(2024, 3, 15, 0)).is_empty());
    }

    #[test]
    fn grouping_applies_current_mode_only() {
        let exams = history();
        let now = at(2024, 3, 15, 0);
        let mut grouping = ChartSelection {
            mode: ViewMode::Department,
            department: Some(Department::Others),
            anatomy: Some(AnatomyGroup::LowerBody),
        };
        assert_eq!(ids(&all_regions().with_grouping(grouping).apply(&exams, now)), ["4"]);

        grouping.mode = ViewMode::Anatomy;
        assert_eq!(ids(&all_regions().with_grouping(grouping).apply(&exams, now)), ["3"]);

        grouping.anatomy = Some(AnatomyGroup::Others);
        assert_eq!(ids(&all_regions().with_grouping(grouping).apply(&exams, now)), ["5"]);
    }

    #[test]
    fn date_orders_reverse_each_other() {
        let exams = history();
        let mut asc: Vec<&MedicalExam> = exams.iter().collect();
        let mut desc = asc.clone();
        sort_exams(&mut asc, SortOrder::DateAsc);
        sort_exams(&mut desc, SortOrder::DateDesc);
        desc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
        assert_eq!(ids(&asc), ["4", "3", "2", "5", "1"]);
    }

    #[test]
    fn sector_and_diagnosis_sorts_are_stable() {
        let mut exams = history();
        exams[0].diagnosis = Diagnosis::Positive;
        exams[3].diagnosis = Diagnosis::Pending;
        let mut by_sector: Vec<&MedicalExam> = exams.iter().collect();
        sort_exams(&mut by_sector, SortOrder::Sector);
        assert_eq!(ids(&by_sector), ["1", "2", "4", "3", "5"]);

        let mut by_diagnosis: Vec<&MedicalExam> = exams.iter().collect();
        sort_exams(&mut by_diagnosis, SortOrder::Diagnosis);
        assert_eq!(ids(&by_diagnosis), ["2", "3", "5", "4", "1"]);
    }

    #[test]
    fn selection_labels_treat_all_as_unnarrowed() {
        let selection = ChartSelection::from_labels(Some("anatomy"), Some("ALL"), Some("Foot"))
            .unwrap();
        assert_eq!(selection.mode, ViewMode::Anatomy);
        assert_eq!(selection.department, None);
        assert_eq!(selection.anatomy, Some(AnatomyGroup::Foot));

        let default = ChartSelection::from_labels(None, Some("oph"), None).unwrap();
        assert_eq!(default.mode, ViewMode::Department);
        assert_eq!(default.department, Some(Department::Ophthalmology));
        assert!(matches!(
            ChartSelection::from_labels(None, Some("Dermato"), None),
            Err(RecordError::UnknownOption(_))
        ));
    }

    #[test]
    fn sector_sort_ignores_accents_and_case() {
        let exams = vec![
            exam("1", "2024-01-01", "Cerveau", "Neurologie"),
            exam("2", "2024-01-01", "Reins", "Néphrologie"),
            exam("3", "2024-01-01", "Oreilles", "ORL"),
            exam("4", "2024-01-01", "Yeux", "Ophtalmologie"),
        ];
        let mut sorted: Vec<&MedicalExam> = exams.iter().collect();
        sort_exams(&mut sorted, SortOrder::Sector);
        let sectors: Vec<&str> = sorted.iter().map(|e| e.medical_sector.as_str()).collect();
        assert_eq!(sectors, ["Néphrologie", "Neurologie", "Ophtalmologie", "ORL"]);
    }

    #[test]
    fn options_parse_from_labels_and_codes() {
        assert_eq!("3 Months".parse::<TimelineWindow>().unwrap(), TimelineWindow::ThreeMonths);
        assert_eq!("3y+".parse::<TimelineWindow>().unwrap(), TimelineWindow::MoreThanThreeYears);
        assert_eq!("all".parse::<TimelineWindow>().unwrap(), TimelineWindow::All);
        assert_eq!("anatomy".parse::<ViewMode>().unwrap(), ViewMode::Anatomy);
        assert_eq!("sector".parse::<SortOrder>().unwrap(), SortOrder::Sector);
        assert!("2 weeks".parse::<TimelineWindow>().is_err());
    }
}
