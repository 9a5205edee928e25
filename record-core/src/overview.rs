//! Body-diagram markers and the sector-by-year grid.

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::classify::sector_color;
use crate::{AnatomicalRegion, MedicalExam};

/// A selected region that has exams, as marked on the body diagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionSummary {
    pub name: String,
    pub exam_count: usize,
    pub color: String,
}

/// Regions present in `exams` that are also selected, in order of first appearance.
pub fn region_summaries(
    exams: &[MedicalExam],
    selected: &[&AnatomicalRegion],
) -> Vec<RegionSummary> {
    let mut seen = BTreeSet::new();
    exams
        .iter()
        .filter_map(|exam| {
            let region = selected
                .iter()
                .find(|region| region.name == exam.anatomical_region)?;
            seen.insert(region.name.as_str()).then(|| RegionSummary {
                name: region.name.clone(),
                exam_count: exams_for_region(exams, selected, &region.name).len(),
                color: sector_color(&region.sector).to_string(),
            })
        })
        .collect()
}

/// Exams of one body-diagram region; a region that is not selected shows nothing.
pub fn exams_for_region<'a>(
    exams: &'a [MedicalExam],
    selected: &[&AnatomicalRegion],
    region: &str,
) -> Vec<&'a MedicalExam> {
    if !selected.iter().any(|candidate| candidate.name == region) {
        return Vec::new();
    }
    exams
        .iter()
        .filter(|exam| exam.anatomical_region == region)
        .collect()
}

/// Exams laid out by medical sector (rows) and year (columns).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorGrid {
    pub years: Vec<i32>,
    pub sectors: Vec<String>,
    /// `cells[row][column]` holds the exams of `sectors[row]` in `years[column]`.
    pub cells: Vec<Vec<Vec<MedicalExam>>>,
}

impl SectorGrid {
    pub fn build(exams: &[&MedicalExam]) -> Self {
        let years: Vec<i32> = exams
            .iter()
            .map(|exam| exam.date.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sectors: Vec<String> = exams
            .iter()
            .map(|exam| exam.medical_sector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = sectors
            .iter()
            .map(|sector| {
                years
                    .iter()
                    .map(|year| {
                        exams
                            .iter()
                            .filter(|exam| {
                                &exam.medical_sector == sector && exam.date.year() == *year
                            })
                            .map(|exam| (*exam).clone())
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Self { years, sectors, cells }
    }

    pub fn exams_for(&self, sector: &str, year: i32) -> &[MedicalExam] {
        let row = self.sectors.iter().position(|s| s == sector);
        let column = self.years.iter().position(|y| *y == year);
        match (row, column) {
            (Some(row), Some(column)) => &self.cells[row][column],
            _ => &[],
        }
    }
}
