//! Patient, exam and region records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Administrative gender as recorded on the patient file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Result of an exam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Positive,
    Negative,
    Pending,
}

impl Diagnosis {
    pub fn as_str(self) -> &'static str {
        match self {
            Diagnosis::Positive => "positive",
            Diagnosis::Negative => "negative",
            Diagnosis::Pending => "pending",
        }
    }

    /// Label shown on exam cards.
    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Positive => "Positif",
            Diagnosis::Negative => "Négatif",
            Diagnosis::Pending => "En attente",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Faible",
            Severity::High => "Importante",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// One exam in a patient's history. Exams are never edited once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicalExam {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub anatomical_region: String,
    pub medical_sector: String,
    pub diagnosis: Diagnosis,
    pub severity: Severity,
    pub summary: String,
    pub full_report: String,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MedicalExam {
    /// First `max_chars` characters of the full report, with an ellipsis when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.full_report.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.full_report[..cut]),
            None => self.full_report.clone(),
        }
    }

    /// Short hover text, `title (sector)`.
    pub fn tooltip(&self) -> String {
        format!("{} ({})", self.title, self.medical_sector)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub blood_type: String,
    /// Height in centimetres.
    pub height: u32,
    /// Weight in kilograms.
    pub weight: f64,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub current_treatments: Vec<String>,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medical_history: Vec<MedicalExam>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`. Always derived, never stored.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let mut age = today.year() - self.birth_date.year();
        if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Body mass index, or `None` when no height is recorded.
    pub fn bmi(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        let meters = f64::from(self.height) / 100.0;
        Some(self.weight / (meters * meters))
    }

    /// Most recent exam. On equal dates the first one in the history wins.
    pub fn last_exam(&self) -> Option<&MedicalExam> {
        self.medical_history
            .iter()
            .fold(None, |latest: Option<&MedicalExam>, exam| match latest {
                Some(current) if exam.date <= current.date => Some(current),
                _ => Some(exam),
            })
    }
}

/// A filter entry of the anatomical catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnatomicalRegion {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub selected: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn exam(id: &str, date: &str, region: &str, sector: &str) -> MedicalExam {
        MedicalExam {
            id: id.to_string(),
            title: format!("Exam {id}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date"),
            anatomical_region: region.to_string(),
            medical_sector: sector.to_string(),
            diagnosis: Diagnosis::Negative,
            severity: Severity::Low,
            summary: String::new(),
            full_report: String::new(),
            doctor: None,
            tags: Vec::new(),
        }
    }

    pub fn patient(exams: Vec<MedicalExam>) -> Patient {
        Patient {
            id: "t1".to_string(),
            first_name: "Jeanne".to_string(),
            last_name: "Test".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 6, 15).expect("valid test date"),
            blood_type: "B+".to_string(),
            height: 170,
            weight: 63.0,
            allergies: Vec::new(),
            current_treatments: Vec::new(),
            emergency_contact: EmergencyContact {
                name: "Paul Test".to_string(),
                relationship: "Frère".to_string(),
                phone: "+33 6 00 00 00 00".to_string(),
            },
            medical_history: exams,
        }
    }
}
