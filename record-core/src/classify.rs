//! Roll-up of medical sectors and anatomical regions into chart rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RecordError;

/// Department row of the "by department" chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    #[serde(rename = "Radio")]
    Radio,
    #[serde(rename = "Nuc. Med")]
    NuclearMedicine,
    #[serde(rename = "Pathology")]
    Pathology,
    #[serde(rename = "OPH")]
    Ophthalmology,
    #[serde(rename = "Others")]
    Others,
}

impl Department {
    /// Chart rows, top to bottom.
    pub const ALL: [Department; 5] = [
        Department::Radio,
        Department::NuclearMedicine,
        Department::Pathology,
        Department::Ophthalmology,
        Department::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Department::Radio => "Radio",
            Department::NuclearMedicine => "Nuc. Med",
            Department::Pathology => "Pathology",
            Department::Ophthalmology => "OPH",
            Department::Others => "Others",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Department::Radio => "#ff6b35",
            Department::NuclearMedicine => "#f7931e",
            Department::Pathology => "#ffd23f",
            Department::Ophthalmology => "#06ffa5",
            Department::Others => "#4ecdc4",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|dept| *dept == self)
            .unwrap_or(Self::ALL.len() - 1)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dept| dept.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordError::UnknownOption(format!("department {s:?}")))
    }
}

/// Anatomy row of the "by anatomy" chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnatomyGroup {
    #[serde(rename = "Head & Neck")]
    HeadAndNeck,
    #[serde(rename = "Torso")]
    Torso,
    #[serde(rename = "Upper Body")]
    UpperBody,
    #[serde(rename = "Lower Body")]
    LowerBody,
    #[serde(rename = "Hand")]
    Hand,
    #[serde(rename = "Foot")]
    Foot,
    #[serde(rename = "Back")]
    Back,
    #[serde(rename = "Chest")]
    Chest,
    #[serde(rename = "Abdomen")]
    Abdomen,
    #[serde(rename = "Others")]
    Others,
}

impl AnatomyGroup {
    pub const ALL: [AnatomyGroup; 10] = [
        AnatomyGroup::HeadAndNeck,
        AnatomyGroup::Torso,
        AnatomyGroup::UpperBody,
        AnatomyGroup::LowerBody,
        AnatomyGroup::Hand,
        AnatomyGroup::Foot,
        AnatomyGroup::Back,
        AnatomyGroup::Chest,
        AnatomyGroup::Abdomen,
        AnatomyGroup::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnatomyGroup::HeadAndNeck => "Head & Neck",
            AnatomyGroup::Torso => "Torso",
            AnatomyGroup::UpperBody => "Upper Body",
            AnatomyGroup::LowerBody => "Lower Body",
            AnatomyGroup::Hand => "Hand",
            AnatomyGroup::Foot => "Foot",
            AnatomyGroup::Back => "Back",
            AnatomyGroup::Chest => "Chest",
            AnatomyGroup::Abdomen => "Abdomen",
            AnatomyGroup::Others => "Others",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AnatomyGroup::HeadAndNeck => "#ff6b35",
            AnatomyGroup::Torso => "#f7931e",
            AnatomyGroup::UpperBody => "#ffd23f",
            AnatomyGroup::LowerBody => "#06ffa5",
            AnatomyGroup::Hand => "#4ecdc4",
            AnatomyGroup::Foot => "#45b7d1",
            AnatomyGroup::Back => "#96ceb4",
            AnatomyGroup::Chest => "#ffeaa7",
            AnatomyGroup::Abdomen => "#dda0dd",
            AnatomyGroup::Others => "#98d8c8",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|group| *group == self)
            .unwrap_or(Self::ALL.len() - 1)
    }
}

impl fmt::Display for AnatomyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnatomyGroup {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordError::UnknownOption(format!("anatomy group {s:?}")))
    }
}

/// Department a medical sector rolls up into. Unknown sectors land in `Others`.
pub fn sector_to_department(sector: &str) -> Department {
    match sector {
        "Pneumologie" | "Cardiologie" | "Neurologie" | "Orthopédie" | "Gastroentérologie"
        | "Néphrologie" => Department::Radio,
        "Ophtalmologie" => Department::Ophthalmology,
        _ => Department::Others,
    }
}

/// Anatomy group an anatomical region rolls up into. Unknown regions land in `Others`.
pub fn region_to_anatomy_group(region: &str) -> AnatomyGroup {
    match region {
        "Tête" | "Cou" | "Cerveau" | "Yeux" | "Oreilles" => AnatomyGroup::HeadAndNeck,
        "Thorax" | "Poumons" | "Cœur" => AnatomyGroup::Chest,
        "Abdomen" | "Foie" | "Reins" => AnatomyGroup::Abdomen,
        "Bras" | "Épaule" | "Coude" => AnatomyGroup::UpperBody,
        "Poignet" | "Mains" => AnatomyGroup::Hand,
        "Jambes" | "Hanche" | "Genou" => AnatomyGroup::LowerBody,
        "Cheville" | "Pieds" => AnatomyGroup::Foot,
        "Colonne vertébrale" => AnatomyGroup::Back,
        _ => AnatomyGroup::Others,
    }
}

/// Colour of a medical sector on the body diagram.
pub fn sector_color(sector: &str) -> &'static str {
    match sector {
        "Neurologie" => "#9c27b0",
        "Cardiologie" => "#f44336",
        "Pneumologie" => "#2196f3",
        "Gastroentérologie" => "#ff9800",
        "Néphrologie" => "#4caf50",
        "Orthopédie" => "#795548",
        "Ophtalmologie" => "#00bcd4",
        "ORL" => "#ffeb3b",
        "Gynécologie" => "#e91e63",
        _ => "#607d8b",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_map_to_departments() {
        assert_eq!(sector_to_department("Cardiologie"), Department::Radio);
        assert_eq!(sector_to_department("Ophtalmologie"), Department::Ophthalmology);
        assert_eq!(sector_to_department("ORL"), Department::Others);
    }

    #[test]
    fn unmapped_inputs_fall_back_to_others() {
        for input in ["", "Dermatologie", "cardiologie", "Genou gauche"] {
            assert_eq!(sector_to_department(input), Department::Others);
            assert_eq!(region_to_anatomy_group(input), AnatomyGroup::Others);
        }
    }

    #[test]
    fn regions_map_to_anatomy_groups() {
        assert_eq!(region_to_anatomy_group("Cerveau"), AnatomyGroup::HeadAndNeck);
        assert_eq!(region_to_anatomy_group("Cœur"), AnatomyGroup::Chest);
        assert_eq!(region_to_anatomy_group("Poignet"), AnatomyGroup::Hand);
        assert_eq!(region_to_anatomy_group("Colonne vertébrale"), AnatomyGroup::Back);
        // Catalogued but not grouped.
        assert_eq!(region_to_anatomy_group("Fémur"), AnatomyGroup::Others);
    }

    #[test]
    fn labels_parse_back() {
        for dept in Department::ALL {
            assert_eq!(dept.label().parse::<Department>().unwrap(), dept);
        }
        assert_eq!("head & neck".parse::<AnatomyGroup>().unwrap(), AnatomyGroup::HeadAndNeck);
        assert!("Cardio".parse::<Department>().is_err());
    }

    #[test]
    fn row_index_follows_declaration_order() {
        assert_eq!(Department::Radio.index(), 0);
        assert_eq!(Department::Others.index(), 4);
        assert_eq!(AnatomyGroup::Abdomen.index(), 8);
    }
}
