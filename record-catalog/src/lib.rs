//! In-memory patient catalog backing the viewer.
//!
//! Every read hands out owned copies, so callers are free to mutate what they
//! receive (region flags in particular) without touching the catalog.

use record_core::{AnatomicalRegion, Patient, RecordError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod fixtures;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientCatalog {
    patients: Vec<Patient>,
    #[serde(default = "fixtures::regions")]
    regions: Vec<AnatomicalRegion>,
}

impl Default for PatientCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatientCatalog {
    /// The bundled fictional catalog.
    pub fn builtin() -> Self {
        Self {
            patients: fixtures::patients(),
            regions: fixtures::regions(),
        }
    }

    pub fn new(patients: Vec<Patient>, regions: Vec<AnatomicalRegion>) -> Self {
        Self { patients, regions }
    }

    /// Loads a catalog from a JSON string. A missing `regions` key falls back to the
    /// bundled regions.
    pub fn from_json_str(input: &str) -> Result<Self, RecordError> {
        let value: Value =
            serde_json::from_str(input).map_err(|err| RecordError::Parse(err.to_string()))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, RecordError> {
        if value.get("patients").and_then(Value::as_array).is_none() {
            return Err(RecordError::Parse(
                "catalog must contain a `patients` array".to_string(),
            ));
        }
        let catalog = Self::deserialize(value).map_err(|err| RecordError::Parse(err.to_string()))?;
        tracing::debug!(
            patients = catalog.patients.len(),
            regions = catalog.regions.len(),
            "loaded patient catalog"
        );
        Ok(catalog)
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn all_patients(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    /// `None` covers both unknown and malformed ids.
    pub fn patient_by_id(&self, id: &str) -> Option<Patient> {
        self.patients.iter().find(|patient| patient.id == id).cloned()
    }

    /// Every patient for a blank query, otherwise those whose first name, last name
    /// or id contains the query, ignoring case.
    pub fn search_patients(&self, query: &str) -> Vec<Patient> {
        if query.trim().is_empty() {
            return self.all_patients();
        }
        let needle = query.to_lowercase();
        let found: Vec<Patient> = self
            .patients
            .iter()
            .filter(|patient| {
                patient.first_name.to_lowercase().contains(&needle)
                    || patient.last_name.to_lowercase().contains(&needle)
                    || patient.id.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        tracing::debug!(query, hits = found.len(), "searched patients");
        found
    }

    /// Fresh copy of the region catalog with every region selected.
    pub fn anatomical_regions(&self) -> Vec<AnatomicalRegion> {
        self.regions
            .iter()
            .cloned()
            .map(|region| AnatomicalRegion {
                selected: true,
                ..region
            })
            .collect()
    }
}
