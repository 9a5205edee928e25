//! In-app navigation targets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    Patients,
    /// The id is opaque; an unknown one still resolves here and renders "not found".
    PatientDetail(String),
}

impl Route {
    /// Resolves a path. Menu aliases and anything unmatched land on the home view.
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["cas-radio"] | ["worklists"] | ["templates"] => Route::Home,
            ["patients"] => Route::Patients,
            ["patient", id] => Route::PatientDetail((*id).to_string()),
            _ => {
                tracing::warn!(path, "unmatched route, redirecting home");
                Route::Home
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::PatientDetail(id) => format!("/patient/{id}"),
        }
    }
}
