//! Region filter session of the detail view.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::AnatomicalRegion;

/// Owns the selection flags of one detail-view session.
///
/// Bulk operations only touch the regions visible under the current search term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionFilter {
    regions: Vec<AnatomicalRegion>,
    search_term: String,
}

impl RegionFilter {
    pub fn new(regions: Vec<AnatomicalRegion>) -> Self {
        Self {
            regions,
            search_term: String::new(),
        }
    }

    pub fn regions(&self) -> &[AnatomicalRegion] {
        &self.regions
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Regions whose name or sector contains the search term, case-insensitively.
    pub fn visible(&self) -> Vec<&AnatomicalRegion> {
        let term = self.search_term.trim().to_lowercase();
        self.regions
            .iter()
            .filter(|region| {
                term.is_empty()
                    || region.name.to_lowercase().contains(&term)
                    || region.sector.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Flips one region. Returns its new state, `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let region = self.regions.iter_mut().find(|region| region.id == id)?;
        region.selected = !region.selected;
        Some(region.selected)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.regions.iter_mut().find(|region| region.id == id) {
            Some(region) => {
                region.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.set_visible(None, true);
    }

    pub fn deselect_all(&mut self) {
        self.set_visible(None, false);
    }

    pub fn select_sector(&mut self, sector: &str) {
        self.set_visible(Some(sector), true);
    }

    pub fn deselect_sector(&mut self, sector: &str) {
        self.set_visible(Some(sector), false);
    }

    /// Sorted distinct sectors of the whole catalog.
    pub fn sectors(&self) -> Vec<String> {
        distinct_sorted(self.regions.iter())
    }

    /// Sorted distinct sectors among the visible regions.
    pub fn visible_sectors(&self) -> Vec<String> {
        distinct_sorted(self.visible().into_iter())
    }

    pub fn regions_in_sector(&self, sector: &str) -> Vec<&AnatomicalRegion> {
        self.regions
            .iter()
            .filter(|region| region.sector == sector)
            .collect()
    }

    pub fn selected(&self) -> Vec<&AnatomicalRegion> {
        self.regions.iter().filter(|region| region.selected).collect()
    }

    /// Names fed into [`crate::ExamFilter`].
    pub fn selected_names(&self) -> BTreeSet<String> {
        self.selected()
            .into_iter()
            .map(|region| region.name.clone())
            .collect()
    }

    fn set_visible(&mut self, sector: Option<&str>, selected: bool) {
        let ids: Vec<String> = self
            .visible()
            .into_iter()
            .filter(|region| sector.map_or(true, |sector| region.sector == sector))
            .map(|region| region.id.clone())
            .collect();

        for region in self.regions.iter_mut().filter(|region| ids.contains(&region.id)) {
            region.selected = selected;
        }
        tracing::debug!(count = ids.len(), selected, "updated region selection");
    }
}

fn distinct_sorted<'a>(regions: impl Iterator<Item = &'a AnatomicalRegion>) -> Vec<String> {
    regions
        .map(|region| region.sector.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str, name: &str, sector: &str) -> AnatomicalRegion {
        AnatomicalRegion {
            id: id.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            selected: true,
        }
    }

    fn filter() -> RegionFilter {
        RegionFilter::new(vec![
            region("heart", "Cœur", "Cardiologie"),
            region("aorta", "Aorte", "Cardiologie"),
            region("knee", "Genou", "Orthopédie"),
            region("hip", "Hanche", "Orthopédie"),
            region("eyes", "Yeux", "Ophtalmologie"),
        ])
    }

    #[test]
    fn search_matches_name_or_sector() {
        let mut filter = filter();
        filter.set_search_term("ORTHO");
        let ids: Vec<&str> = filter.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["knee", "hip"]);

        filter.set_search_term("aor");
        assert_eq!(filter.visible().len(), 1);

        filter.set_search_term("   ");
        assert_eq!(filter.visible().len(), 5);
    }

    #[test]
    fn bulk_actions_touch_visible_regions_only() {
        let mut filter = filter();
        filter.deselect_all();
        assert!(filter.selected().is_empty());

        filter.set_search_term("genou");
        filter.select_all();
        assert_eq!(filter.selected_names(), BTreeSet::from(["Genou".to_string()]));
    }

    #[test]
    fn sector_actions() {
        let mut filter = filter();
        filter.deselect_sector("Cardiologie");
        let names = filter.selected_names();
        assert!(!names.contains("Cœur"));
        assert!(!names.contains("Aorte"));
        assert!(names.contains("Genou"));

        filter.set_search_term("hanche");
        filter.deselect_sector("Orthopédie");
        assert!(filter.selected_names().contains("Genou"));
        assert!(!filter.selected_names().contains("Hanche"));

        filter.set_search_term("");
        filter.select_sector("Cardiologie");
        assert_eq!(filter.selected().len(), 4);
        assert_eq!(filter.regions_in_sector("Cardiologie").len(), 2);
    }

    #[test]
    fn toggle_flips_known_regions() {
        let mut filter = filter();
        assert_eq!(filter.toggle("eyes"), Some(false));
        assert_eq!(filter.toggle("eyes"), Some(true));
        assert_eq!(filter.toggle("spleen"), None);
        assert!(filter.set_selected("knee", false));
        assert!(!filter.set_selected("spleen", false));
    }

    #[test]
    fn sectors_are_sorted_and_distinct() {
        let mut filter = filter();
        assert_eq!(filter.sectors(), ["Cardiologie", "Ophtalmologie", "Orthopédie"]);
        filter.set_search_term("yeux");
        assert_eq!(filter.visible_sectors(), ["Ophtalmologie"]);
    }
}
