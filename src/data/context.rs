//! The immutable, load-once context every pipeline call borrows.

use anyhow::Result;
use std::collections::HashMap;
use tracing::info;

use crate::config::DataPaths;
use crate::data::loader::{load_biographies, load_geometries, load_regions, load_results};
use crate::data::types::{Biography, CountryFeature, Region, ResultRecord};

/// NOC code to region-name lookup.
#[derive(Debug, Clone, Default)]
pub struct RegionDirectory {
    entries: Vec<Region>,
    by_code: HashMap<String, usize>,
}

impl RegionDirectory {
    /// Builds the directory. On duplicate codes the first entry wins.
    pub fn new(entries: Vec<Region>) -> Self {
        let mut by_code = HashMap::with_capacity(entries.len());
        for (idx, region) in entries.iter().enumerate() {
            by_code.entry(region.code.clone()).or_insert(idx);
        }
        Self { entries, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.by_code.get(code).map(|&idx| &self.entries[idx])
    }

    /// Display label for a code: the region name, or the code itself.
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|r| r.name.as_str()).unwrap_or(code)
    }

    /// Entries sorted by region name, then code.
    pub fn ordered(&self) -> Vec<&Region> {
        let mut regions: Vec<&Region> = self.entries.iter().collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        regions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All reference tables, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    regions: RegionDirectory,
    results: Vec<ResultRecord>,
    bios: Vec<Biography>,
    bio_index: HashMap<u64, usize>,
    geometries: Vec<CountryFeature>,
}

impl DataContext {
    /// Loads every table from disk. Any failure aborts the whole load.
    #[tracing::instrument(skip_all, fields(results = %paths.results.display()))]
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let regions = load_regions(&paths.regions)?;
        let results = load_results(&paths.results)?;
        let bios = load_biographies(&paths.bios)?;
        let geometries = load_geometries(&paths.geometry, &paths.iso_property)?;

        let ctx = Self::from_parts(regions, results, bios, geometries);
        info!(
            regions = ctx.regions.len(),
            results = ctx.results.len(),
            biographies = ctx.bios.len(),
            features = ctx.geometries.len(),
            "Reference data loaded"
        );
        Ok(ctx)
    }

    /// Builds a context from in-memory tables. On duplicate athlete ids the
    /// first biography wins.
    pub fn from_parts(
        regions: Vec<Region>,
        results: Vec<ResultRecord>,
        bios: Vec<Biography>,
        geometries: Vec<CountryFeature>,
    ) -> Self {
        let mut bio_index = HashMap::with_capacity(bios.len());
        for (idx, bio) in bios.iter().enumerate() {
            bio_index.entry(bio.athlete_id).or_insert(idx);
        }

        Self {
            regions: RegionDirectory::new(regions),
            results,
            bios,
            bio_index,
            geometries,
        }
    }

    pub fn regions(&self) -> &RegionDirectory {
        &self.regions
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn biographies(&self) -> &[Biography] {
        &self.bios
    }

    pub fn biography(&self, athlete_id: u64) -> Option<&Biography> {
        self.bio_index.get(&athlete_id).map(|&idx| &self.bios[idx])
    }

    pub fn geometries(&self) -> &[CountryFeature] {
        &self.geometries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str, name: &str) -> Region {
        Region {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_ordered_by_region_name() {
        let dir = RegionDirectory::new(vec![
            region("POL", "Poland"),
            region("AFG", "Afghanistan"),
            region("GER", "Germany"),
            region("FRG", "Germany"),
        ]);

        let codes: Vec<&str> = dir.ordered().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AFG", "FRG", "GER", "POL"]);
    }

    #[test]
    fn test_label_falls_back_to_code() {
        let dir = RegionDirectory::new(vec![region("POL", "Poland")]);
        assert_eq!(dir.label("POL"), "Poland");
        assert_eq!(dir.label("XYZ"), "XYZ");
    }

    #[test]
    fn test_biography_lookup_first_wins() {
        let bio = |name: &str| Biography {
            athlete_id: 7,
            name: name.to_string(),
            born_country: None,
            born_date: None,
            height_cm: None,
            weight_kg: None,
            lat: None,
            long: None,
        };
        let ctx = DataContext::from_parts(vec![], vec![], vec![bio("first"), bio("second")], vec![]);

        assert_eq!(ctx.biography(7).map(|b| b.name.as_str()), Some("first"));
        assert!(ctx.biography(8).is_none());
    }
}
