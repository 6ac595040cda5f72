//! Locations of the reference data files.
//!
//! Resolution order, later wins: built-in defaults, environment variables
//! (optionally from a `.env` file), a JSON config file, CLI flags.
//!
//! ```json
//! {
//!   "data_dir": "clean-data",
//!   "geometry": "countries_map/countries.geojson",
//!   "iso_property": "ISO_A3"
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "clean-data";
pub const DEFAULT_GEOMETRY_PATH: &str = "countries_map/countries.geojson";
pub const DEFAULT_ISO_PROPERTY: &str = "ISO_A3";

const REGIONS_FILE: &str = "noc_regions.csv";
const RESULTS_FILE: &str = "results.csv";
const BIOS_FILE: &str = "bios_locs.csv";

/// Paths to the four reference tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub regions: PathBuf,
    pub results: PathBuf,
    pub bios: PathBuf,
    pub geometry: PathBuf,
    /// GeoJSON property holding the ISO alpha-3 code.
    pub iso_property: String,
}

/// Optional overrides, as read from a JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataOverrides {
    pub data_dir: Option<PathBuf>,
    pub regions: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub bios: Option<PathBuf>,
    pub geometry: Option<PathBuf>,
    pub iso_property: Option<String>,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

impl DataPaths {
    /// Standard file names under `dir`, with the default geometry location.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            regions: dir.join(REGIONS_FILE),
            results: dir.join(RESULTS_FILE),
            bios: dir.join(BIOS_FILE),
            geometry: PathBuf::from(DEFAULT_GEOMETRY_PATH),
            iso_property: DEFAULT_ISO_PROPERTY.to_string(),
        }
    }

    /// Defaults overridden by `OLYMPICS_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(Self::env_overrides(|key| std::env::var(key).ok()))
    }

    fn env_overrides(lookup: impl Fn(&str) -> Option<String>) -> DataOverrides {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        DataOverrides {
            data_dir: path("OLYMPICS_DATA_DIR"),
            regions: path("OLYMPICS_REGIONS_PATH"),
            results: path("OLYMPICS_RESULTS_PATH"),
            bios: path("OLYMPICS_BIOS_PATH"),
            geometry: path("OLYMPICS_GEOMETRY_PATH"),
            iso_property: lookup("OLYMPICS_ISO_PROPERTY").filter(|v| !v.is_empty()),
        }
    }

    /// Applies overrides. A new `data_dir` re-roots the three CSV tables
    /// before the per-file overrides are applied.
    pub fn with_overrides(mut self, overrides: DataOverrides) -> Self {
        if let Some(dir) = overrides.data_dir {
            self.regions = dir.join(REGIONS_FILE);
            self.results = dir.join(RESULTS_FILE);
            self.bios = dir.join(BIOS_FILE);
        }
        if let Some(p) = overrides.regions {
            self.regions = p;
        }
        if let Some(p) = overrides.results {
            self.results = p;
        }
        if let Some(p) = overrides.bios {
            self.bios = p;
        }
        if let Some(p) = overrides.geometry {
            self.geometry = p;
        }
        if let Some(prop) = overrides.iso_property {
            self.iso_property = prop;
        }
        self
    }
}

impl DataOverrides {
    /// Loads overrides from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let overrides = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_dataset_layout() {
        let paths = DataPaths::default();
        assert_eq!(paths.results, PathBuf::from("clean-data/results.csv"));
        assert_eq!(paths.bios, PathBuf::from("clean-data/bios_locs.csv"));
        assert_eq!(paths.iso_property, "ISO_A3");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OLYMPICS_DATA_DIR", "/srv/olympics"),
            ("OLYMPICS_BIOS_PATH", "/tmp/bios.csv.gz"),
            ("OLYMPICS_ISO_PROPERTY", ""),
        ]
        .into_iter()
        .collect();

        let overrides = DataPaths::env_overrides(|k| env.get(k).map(|v| v.to_string()));
        let paths = DataPaths::default().with_overrides(overrides);

        assert_eq!(paths.regions, PathBuf::from("/srv/olympics/noc_regions.csv"));
        assert_eq!(paths.results, PathBuf::from("/srv/olympics/results.csv"));
        assert_eq!(paths.bios, PathBuf::from("/tmp/bios.csv.gz"));
        assert_eq!(paths.iso_property, "ISO_A3");
    }

    #[test]
    fn test_load_overrides_file() {
        let path = std::env::temp_dir().join("olympics_stats_test_config.json");
        std::fs::write(&path, r#"{"geometry": "world.geojson", "iso_property": "ADM0_A3"}"#)
            .unwrap();

        let paths = DataPaths::default().with_overrides(DataOverrides::load(&path).unwrap());
        assert_eq!(paths.geometry, PathBuf::from("world.geojson"));
        assert_eq!(paths.iso_property, "ADM0_A3");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let path = std::env::temp_dir().join("olympics_stats_test_bad_config.json");
        std::fs::write(&path, r#"{"geomtery": "typo.geojson"}"#).unwrap();

        assert!(DataOverrides::load(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
