//! CSV and GeoJSON readers for the reference tables.
//!
//! Every reader accepts plain or gzip-compressed (`.gz`) files.

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::data::types::{Biography, CountryFeature, Medal, Region, ResultRecord, Season};

/// Property consulted when the configured ISO property is missing or unusable.
const FALLBACK_ISO_PROPERTY: &str = "ADM0_A3";

#[derive(Debug, Deserialize)]
struct RawRegion {
    #[serde(rename = "NOC")]
    noc: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    year: Option<String>,
    #[serde(rename = "type")]
    season: Option<String>,
    discipline: Option<String>,
    event: Option<String>,
    athlete_id: Option<String>,
    noc: Option<String>,
    medal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBiography {
    athlete_id: Option<String>,
    name: Option<String>,
    born_date: Option<String>,
    born_country: Option<String>,
    height_cm: Option<String>,
    weight_kg: Option<String>,
    lat: Option<String>,
    long: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Value,
}

/// Opens `path`, decompressing on the fly when it ends in `.gz`.
fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!(path = %path.display(), "Reading gzip-compressed input");
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

fn csv_reader(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?))
}

/// Returns the trimmed cell, treating blank and `NA`-style cells as missing.
fn cell(raw: Option<String>) -> Option<String> {
    let value = raw?;
    let trimmed = value.trim();
    match trimmed {
        "" | "NA" | "NaN" | "nan" | "null" => None,
        _ => Some(trimmed.to_string()),
    }
}

fn parse_float(raw: Option<String>) -> Option<f64> {
    cell(raw)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses integral cells written either as `2000` or `2000.0`.
fn parse_whole(raw: Option<String>) -> Option<i64> {
    let value = cell(raw)?;
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    let v = value.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_id(raw: Option<String>) -> Option<u64> {
    parse_whole(raw).and_then(|v| u64::try_from(v).ok())
}

/// Loads the Region Directory (`NOC,region`).
pub fn load_regions(path: &Path) -> Result<Vec<Region>> {
    let mut rdr = csv_reader(path)?;
    let mut regions = Vec::new();

    for result in rdr.deserialize() {
        let raw: RawRegion =
            result.with_context(|| format!("malformed region row in {}", path.display()))?;
        let Some(code) = cell(raw.noc) else {
            continue;
        };
        let name = cell(raw.region).unwrap_or_else(|| code.clone());
        regions.push(Region { code, name });
    }

    debug!(path = %path.display(), rows = regions.len(), "Loaded region directory");
    Ok(regions)
}

/// Loads the Results Table.
///
/// Rows missing an athlete id, year, season or country code are skipped.
pub fn load_results(path: &Path) -> Result<Vec<ResultRecord>> {
    let mut rdr = csv_reader(path)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize() {
        let raw: RawResult =
            result.with_context(|| format!("malformed result row in {}", path.display()))?;

        let athlete_id = parse_id(raw.athlete_id);
        let year = parse_whole(raw.year).and_then(|y| i32::try_from(y).ok());
        let season = cell(raw.season).as_deref().and_then(Season::parse);
        let country_code = cell(raw.noc);

        let (Some(athlete_id), Some(year), Some(season), Some(country_code)) =
            (athlete_id, year, season, country_code)
        else {
            skipped += 1;
            continue;
        };

        rows.push(ResultRecord {
            athlete_id,
            year,
            season,
            discipline: cell(raw.discipline).unwrap_or_default(),
            event: cell(raw.event).unwrap_or_default(),
            country_code,
            medal: cell(raw.medal).as_deref().and_then(Medal::parse),
        });
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped result rows missing required fields");
    }
    debug!(path = %path.display(), rows = rows.len(), "Loaded results table");
    Ok(rows)
}

/// Loads the Biography Table. Rows without an athlete id are skipped.
pub fn load_biographies(path: &Path) -> Result<Vec<Biography>> {
    let mut rdr = csv_reader(path)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize() {
        let raw: RawBiography =
            result.with_context(|| format!("malformed biography row in {}", path.display()))?;

        let Some(athlete_id) = parse_id(raw.athlete_id) else {
            skipped += 1;
            continue;
        };

        rows.push(Biography {
            athlete_id,
            name: cell(raw.name).unwrap_or_default(),
            born_country: cell(raw.born_country),
            born_date: cell(raw.born_date),
            height_cm: parse_float(raw.height_cm),
            weight_kg: parse_float(raw.weight_kg),
            lat: parse_float(raw.lat),
            long: parse_float(raw.long),
        });
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped biography rows without an athlete id");
    }
    debug!(path = %path.display(), rows = rows.len(), "Loaded biography table");
    Ok(rows)
}

/// Loads country boundaries from a GeoJSON `FeatureCollection`.
///
/// The ISO alpha-3 code is read from `iso_property`, falling back to
/// `ADM0_A3` when that property is absent or holds a placeholder such as
/// `-99`. Features with neither are kept with an empty code so they still
/// render.
pub fn load_geometries(path: &Path, iso_property: &str) -> Result<Vec<CountryFeature>> {
    let collection: RawFeatureCollection = serde_json::from_reader(open(path)?)
        .with_context(|| format!("malformed GeoJSON in {}", path.display()))?;

    if collection.features.is_empty() {
        bail!("no features in {}", path.display());
    }

    let features: Vec<CountryFeature> = collection
        .features
        .into_iter()
        .map(|raw| {
            let props = raw.properties.unwrap_or_default();
            let iso_a3 = iso_code(&props, iso_property)
                .or_else(|| iso_code(&props, FALLBACK_ISO_PROPERTY))
                .unwrap_or_default();
            let name = ["NAME", "ADMIN", "name"]
                .iter()
                .find_map(|key| props.get(*key).and_then(Value::as_str))
                .map(str::to_string);

            CountryFeature {
                iso_a3,
                name,
                geometry: raw.geometry,
            }
        })
        .collect();

    debug!(path = %path.display(), features = features.len(), "Loaded country geometry");
    Ok(features)
}

fn iso_code(props: &Map<String, Value>, key: &str) -> Option<String> {
    let code = props.get(key)?.as_str()?.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_parse_whole_accepts_float_years() {
        assert_eq!(parse_whole(Some("2000".into())), Some(2000));
        assert_eq!(parse_whole(Some("1912.0".into())), Some(1912));
        assert_eq!(parse_whole(Some("1912.5".into())), None);
        assert_eq!(parse_whole(Some("".into())), None);
        assert_eq!(parse_whole(None), None);
    }

    #[test]
    fn test_parse_float_rejects_garbage() {
        assert_eq!(parse_float(Some("181.5".into())), Some(181.5));
        assert_eq!(parse_float(Some("NA".into())), None);
        assert_eq!(parse_float(Some("tall".into())), None);
    }

    #[test]
    fn test_load_results_skips_incomplete_rows() {
        let path = temp_path("olympics_stats_test_results.csv");
        fs::write(
            &path,
            "year,type,discipline,event,as,athlete_id,noc,team,place,tied,medal\n\
             2000.0,Summer,Rowing,Men's Eight,A,1,POL,,1,False,Gold\n\
             ,Summer,Rowing,Men's Eight,B,2,POL,,1,False,Gold\n\
             2004,Winter,Luge,Singles,C,3,GER,,4,False,\n",
        )
        .unwrap();

        let rows = load_results(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2000);
        assert_eq!(rows[0].medal, Some(Medal::Gold));
        assert_eq!(rows[1].season, Season::Winter);
        assert_eq!(rows[1].medal, None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_regions_from_gzip() {
        let path = temp_path("olympics_stats_test_regions.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"NOC,region,notes\nPOL,Poland,\nROT,,Refugee Olympic Team\n")
            .unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let regions = load_regions(&path).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Poland");
        assert_eq!(regions[1].name, "ROT");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_geometries_falls_back_on_placeholder_iso() {
        let path = temp_path("olympics_stats_test_world.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"ISO_A3":"POL","NAME":"Poland"},"geometry":null},
                {"type":"Feature","properties":{"ISO_A3":"-99","ADM0_A3":"FRA","NAME":"France"},"geometry":null},
                {"type":"Feature","properties":{"ISO_A3":"-99"},"geometry":null}
            ]}"#,
        )
        .unwrap();

        let features = load_geometries(&path, "ISO_A3").unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].iso_a3, "POL");
        assert_eq!(features[1].iso_a3, "FRA");
        assert_eq!(features[2].iso_a3, "");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_results(Path::new("/nonexistent/olympics/results.csv")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/olympics/results.csv"));
    }
}
