//! Presentation collaborators.
//!
//! The pipeline pushes finished aggregates into a [`Presenter`]; it never
//! reads anything back. [`FilePresenter`] writes JSON, GeoJSON and CSV
//! artifacts, [`LogPresenter`] reports through `tracing`.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::pipeline::types::{ChoroplethFeature, Heatmap, Series};

/// Initial zoom level suggested to map renderers for the heatmap.
pub const HEATMAP_ZOOM_START: u8 = 2;

/// Receives each rendered dashboard element.
///
/// Implementations must accept empty input and present it as "no data".
pub trait Presenter {
    fn render_line_chart(&mut self, title: &str, series: &[Series]) -> Result<()>;
    fn render_choropleth(&mut self, title: &str, features: &[ChoroplethFeature]) -> Result<()>;
    fn render_heatmap(&mut self, title: &str, heatmap: &Heatmap) -> Result<()>;
    fn render_table<T: Serialize>(&mut self, title: &str, rows: &[T]) -> Result<()>;
}

/// Turns a display title into a file stem: `"Medals by Year"` → `medals_by_year`.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() { "untitled".to_string() } else { out }
}

/// Builds a GeoJSON `FeatureCollection` with `total` in every feature's properties.
pub fn choropleth_geojson(features: &[ChoroplethFeature]) -> Value {
    let features: Vec<Value> = features
        .iter()
        .map(|f| {
            json!({
                "type": "Feature",
                "properties": {
                    "country_code": f.country_code,
                    "name": f.name,
                    "total": f.total,
                },
                "geometry": f.geometry,
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

fn line_chart_document(title: &str, series: &[Series]) -> Value {
    json!({
        "title": title,
        "x_label": "Year",
        "y_label": "Medal Count",
        "no_data": series.iter().all(|s| s.points.is_empty()),
        "series": series,
    })
}

fn heatmap_document(title: &str, heatmap: &Heatmap) -> Value {
    let points: Vec<[f64; 2]> = heatmap.points.iter().map(|p| [p.lat, p.long]).collect();
    json!({
        "title": title,
        "no_data": points.is_empty(),
        "center": heatmap.center,
        "zoom_start": HEATMAP_ZOOM_START,
        "points": points,
    })
}

/// Writes each element as a file under an output directory.
pub struct FilePresenter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FilePresenter {
    /// Creates the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_json(&mut self, file_name: &str, value: &Value) -> Result<()> {
        let path = self.dir.join(file_name);
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        debug!(path = %path.display(), "Wrote JSON artifact");
        self.written.push(path);
        Ok(())
    }
}

impl Presenter for FilePresenter {
    fn render_line_chart(&mut self, title: &str, series: &[Series]) -> Result<()> {
        self.write_json(&format!("{}.json", slug(title)), &line_chart_document(title, series))
    }

    fn render_choropleth(&mut self, title: &str, features: &[ChoroplethFeature]) -> Result<()> {
        self.write_json(&format!("{}.geojson", slug(title)), &choropleth_geojson(features))
    }

    fn render_heatmap(&mut self, title: &str, heatmap: &Heatmap) -> Result<()> {
        self.write_json(&format!("{}.json", slug(title)), &heatmap_document(title, heatmap))
    }

    fn render_table<T: Serialize>(&mut self, title: &str, rows: &[T]) -> Result<()> {
        let path = self.dir.join(format!("{}.csv", slug(title)));
        write_table(&path, rows)?;
        if rows.is_empty() {
            info!(title, "No data available for the selected countries");
        }
        self.written.push(path);
        Ok(())
    }
}

/// Writes `rows` as a CSV file with a header row, replacing any existing file.
///
/// An empty slice produces an empty file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV table");
    Ok(())
}

/// Reports each element through `tracing` instead of writing files.
#[derive(Debug, Default)]
pub struct LogPresenter {
    /// Maximum table rows echoed per table.
    pub max_rows: Option<usize>,
}

impl Presenter for LogPresenter {
    fn render_line_chart(&mut self, title: &str, series: &[Series]) -> Result<()> {
        if series.iter().all(|s| s.points.is_empty()) {
            info!(title, "No data available for the selected countries");
            return Ok(());
        }
        for s in series {
            let total: usize = s.points.iter().map(|p| p.count).sum();
            info!(
                title,
                country = %s.country_code,
                label = %s.label,
                years = s.points.len(),
                total,
                "Series"
            );
        }
        Ok(())
    }

    fn render_choropleth(&mut self, title: &str, features: &[ChoroplethFeature]) -> Result<()> {
        let with_medals = features.iter().filter(|f| f.total > 0).count();
        let top = features.iter().max_by_key(|f| f.total);
        info!(
            title,
            features = features.len(),
            with_medals,
            top_country = top.map(|f| f.country_code.as_str()).unwrap_or(""),
            top_total = top.map(|f| f.total).unwrap_or(0),
            "Choropleth"
        );
        Ok(())
    }

    fn render_heatmap(&mut self, title: &str, heatmap: &Heatmap) -> Result<()> {
        match heatmap.center {
            Some(center) => info!(
                title,
                points = heatmap.points.len(),
                center_lat = center.lat,
                center_long = center.long,
                "Heatmap"
            ),
            None => info!(title, "No data available for the selected countries"),
        }
        Ok(())
    }

    fn render_table<T: Serialize>(&mut self, title: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            info!(title, "No data available for the selected countries");
            return Ok(());
        }
        info!(title, rows = rows.len(), "Table");
        let limit = self.max_rows.unwrap_or(rows.len());
        for (rank, row) in rows.iter().take(limit).enumerate() {
            info!(rank = rank + 1, "{}", serde_json::to_string(row)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{HeatPoint, SeriesPoint};
    use std::env;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        gold: usize,
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Medals by Year"), "medals_by_year");
        assert_eq!(slug("Top 50 Athletes by Medal Count"), "top_50_athletes_by_medal_count");
        assert_eq!(slug("  Age (mean) "), "age_mean");
        assert_eq!(slug("!!"), "untitled");
    }

    #[test]
    fn test_choropleth_geojson_shape() {
        let doc = choropleth_geojson(&[ChoroplethFeature {
            country_code: "POL".to_string(),
            name: Some("Poland".to_string()),
            total: 3,
            geometry: Value::Null,
        }]);
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["features"][0]["properties"]["total"], 3);
        assert_eq!(doc["features"][0]["properties"]["country_code"], "POL");
    }

    #[test]
    fn test_file_presenter_writes_artifacts() {
        let dir = temp_dir("olympics_stats_test_presenter");
        let _ = fs::remove_dir_all(&dir);

        let mut presenter = FilePresenter::new(&dir).unwrap();
        presenter
            .render_line_chart(
                "Medals by Year",
                &[Series {
                    country_code: "POL".to_string(),
                    label: "Poland".to_string(),
                    points: vec![SeriesPoint { year: 2000, count: 1 }],
                }],
            )
            .unwrap();
        presenter
            .render_heatmap(
                "Heatmap of Athletes",
                &Heatmap {
                    points: vec![HeatPoint { lat: 52.0, long: 21.0 }],
                    center: Some(HeatPoint { lat: 52.0, long: 21.0 }),
                },
            )
            .unwrap();
        presenter
            .render_table("Leaderboard", &[Row { name: "Anna", gold: 2 }])
            .unwrap();

        assert_eq!(presenter.written().len(), 3);
        let chart: Value =
            serde_json::from_str(&fs::read_to_string(dir.join("medals_by_year.json")).unwrap())
                .unwrap();
        assert_eq!(chart["no_data"], false);
        assert_eq!(chart["series"][0]["points"][0]["year"], 2000);

        let table = fs::read_to_string(dir.join("leaderboard.csv")).unwrap();
        assert_eq!(table.lines().collect::<Vec<_>>(), vec!["name,gold", "Anna,2"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_inputs_render_without_error() {
        let dir = temp_dir("olympics_stats_test_presenter_empty");
        let _ = fs::remove_dir_all(&dir);

        let mut files = FilePresenter::new(&dir).unwrap();
        files.render_line_chart("Medals by Year", &[]).unwrap();
        files.render_heatmap("Heatmap of Athletes", &Heatmap::default()).unwrap();
        files.render_table::<Row>("Leaderboard", &[]).unwrap();

        let heat: Value =
            serde_json::from_str(&fs::read_to_string(dir.join("heatmap_of_athletes.json")).unwrap())
                .unwrap();
        assert_eq!(heat["no_data"], true);
        assert!(fs::read_to_string(dir.join("leaderboard.csv")).unwrap().is_empty());

        let mut logs = LogPresenter::default();
        logs.render_line_chart("Medals by Year", &[]).unwrap();
        logs.render_choropleth("World", &[]).unwrap();
        logs.render_heatmap("Heatmap of Athletes", &Heatmap::default()).unwrap();
        logs.render_table::<Row>("Leaderboard", &[]).unwrap();

        fs::remove_dir_all(&dir).unwrap();
    }
}
