//! Derived aggregates produced by the pipeline.
//!
//! All of these are recomputed per request and never persisted.

use serde::Serialize;

/// Deduplicated award count for one country in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryYearCount {
    pub country_code: String,
    pub year: i32,
    pub medal_count: usize,
}

/// One point of a line-chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub count: usize,
}

/// Medals-by-year line for a single country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub country_code: String,
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

/// Per-country medal pivot over the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MedalPivotRow {
    pub country_code: String,
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
    pub total: usize,
}

/// A geometry feature annotated with its medal total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethFeature {
    pub country_code: String,
    pub name: Option<String>,
    pub total: usize,
    pub geometry: serde_json::Value,
}

/// Leaderboard entry for one athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub athlete_id: u64,
    pub name: String,
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
    pub total: usize,
}

/// Mean height and weight of participants in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyTrendPoint {
    pub year: i32,
    pub mean_height: f64,
    pub mean_weight: f64,
}

/// Mean participant age in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeTrendPoint {
    pub year: i32,
    pub mean_age: f64,
}

/// Both biometric series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Biometrics {
    pub body: Vec<BodyTrendPoint>,
    pub age: Vec<AgeTrendPoint>,
}

impl Biometrics {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.age.is_empty()
    }
}

/// A birthplace coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub long: f64,
}

/// Birthplace heatmap input with its centroid.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Heatmap {
    pub points: Vec<HeatPoint>,
    pub center: Option<HeatPoint>,
}
