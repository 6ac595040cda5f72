//! Typed records for the reference tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Games season of a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// Parses a season cell, case-insensitively. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "summer" => Some(Season::Summer),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

/// Medal kind awarded for a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Parses a medal cell. Empty or unrecognised cells mean "no medal".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(Medal::Gold),
            "silver" => Some(Medal::Silver),
            "bronze" => Some(Medal::Bronze),
            _ => None,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
        };
        f.write_str(s)
    }
}

/// Region Directory entry: NOC code and the region it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// One athlete entry in one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub athlete_id: u64,
    pub year: i32,
    pub season: Season,
    pub discipline: String,
    pub event: String,
    pub country_code: String,
    pub medal: Option<Medal>,
}

impl ResultRecord {
    /// Youth Olympic Games entries carry a `(YOG)` suffix on the event name.
    pub fn is_youth_event(&self) -> bool {
        self.event.trim_end().ends_with("(YOG)")
    }
}

/// Biographical record for one athlete.
///
/// `born_date` is kept as the raw cell so a bad value only affects the age
/// series downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Biography {
    pub athlete_id: u64,
    pub name: String,
    pub born_country: Option<String>,
    pub born_date: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// A country boundary from the geometry collection.
///
/// The geometry is passed through untouched to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryFeature {
    pub iso_a3: String,
    pub name: Option<String>,
    pub geometry: serde_json::Value,
}
