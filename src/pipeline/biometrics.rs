//! Per-year physical and age trends of participants.
//!
//! The height/weight series and the age series filter rows independently:
//! a row with an unusable birth date still feeds the height/weight means.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::data::{DataContext, ResultRecord};
use crate::pipeline::types::{AgeTrendPoint, Biometrics, BodyTrendPoint};
use crate::pipeline::utility::yearly_means;

/// Extracts the birth year from a raw `born_date` cell.
///
/// Accepts ISO dates (`1969-04-01`) and any value whose leading token is a
/// four-digit year (`1969`, `1969-04`). Anything else is unparseable.
pub fn birth_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }

    let head: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = &raw[head.len()..];
    if head.len() == 4 && (rest.is_empty() || rest.starts_with('-')) {
        head.parse().ok()
    } else {
        None
    }
}

/// Mean height/weight and mean age per event year for the filtered view.
///
/// Rows whose athlete has no biography contribute nothing.
#[tracing::instrument(skip_all, fields(rows = view.len()))]
pub fn biometrics(ctx: &DataContext, view: &[&ResultRecord]) -> Biometrics {
    let mut heights: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    let mut weights: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    let mut ages: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    let mut unparsed_dates = 0usize;

    for row in view {
        let Some(bio) = ctx.biography(row.athlete_id) else {
            continue;
        };

        if let (Some(h), Some(w)) = (bio.height_cm, bio.weight_kg) {
            heights.entry(row.year).or_default().push(h);
            weights.entry(row.year).or_default().push(w);
        }

        if let Some(raw) = bio.born_date.as_deref() {
            match birth_year(raw) {
                Some(born) => ages
                    .entry(row.year)
                    .or_default()
                    .push(f64::from(row.year - born)),
                None => unparsed_dates += 1,
            }
        }
    }

    if unparsed_dates > 0 {
        tracing::debug!(unparsed_dates, "Rows with unparseable birth dates left out of age means");
    }

    let mean_weights: BTreeMap<i32, f64> = yearly_means(&weights).into_iter().collect();
    let body = yearly_means(&heights)
        .into_iter()
        .filter_map(|(year, mean_height)| {
            mean_weights.get(&year).map(|&mean_weight| BodyTrendPoint {
                year,
                mean_height,
                mean_weight,
            })
        })
        .collect();

    let age = yearly_means(&ages)
        .into_iter()
        .map(|(year, mean_age)| AgeTrendPoint { year, mean_age })
        .collect();

    Biometrics { body, age }
}
