//! Country-level medal tallies.
//!
//! Team events produce one result row per team member, all carrying the same
//! medal. For country counts these collapse to a single award keyed on
//! `(year, season, discipline, country, event, medal)`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::data::{DataContext, Medal, RegionDirectory, ResultRecord, Season};
use crate::pipeline::types::{CountryYearCount, MedalPivotRow, Series, SeriesPoint};

#[derive(Debug, PartialEq, Eq, Hash)]
struct AwardKey<'a> {
    year: i32,
    season: Season,
    discipline: &'a str,
    country_code: &'a str,
    event: &'a str,
    medal: Option<Medal>,
}

impl<'a> AwardKey<'a> {
    fn of(row: &'a ResultRecord) -> Self {
        Self {
            year: row.year,
            season: row.season,
            discipline: &row.discipline,
            country_code: &row.country_code,
            event: &row.event,
            medal: row.medal,
        }
    }
}

/// Keeps the first row of every distinct award key, preserving input order.
pub fn dedup_awards<'a>(rows: &[&'a ResultRecord]) -> Vec<&'a ResultRecord> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .copied()
        .filter(|row| seen.insert(AwardKey::of(*row)))
        .collect()
}

fn medal_rows<'a>(rows: impl IntoIterator<Item = &'a ResultRecord>) -> Vec<&'a ResultRecord> {
    rows.into_iter().filter(|r| r.medal.is_some()).collect()
}

/// Counts deduplicated awards per `(country, year)`, ordered by country then year.
#[tracing::instrument(skip_all, fields(rows = view.len()))]
pub fn medals_by_country_year(view: &[&ResultRecord]) -> Vec<CountryYearCount> {
    let awards = dedup_awards(&medal_rows(view.iter().copied()));

    let mut counts: BTreeMap<(&str, i32), usize> = BTreeMap::new();
    for award in awards {
        *counts.entry((award.country_code.as_str(), award.year)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((country_code, year), medal_count)| CountryYearCount {
            country_code: country_code.to_string(),
            year,
            medal_count,
        })
        .collect()
}

/// Gold/silver/bronze/total per country over the whole dataset.
///
/// Ignores any country or season selection so the world map always shows
/// every country and both seasons. Youth events are still excluded.
#[tracing::instrument(skip_all)]
pub fn medal_pivot_global(ctx: &DataContext) -> Vec<MedalPivotRow> {
    let rows = medal_rows(ctx.results().iter().filter(|r| !r.is_youth_event()));
    let awards = dedup_awards(&rows);

    let mut pivot: BTreeMap<&str, MedalPivotRow> = BTreeMap::new();
    for award in awards {
        let entry = pivot
            .entry(award.country_code.as_str())
            .or_insert_with(|| MedalPivotRow {
                country_code: award.country_code.clone(),
                ..Default::default()
            });
        match award.medal {
            Some(Medal::Gold) => entry.gold += 1,
            Some(Medal::Silver) => entry.silver += 1,
            Some(Medal::Bronze) => entry.bronze += 1,
            None => {}
        }
    }

    pivot
        .into_values()
        .map(|mut row| {
            row.total = row.gold + row.silver + row.bronze;
            row
        })
        .collect()
}

/// Shapes counts into one line per selected country, labelled by region name.
///
/// Countries with no medals still get an (empty) series.
pub fn medal_series(
    counts: &[CountryYearCount],
    countries: &BTreeSet<String>,
    regions: &RegionDirectory,
) -> Vec<Series> {
    countries
        .iter()
        .map(|code| {
            let mut points: Vec<SeriesPoint> = counts
                .iter()
                .filter(|c| &c.country_code == code)
                .map(|c| SeriesPoint {
                    year: c.year,
                    count: c.medal_count,
                })
                .collect();
            points.sort_by_key(|p| p.year);

            Series {
                country_code: code.clone(),
                label: regions.label(code).to_string(),
                points,
            }
        })
        .collect()
}
