use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::data::{DataContext, Medal, ResultRecord};
use crate::pipeline::types::LeaderboardRow;

/// Maximum number of athletes on the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 50;

/// Ordering applied to the leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Total medals, descending.
    #[default]
    Total,
    /// Gold, then silver, then bronze, all descending.
    Gold,
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" | "total medals" => Ok(SortMode::Total),
            "gold" | "gold medals" => Ok(SortMode::Gold),
            other => anyhow::bail!("unknown sort mode '{}', expected 'total' or 'gold'", other),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Total => f.write_str("total"),
            SortMode::Gold => f.write_str("gold"),
        }
    }
}

#[derive(Default)]
struct Tally {
    gold: usize,
    silver: usize,
    bronze: usize,
}

/// Ranks athletes by medals won within the filtered view.
///
/// Each athlete's own rows count, so every member of a medal-winning team
/// is credited. Athletes missing from the biography table are dropped.
/// Ties on the sort key keep ascending athlete-id order.
#[tracing::instrument(skip_all, fields(rows = view.len(), sort_mode = %sort_mode))]
pub fn leaderboard(
    ctx: &DataContext,
    view: &[&ResultRecord],
    sort_mode: SortMode,
) -> Vec<LeaderboardRow> {
    let mut tallies: BTreeMap<u64, Tally> = BTreeMap::new();
    for row in view {
        let Some(medal) = row.medal else {
            continue;
        };
        let tally = tallies.entry(row.athlete_id).or_default();
        match medal {
            Medal::Gold => tally.gold += 1,
            Medal::Silver => tally.silver += 1,
            Medal::Bronze => tally.bronze += 1,
        }
    }

    let medalists = tallies.len();
    let mut rows: Vec<LeaderboardRow> = tallies
        .into_iter()
        .filter_map(|(athlete_id, tally)| {
            let bio = ctx.biography(athlete_id)?;
            Some(LeaderboardRow {
                athlete_id,
                name: bio.name.clone(),
                gold: tally.gold,
                silver: tally.silver,
                bronze: tally.bronze,
                total: tally.gold + tally.silver + tally.bronze,
            })
        })
        .collect();

    let dropped = medalists - rows.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Medalists without a biography left off the leaderboard");
    }

    // sort_by_key is stable, so equal keys stay in athlete-id order
    match sort_mode {
        SortMode::Gold => rows.sort_by_key(|r| Reverse((r.gold, r.silver, r.bronze))),
        SortMode::Total => rows.sort_by_key(|r| Reverse(r.total)),
    }

    rows.truncate(LEADERBOARD_LIMIT);
    rows
}
