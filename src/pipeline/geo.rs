use std::collections::HashMap;

use crate::data::CountryFeature;
use crate::pipeline::types::{ChoroplethFeature, MedalPivotRow};

/// Left-joins medal totals onto country geometry by ISO alpha-3 code.
///
/// Every input feature yields exactly one output feature, in input order.
/// Features without a matching pivot row get a total of 0.
#[tracing::instrument(skip_all, fields(features = geometries.len(), countries = pivot.len()))]
pub fn join_geometry(
    pivot: &[MedalPivotRow],
    geometries: &[CountryFeature],
) -> Vec<ChoroplethFeature> {
    let totals: HashMap<&str, usize> = pivot
        .iter()
        .map(|row| (row.country_code.as_str(), row.total))
        .collect();

    let joined: Vec<ChoroplethFeature> = geometries
        .iter()
        .map(|feature| ChoroplethFeature {
            country_code: feature.iso_a3.clone(),
            name: feature.name.clone(),
            total: totals.get(feature.iso_a3.as_str()).copied().unwrap_or(0),
            geometry: feature.geometry.clone(),
        })
        .collect();

    let matched = joined.iter().filter(|f| f.total > 0).count();
    tracing::debug!(matched, unmatched = joined.len() - matched, "Geometry joined");
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(iso: &str) -> CountryFeature {
        CountryFeature {
            iso_a3: iso.to_string(),
            name: None,
            geometry: json!({"type": "Point", "coordinates": [0.0, 0.0]}),
        }
    }

    fn pivot(code: &str, total: usize) -> MedalPivotRow {
        MedalPivotRow {
            country_code: code.to_string(),
            gold: total,
            silver: 0,
            bronze: 0,
            total,
        }
    }

    #[test]
    fn test_left_join_keeps_every_feature() {
        let geometries = vec![feature("POL"), feature("ATA"), feature("")];
        let pivot = vec![pivot("POL", 12), pivot("URS", 40)];

        let joined = join_geometry(&pivot, &geometries);

        assert_eq!(joined.len(), geometries.len());
        assert_eq!(joined[0].country_code, "POL");
        assert_eq!(joined[0].total, 12);
        assert_eq!(joined[1].total, 0);
        assert_eq!(joined[2].total, 0);
        assert!(joined.iter().all(|f| f.country_code != "URS"));
    }

    #[test]
    fn test_join_with_empty_pivot() {
        let joined = join_geometry(&[], &[feature("POL")]);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].total, 0);
    }
}
