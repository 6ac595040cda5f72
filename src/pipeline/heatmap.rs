use std::collections::BTreeSet;

use crate::data::{Biography, DataContext};
use crate::pipeline::types::{HeatPoint, Heatmap};
use crate::pipeline::utility::mean;

fn coordinates(bio: &Biography) -> Option<HeatPoint> {
    let (lat, long) = (bio.lat?, bio.long?);
    let valid = lat.is_finite()
        && long.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&long);
    valid.then_some(HeatPoint { lat, long })
}

/// Birth locations of athletes born in the selected countries.
///
/// Missing or out-of-range coordinate pairs are skipped. The season toggle
/// does not apply here.
#[tracing::instrument(skip_all, fields(countries = countries.len()))]
pub fn heatmap(ctx: &DataContext, countries: &BTreeSet<String>) -> Heatmap {
    let points: Vec<HeatPoint> = ctx
        .biographies()
        .iter()
        .filter(|bio| {
            bio.born_country
                .as_ref()
                .is_some_and(|c| countries.contains(c))
        })
        .filter_map(coordinates)
        .collect();

    let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
    let longs: Vec<f64> = points.iter().map(|p| p.long).collect();
    let center = mean(&lats)
        .zip(mean(&longs))
        .map(|(lat, long)| HeatPoint { lat, long });

    Heatmap { points, center }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bio(id: u64, country: Option<&str>, lat: Option<f64>, long: Option<f64>) -> Biography {
        Biography {
            athlete_id: id,
            name: format!("Athlete {}", id),
            born_country: country.map(str::to_string),
            born_date: None,
            height_cm: None,
            weight_kg: None,
            lat,
            long,
        }
    }

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_points_and_center() {
        let ctx = DataContext::from_parts(
            vec![],
            vec![],
            vec![
                bio(1, Some("POL"), Some(52.0), Some(20.0)),
                bio(2, Some("POL"), Some(50.0), Some(18.0)),
                bio(3, Some("POL"), Some(51.0), None),
                bio(4, Some("POL"), Some(451.0), Some(18.0)),
                bio(5, Some("GER"), Some(52.5), Some(13.4)),
                bio(6, None, Some(0.0), Some(0.0)),
            ],
            vec![],
        );

        let map = heatmap(&ctx, &set(&["POL"]));
        assert_eq!(map.points.len(), 2);
        assert_eq!(map.center, Some(HeatPoint { lat: 51.0, long: 19.0 }));
    }

    #[test]
    fn test_empty_selection_has_no_center() {
        let ctx = DataContext::from_parts(
            vec![],
            vec![],
            vec![bio(1, Some("POL"), Some(52.0), Some(20.0))],
            vec![],
        );

        let map = heatmap(&ctx, &BTreeSet::new());
        assert!(map.points.is_empty());
        assert!(map.center.is_none());
    }
}
