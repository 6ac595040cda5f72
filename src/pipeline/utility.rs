use std::collections::BTreeMap;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of each year's samples. Years without samples never appear.
pub fn yearly_means(samples: &BTreeMap<i32, Vec<f64>>) -> Vec<(i32, f64)> {
    samples
        .iter()
        .filter_map(|(&year, values)| mean(values).map(|m| (year, m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_yearly_means_skips_empty_years() {
        let mut samples = BTreeMap::new();
        samples.insert(2000, vec![170.0, 180.0]);
        samples.insert(2004, vec![]);
        samples.insert(1996, vec![160.0]);

        assert_eq!(yearly_means(&samples), vec![(1996, 160.0), (2000, 175.0)]);
    }
}
