//! Significance ranking of seasonality impacts

use std::cmp::Ordering;

/// Magnitude used for ranking; NaN counts as least significant
fn magnitude(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value.abs()
    }
}

/// Indices of `values` ordered by descending absolute value.
///
/// The sort is stable, so equal magnitudes keep ascending index order.
pub fn significance_ranking(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| compare_magnitude(values[b], values[a]));
    indices
}

/// The `n` most significant indices (fewer when `values` is shorter)
pub fn top_significant(values: &[f64], n: usize) -> Vec<usize> {
    let mut ranking = significance_ranking(values);
    ranking.truncate(n);
    ranking
}

fn compare_magnitude(a: f64, b: f64) -> Ordering {
    magnitude(a).total_cmp(&magnitude(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_by_magnitude() {
        let values = [1.0, -7.0, 3.0, 5.0];
        assert_eq!(significance_ranking(&values), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_ties_keep_lower_index_first() {
        let values = [2.0, -2.0, 0.5, 2.0];
        assert_eq!(significance_ranking(&values), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_zero_and_negative_zero_tie() {
        let values = [0.0, -0.0, 0.0];
        assert_eq!(significance_ranking(&values), vec![0, 1, 2]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let values = [f64::NAN, 0.1, -4.0];
        assert_eq!(significance_ranking(&values), vec![2, 1, 0]);
    }

    #[test]
    fn test_top_significant_short_input() {
        assert_eq!(top_significant(&[3.0, -1.0], 6), vec![0, 1]);
        assert!(top_significant(&[], 6).is_empty());
    }

    #[test]
    fn test_yearly_example_significance_set() {
        let values = [5.0, -10.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(top_significant(&values, 6), vec![1, 0, 2, 3, 4, 5]);
    }
}
