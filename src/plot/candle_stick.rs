//! Candle-stick points: quartiles, Tukey fences and outliers of a sample

use serde::{Deserialize, Serialize};

use crate::stats::{outliers_lower, outliers_upper, percentile_sorted, sort_values, TUKEY_CONSTANT};

/// Box-plot summary of the values observed at one x position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleStickPoint {
    /// Position on the x axis
    pub x: f32,
    /// 25th percentile
    pub p25: f32,
    /// Median
    pub p50: f32,
    /// 75th percentile
    pub p75: f32,
    /// Lower Tukey fence
    pub lower: f32,
    /// Upper Tukey fence
    pub upper: f32,
    /// Number of values summarized
    pub count: usize,
    /// Values outside the fences, low ones first, each group ascending
    pub outliers: Vec<f32>,
}

impl CandleStickPoint {
    /// Interquartile range
    pub fn iqr(&self) -> f32 {
        self.p75 - self.p25
    }
}

/// Summarize `values` as a candle stick at `x`
///
/// `values` is sorted in place. `outliers` is scratch space shared across
/// calls: outliers are only collected when it has capacity, and it is left
/// empty on return.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn plot_candle_stick(values: &mut [f32], x: f32, outliers: &mut Vec<f32>) -> CandleStickPoint {
    sort_values(values);
    let p25 = percentile_sorted(values, 25.0);
    let p50 = percentile_sorted(values, 50.0);
    let p75 = percentile_sorted(values, 75.0);

    let iqr = p75 - p25;
    let lower = p25 - TUKEY_CONSTANT * iqr;
    let upper = p75 + TUKEY_CONSTANT * iqr;
    if outliers.capacity() > 0 {
        outliers_lower(values, lower, outliers);
        outliers_upper(values, upper, outliers);
    }

    let point = CandleStickPoint {
        x,
        p25,
        p50,
        p75,
        lower,
        upper,
        count: values.len(),
        outliers: outliers.clone(),
    };
    outliers.clear();
    point
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_candle_stick_quartiles() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0, 100.0];
        let mut scratch = Vec::with_capacity(8);
        let point = plot_candle_stick(&mut values, 3.0, &mut scratch);

        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 100.0]);
        assert_eq!(point.x, 3.0);
        assert_eq!(point.count, 5);
        assert_eq!((point.p25, point.p50, point.p75), (2.0, 3.0, 4.0));
        assert_eq!(point.lower, -1.0);
        assert_eq!(point.upper, 7.0);
        assert_eq!(point.outliers, vec![100.0]);
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_no_capacity_skips_outliers() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 100.0];
        let mut scratch = Vec::new();
        let point = plot_candle_stick(&mut values, 1.0, &mut scratch);
        assert!(point.outliers.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_empty_values_panic() {
        plot_candle_stick(&mut [], 1.0, &mut Vec::new());
    }

    proptest! {
        #[test]
        fn test_fences_and_outlier_partition(values in prop::collection::vec(-1e4f32..1e4f32, 1..100)) {
            let mut sorted = values.clone();
            let mut scratch = Vec::with_capacity(values.len());
            let point = plot_candle_stick(&mut sorted, 0.0, &mut scratch);

            prop_assert!(point.lower <= point.p25);
            prop_assert!(point.p25 <= point.p50);
            prop_assert!(point.p50 <= point.p75);
            prop_assert!(point.p75 <= point.upper);
            prop_assert_eq!(point.count, values.len());

            let expected: Vec<f32> = sorted
                .iter()
                .copied()
                .filter(|v| *v < point.lower)
                .chain(sorted.iter().copied().filter(|v| *v > point.upper))
                .collect();
            prop_assert_eq!(&point.outliers, &expected);
            prop_assert!(scratch.is_empty());
        }
    }
}
