//! Statistics primitives shared by the summary engine and chart data
//!
//! Percentiles use linear interpolation between closest ranks: for `n` sorted
//! values the `p`-th percentile sits at position `h = (n - 1) * p / 100`, and
//! the result is `v[floor(h)] + (h - floor(h)) * (v[floor(h) + 1] - v[floor(h)])`.
//! The median is the 50th percentile under the same rule.

/// Tukey's fence multiplier
pub const TUKEY_CONSTANT: f32 = 1.5;

/// Interpolated percentile of an ascending slice
///
/// # Panics
///
/// Panics if `sorted` is empty. Callers check for emptiness first.
pub fn percentile_sorted(sorted: &[f32], percentile: f32) -> f32 {
    assert!(!sorted.is_empty(), "percentile of an empty sequence");
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let p = percentile.clamp(0.0, 100.0) as f64;
    let h = (n - 1) as f64 * p / 100.0;
    let lower = h.floor() as usize;
    if lower + 1 >= n {
        return sorted[n - 1];
    }
    let frac = h - lower as f64;
    let lo = sorted[lower] as f64;
    let hi = sorted[lower + 1] as f64;
    (lo + frac * (hi - lo)) as f32
}

/// Sort values ascending, NaN last
pub fn sort_values(values: &mut [f32]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Median of unsorted values; sorts the slice in place
///
/// Returns `None` for an empty slice.
pub fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    sort_values(values);
    Some(percentile_sorted(values, 50.0))
}

/// Arithmetic mean, `None` for an empty sequence
pub fn mean<I: IntoIterator<Item = f32>>(values: I) -> Option<f32> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v as f64, count + 1));
    if count == 0 {
        None
    } else {
        Some((sum / count as f64) as f32)
    }
}

/// Sample standard deviation (n - 1 denominator)
///
/// Returns 0 for a single value and `None` for an empty sequence.
pub fn standard_deviation<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let avg = mean(iter.clone())? as f64;
    let (sum_sq, count) = iter.fold((0.0f64, 0usize), |(acc, count), v| {
        let d = v as f64 - avg;
        (acc + d * d, count + 1)
    });
    if count < 2 {
        return Some(0.0);
    }
    Some((sum_sq / (count - 1) as f64).sqrt() as f32)
}

/// Append, in ascending order, every value below `lower`
pub fn outliers_lower(sorted: &[f32], lower: f32, out: &mut Vec<f32>) {
    out.extend(sorted.iter().take_while(|v| **v < lower).copied());
}

/// Append, in ascending order, every value above `upper`
pub fn outliers_upper(sorted: &[f32], upper: f32, out: &mut Vec<f32>) {
    let count = sorted.iter().rev().take_while(|v| **v > upper).count();
    out.extend_from_slice(&sorted[sorted.len() - count..]);
}
