//! Order statistics.

/// Percentile `q ∈ [0, 100]` with linear interpolation between closest ranks.
///
/// Returns `None` for empty input or when any value is NaN.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(percentile_sorted(&sorted, q))
}

/// Same as [`percentile`] for data already sorted ascending (non-empty).
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 100.0) / 100.0;
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&v, 25.0).unwrap() - 1.75).abs() < 1e-12);
        assert!((percentile(&v, 50.0).unwrap() - 2.5).abs() < 1e-12);
        assert!((percentile(&v, 75.0).unwrap() - 3.25).abs() < 1e-12);
    }

    #[test]
    fn percentile_is_order_independent() {
        let a = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&a, 25.0), Some(2.0));
        assert_eq!(percentile(&a, 100.0), Some(5.0));
    }

    #[test]
    fn percentile_rejects_empty_and_nan() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[1.0, f64::NAN], 50.0), None);
    }
}
