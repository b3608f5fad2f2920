//! Per-axis IQR outlier filter.
//!
//! For each named axis: `bounds = [Q1 − f·IQR, Q3 + f·IQR]`. A point survives
//! only if it lies inside the bounds of **every** named axis.
//!
//! Notes:
//! - Inputs smaller than [`MIN_IQR_SAMPLES`] are returned unchanged; quartiles of
//!   a handful of points carry no information.
//! - When all values on an axis are equal, `IQR = 0` and the bounds collapse to
//!   that value. This is intended: callers choose tight factors per section
//!   (e.g. `bottom` vs `wall`) knowing this.

use std::collections::BTreeMap;

use crate::domain::{Axis, Point};
use crate::error::AppError;
use crate::math::percentile_sorted;

/// Below this many points the filter is a no-op.
pub const MIN_IQR_SAMPLES: usize = 5;

/// IQR multiplier per axis. Axes not present are not filtered.
pub type AxisFactors = BTreeMap<Axis, f64>;

/// Inclusive acceptance interval computed for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }
}

/// Compute the IQR bounds of `values` for `factor` (non-empty input).
pub fn iqr_bounds(values: &[f64], factor: f64) -> IqrBounds {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = percentile_sorted(&sorted, 25.0);
    let q3 = percentile_sorted(&sorted, 75.0);
    let iqr = q3 - q1;
    IqrBounds {
        q1,
        q3,
        lower: q1 - factor * iqr,
        upper: q3 + factor * iqr,
    }
}

/// Convenience for the common single-axis case.
pub fn z_factor(factor: f64) -> AxisFactors {
    AxisFactors::from([(Axis::Z, factor)])
}

/// Filter `points`, keeping the original relative order.
pub fn filter_iqr(points: &[Point], factors: &AxisFactors) -> Result<Vec<Point>, AppError> {
    for (axis, &f) in factors {
        if !(f.is_finite() && f >= 0.0) {
            return Err(AppError::validation(format!(
                "filter_iqr: factor for axis {} must be finite and >= 0, got {f}",
                axis.label()
            )));
        }
    }
    if points.len() < MIN_IQR_SAMPLES || factors.is_empty() {
        return Ok(points.to_vec());
    }
    if points.iter().any(|p| factors.keys().any(|&a| p.coord(a).is_nan())) {
        return Err(AppError::validation("filter_iqr: NaN coordinate on a filtered axis"));
    }

    let bounds: Vec<(Axis, IqrBounds)> = factors
        .iter()
        .map(|(&axis, &f)| {
            let values: Vec<f64> = points.iter().map(|p| p.coord(axis)).collect();
            (axis, iqr_bounds(&values, f))
        })
        .collect();

    Ok(points
        .iter()
        .filter(|p| bounds.iter().all(|(axis, b)| b.contains(p.coord(*axis))))
        .copied()
        .collect())
}
