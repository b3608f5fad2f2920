//! Grid generation.
//!
//! Rectangles get a regular lattice anchored at the origin. T-shapes are the
//! union of two bars; each bar is subdivided on its own (edges included), the
//! candidates are kept when they fall inside the union, and near-duplicates
//! from the shared edge are collapsed after rounding.

use std::collections::HashSet;

use crate::domain::{GeometrySpec, GridStep, TShapeDims};
use crate::error::AppError;

/// Decimal places used to detect duplicate grid points.
pub const DEDUP_DECIMALS: i32 = 8;

const EDGE_TOL: f64 = 1e-9;

/// Closed simple polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<(f64, f64)>,
}

impl Polygon {
    /// Outline of the T (counter-clockwise, starting at the origin).
    pub fn t_outline(d: &TShapeDims) -> Self {
        let v = d.vertical_bar();
        let (w, t) = (d.h_width, d.h_thickness);
        Self {
            vertices: vec![
                (0.0, 0.0),
                (w, 0.0),
                (w, t),
                (v.x_max, t),
                (v.x_max, v.y_max),
                (v.x_min, v.y_max),
                (v.x_min, t),
                (0.0, t),
            ],
        }
    }

    /// Point-in-polygon with the boundary counted as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        for i in 0..n {
            let (x1, y1) = self.vertices[i];
            let (x2, y2) = self.vertices[(i + 1) % n];
            if on_segment(x, y, x1, y1, x2, y2) {
                return true;
            }
            if (y1 > y) != (y2 > y) {
                let x_cross = x1 + (y - y1) * (x2 - x1) / (y2 - y1);
                if x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

fn on_segment(x: f64, y: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
    let cross = (x2 - x1) * (y - y1) - (y2 - y1) * (x - x1);
    let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
    if cross.abs() > EDGE_TOL * len.max(1.0) {
        return false;
    }
    x >= x1.min(x2) - EDGE_TOL
        && x <= x1.max(x2) + EDGE_TOL
        && y >= y1.min(y2) - EDGE_TOL
        && y <= y1.max(y2) + EDGE_TOL
}

fn check_step(step: GridStep) -> Result<(), AppError> {
    for (name, v) in [("dx", step.dx), ("dy", step.dy)] {
        if !(v.is_finite() && v > 0.0) {
            return Err(AppError::geometry(format!("grid: step {name} must be finite and > 0, got {v}")));
        }
    }
    Ok(())
}

/// `0, d, 2d, …` up to and including `len`.
fn lattice(len: f64, d: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let v = i as f64 * d;
        if v > len + EDGE_TOL {
            break;
        }
        out.push(v);
        i += 1;
    }
    out
}

/// `n = ceil(len / d)` equal divisions of `[lo, hi]`, both edges included.
fn divisions(lo: f64, hi: f64, d: f64) -> Vec<f64> {
    let n = ((hi - lo) / d - EDGE_TOL).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| if i == n { hi } else { lo + (i as f64 / n as f64) * (hi - lo) })
        .collect()
}

/// Regular grid over `[0, width] × [0, height]`, x varying fastest.
pub fn rectangular_grid(width: f64, height: f64, step: GridStep) -> Result<Vec<(f64, f64)>, AppError> {
    check_step(step)?;
    GeometrySpec::Rectangle { width, height }.validate()?;
    let xs = lattice(width, step.dx);
    let ys = lattice(height, step.dy);
    let mut out = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            out.push((x, y));
        }
    }
    Ok(out)
}

/// Grid over the T: horizontal bar first, then the vertical bar.
pub fn t_shape_grid(dims: &TShapeDims, step: GridStep) -> Result<Vec<(f64, f64)>, AppError> {
    check_step(step)?;
    GeometrySpec::TShape(*dims).validate()?;
    let bars = [dims.horizontal_bar(), dims.vertical_bar()];

    let mut candidates = Vec::new();
    for bar in &bars {
        for x in divisions(bar.x_min, bar.x_max, step.dx) {
            for y in divisions(bar.y_min, bar.y_max, step.dy) {
                candidates.push((x, y));
            }
        }
    }
    let inside: Vec<(f64, f64)> = candidates
        .into_iter()
        .filter(|&(x, y)| bars.iter().any(|b| b.contains(x, y)))
        .collect();
    Ok(dedup_rounded(&inside, DEDUP_DECIMALS))
}

/// Grid for either domain kind. An empty result is a geometry error.
pub fn domain_grid(spec: &GeometrySpec, step: GridStep) -> Result<Vec<(f64, f64)>, AppError> {
    let grid = match spec {
        GeometrySpec::Rectangle { width, height } => rectangular_grid(*width, *height, step)?,
        GeometrySpec::TShape(dims) => t_shape_grid(dims, step)?,
    };
    if grid.is_empty() {
        return Err(AppError::geometry(format!("grid: no points generated for {spec:?}")));
    }
    Ok(grid)
}

/// Drop points whose coordinates match an earlier point after rounding.
///
/// First occurrences are kept, in input order.
pub fn dedup_rounded(points: &[(f64, f64)], decimals: i32) -> Vec<(f64, f64)> {
    let scale = 10f64.powi(decimals);
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .copied()
        .filter(|&(x, y)| seen.insert(((x * scale).round() as i64, (y * scale).round() as i64)))
        .collect()
}
