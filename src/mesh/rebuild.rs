//! Evaluate a fitted model over a planar grid.
//!
//! No unit conversion happens here. Callers that need a different z unit
//! apply `scale_z` afterwards.

use crate::domain::{Basis, FitModel, GeometrySpec, GridStep, Point};
use crate::error::AppError;
use crate::mesh::grid::{domain_grid, rectangular_grid};

/// Synthetic point cloud of `model` over `geometry`.
pub fn rebuild(model: &FitModel, geometry: &GeometrySpec, step: GridStep) -> Result<Vec<Point>, AppError> {
    model.validate()?;
    let grid = domain_grid(geometry, step)?;
    project(model, &grid)
}

/// Extrude a profile curve along y over `[0, width] × [0, height]`.
pub fn rebuild_curve_extrusion(
    model: &FitModel,
    width: f64,
    height: f64,
    step: GridStep,
) -> Result<Vec<Point>, AppError> {
    if model.basis() != Basis::Poly1d {
        return Err(AppError::validation(format!(
            "rebuild_curve_extrusion: expected a poly-1d model, got {}",
            model.basis().display_name()
        )));
    }
    model.validate()?;
    let grid = rectangular_grid(width, height, step)?;
    if grid.is_empty() {
        return Err(AppError::geometry("rebuild_curve_extrusion: empty grid"));
    }
    project(model, &grid)
}

/// Multiply every z by `factor`.
pub fn scale_z(points: &[Point], factor: f64) -> Vec<Point> {
    points.iter().map(|p| Point { z: p.z * factor, ..*p }).collect()
}

fn project(model: &FitModel, grid: &[(f64, f64)]) -> Result<Vec<Point>, AppError> {
    let mut out = Vec::with_capacity(grid.len());
    for &(x, y) in grid {
        let z = model.evaluate(x, y);
        if !z.is_finite() {
            return Err(AppError::numerical(format!(
                "rebuild: non-finite {} value at ({x}, {y})",
                model.basis().display_name()
            )));
        }
        out.push(Point::new(x, y, z));
    }
    Ok(out)
}
