//! Reporting utilities: residuals, error metrics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{ErrorMetrics, FitModel, Point};
use crate::error::AppError;

impl ErrorMetrics {
    /// MSE, RMSE and max |r| over `residuals`.
    pub fn from_residuals(residuals: &[f64]) -> Result<Self, AppError> {
        if residuals.is_empty() {
            return Err(AppError::validation("residuals: no points to score"));
        }
        let n = residuals.len();
        let mse = residuals.iter().map(|r| r * r).sum::<f64>() / n as f64;
        let max_abs_error = residuals.iter().fold(0.0_f64, |m, r| m.max(r.abs()));
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            max_abs_error,
            n,
        })
    }
}

/// `z_measured - z_fit` for every point, plus summary metrics.
pub fn compute_residuals(points: &[Point], model: &FitModel) -> Result<(Vec<f64>, ErrorMetrics), AppError> {
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let z_fit = model.evaluate(p.x, p.y);
        if !z_fit.is_finite() {
            return Err(AppError::numerical(format!(
                "residuals: non-finite {} prediction at ({}, {})",
                model.basis().display_name(),
                p.x,
                p.y
            )));
        }
        out.push(p.z - z_fit);
    }
    let metrics = ErrorMetrics::from_residuals(&out)?;
    Ok((out, metrics))
}
