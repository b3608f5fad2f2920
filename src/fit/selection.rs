//! Degree selection.
//!
//! Every degree `1..=max_degree` is fitted independently (in parallel) and
//! scored on in-sample RMSE. The best fit is the minimum RMSE; ties go to the
//! lower degree so the simpler model wins.

use rayon::prelude::*;

use crate::domain::{Basis, ErrorMetrics, FitModel, Point};
use crate::error::AppError;
use crate::fit::fitter::{fit, FitOptions};
use crate::report::compute_residuals;

/// One degree's result.
#[derive(Debug, Clone)]
pub struct DegreeFit {
    pub degree: usize,
    pub model: FitModel,
    pub metrics: ErrorMetrics,
}

/// Output of a degree sweep.
#[derive(Debug, Clone)]
pub struct DegreeSweep {
    /// Fits in ascending degree order.
    pub fits: Vec<DegreeFit>,
    /// Index into `fits`.
    pub best: usize,
}

impl DegreeSweep {
    pub fn best(&self) -> &DegreeFit {
        &self.fits[self.best]
    }
}

/// Fit every degree up to `max_degree` and pick the lowest RMSE.
pub fn sweep_degrees(
    points: &[Point],
    basis: Basis,
    max_degree: usize,
    opts: &FitOptions,
) -> Result<DegreeSweep, AppError> {
    if max_degree == 0 {
        return Err(AppError::validation("sweep: max_degree must be >= 1"));
    }

    let fits: Vec<DegreeFit> = (1..=max_degree)
        .into_par_iter()
        .map(|degree| {
            let model = fit(points, degree, basis, opts)?;
            let (_, metrics) = compute_residuals(points, &model)?;
            Ok(DegreeFit {
                degree,
                model,
                metrics,
            })
        })
        .collect::<Result<_, AppError>>()?;

    let best = select_lowest_rmse(&fits);
    tracing::debug!(
        basis = basis.display_name(),
        best_degree = fits[best].degree,
        rmse = fits[best].metrics.rmse,
        "degree sweep finished"
    );
    Ok(DegreeSweep { fits, best })
}

fn select_lowest_rmse(fits: &[DegreeFit]) -> usize {
    let mut best = 0;
    for (i, f) in fits.iter().enumerate().skip(1) {
        // Strict comparison keeps the earlier (lower) degree on ties.
        if f.metrics.rmse < fits[best].metrics.rmse {
            best = i;
        }
    }
    best
}
