use crate::domain::{Basis, FitModel, Point};
use crate::error::AppError;
use crate::fit::{fit, FitOptions};

/// Normalization parameters must agree to this tolerance for `subtract`.
pub const NORMALIZATION_TOL: f64 = 1e-12;

/// `high - low`, with `low` zero-padded into `high`'s term layout.
///
/// The result keeps `high`'s degree and normalization.
pub fn subtract(high: &FitModel, low: &FitModel) -> Result<FitModel, AppError> {
    if high.basis() != low.basis() {
        return Err(AppError::validation(format!(
            "subtract: basis mismatch ({} - {})",
            high.basis().display_name(),
            low.basis().display_name()
        )));
    }
    if low.degree() > high.degree() {
        return Err(AppError::validation(format!(
            "subtract: {} low degree {} exceeds high degree {}",
            high.basis().display_name(),
            low.degree(),
            high.degree()
        )));
    }
    let compatible = match (high.normalization(), low.normalization()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.approx_eq(&b, NORMALIZATION_TOL),
        _ => false,
    };
    if !compatible {
        return Err(AppError::validation(format!(
            "subtract: {} models were fitted under different normalizations ({:?} vs {:?})",
            high.basis().display_name(),
            high.normalization(),
            low.normalization()
        )));
    }

    let hi_layout = high.layout();
    let lo_layout = low.layout();
    let mut coeffs = high.coeffs().to_vec();
    for (idx, c) in low.coeffs().iter().enumerate() {
        let Some(pos) = hi_layout.embed_index(lo_layout, idx) else {
            return Err(AppError::validation(format!(
                "subtract: term {idx} of {lo_layout:?} has no slot in {hi_layout:?}"
            )));
        };
        coeffs[pos] -= c;
    }
    high.with_coeffs(coeffs)
}

/// Elementwise mean of models sharing basis and degree.
///
/// Normalization is taken from the first model.
pub fn average(models: &[FitModel]) -> Result<FitModel, AppError> {
    let Some(first) = models.first() else {
        return Err(AppError::validation("average: no models given"));
    };
    for (i, m) in models.iter().enumerate().skip(1) {
        if m.basis() != first.basis() || m.degree() != first.degree() {
            return Err(AppError::validation(format!(
                "average: model {i} is {} degree {}, expected {} degree {}",
                m.basis().display_name(),
                m.degree(),
                first.basis().display_name(),
                first.degree()
            )));
        }
    }
    if models.len() == 1 {
        return Ok(first.clone());
    }

    let n = models.len() as f64;
    let mut sum = vec![0.0; first.coeffs().len()];
    for m in models {
        for (s, c) in sum.iter_mut().zip(m.coeffs()) {
            *s += c;
        }
    }
    first.with_coeffs(sum.into_iter().map(|s| s / n).collect())
}

/// Fit `points` at `high` and `low` degree and return `high - low`.
pub fn detrend(
    points: &[Point],
    basis: Basis,
    high: usize,
    low: usize,
    opts: &FitOptions,
) -> Result<FitModel, AppError> {
    let detail = fit(points, high, basis, opts)?;
    let trend = fit(points, low, basis, opts)?;
    subtract(&detail, &trend)
}
