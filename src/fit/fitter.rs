//! Low-level fitting routines, one per basis.
//!
//! Given samples `(x_i, y_i, z_i)` and a degree we:
//! - build the design matrix row by row (`models::fill_design_row`)
//! - solve the least squares problem (`math::solve_least_squares` / `solve_ridge`)
//! - wrap the coefficients in the matching `FitModel` variant
//!
//! Each fit is the exact inverse of `FitModel::evaluate`: evaluating the
//! returned model at the samples reproduces the least-squares prediction.

use nalgebra::{DMatrix, DVector};

use crate::domain::{AffineMap, Basis, DomainBox, FitModel, Point, TermLayout};
use crate::error::AppError;
use crate::math::{compose_affine, solve_least_squares, solve_ridge};
use crate::models::fill_design_row;

/// Options that only affect 1D fits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitOptions {
    /// Affine-normalize x onto `[-1, 1]` before solving.
    ///
    /// Improves conditioning for high degrees. The returned coefficients are
    /// always composed back into raw-x space.
    pub normalize_x: bool,
    /// Ridge strength λ added to the normal-equation diagonal (0 = OLS).
    pub ridge_alpha: f64,
}

/// Fit `z = p(x)` of the given degree.
pub fn fit_1d(x: &[f64], z: &[f64], degree: usize, opts: &FitOptions) -> Result<FitModel, AppError> {
    check_samples("fit_1d", &[x, z])?;
    if !(opts.ridge_alpha.is_finite() && opts.ridge_alpha >= 0.0) {
        return Err(AppError::validation(format!(
            "fit_1d: ridge_alpha must be finite and >= 0, got {}",
            opts.ridge_alpha
        )));
    }

    let norm = if opts.normalize_x {
        let (lo, hi) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(AffineMap::to_unit(lo, hi).map_err(|e| AppError::validation(format!("fit_1d: {e}")))?)
    } else {
        None
    };
    let x_fit: Vec<f64> = match norm {
        Some(map) => x.iter().map(|&v| map.apply(v)).collect(),
        None => x.to_vec(),
    };

    let layout = TermLayout::Descending { degree };
    let zeros = vec![0.0; x.len()];
    let a = design_matrix(layout, &x_fit, &zeros);
    let zv = DVector::from_column_slice(z);

    let solved = if opts.ridge_alpha > 0.0 {
        solve_ridge(&a, &zv, opts.ridge_alpha)
    } else {
        solve_least_squares(&a, &zv)
    };
    let ascending: Vec<f64> = solved
        .ok_or_else(|| singular("fit_1d", Basis::Poly1d, degree, &a))?
        .iter()
        .copied()
        .collect();

    // Back into raw-x space so evaluation never needs the map.
    let mut raw = match norm {
        Some(map) => compose_affine(&ascending, map.scale, map.shift),
        None => ascending,
    };
    raw.reverse();
    FitModel::poly_1d(degree, raw, norm)
}

/// Fit the separable surface `z = Σ aₖxᵏ + bₖyᵏ + c`.
pub fn fit_2d_poly(x: &[f64], y: &[f64], z: &[f64], degree: usize) -> Result<FitModel, AppError> {
    check_samples("fit_2d_poly", &[x, y, z])?;
    let layout = TermLayout::Separable { degree };
    let a = design_matrix(layout, x, y);
    let coeffs = solve_least_squares(&a, &DVector::from_column_slice(z))
        .ok_or_else(|| singular("fit_2d_poly", Basis::Poly2d, degree, &a))?;
    FitModel::poly_2d(degree, coeffs.iter().copied().collect())
}

/// Fit a Chebyshev tensor-product surface over min/max-normalized coordinates.
pub fn fit_2d_chebyshev(x: &[f64], y: &[f64], z: &[f64], degree: usize) -> Result<FitModel, AppError> {
    check_samples("fit_2d_chebyshev", &[x, y, z])?;
    let norm = DomainBox::from_samples(x, y)?;
    let (xn, yn): (Vec<f64>, Vec<f64>) = x.iter().zip(y.iter()).map(|(&a, &b)| norm.normalize(a, b)).unzip();

    let layout = TermLayout::Tensor { degree };
    let a = design_matrix(layout, &xn, &yn);
    let coeffs = solve_least_squares(&a, &DVector::from_column_slice(z))
        .ok_or_else(|| singular("fit_2d_chebyshev", Basis::Chebyshev, degree, &a))?;
    FitModel::chebyshev_2d(degree, coeffs.iter().copied().collect(), norm)
}

/// Fit `points` with the requested basis.
///
/// `opts` only applies to `Basis::Poly1d`; passing non-default options with
/// a 2D basis is rejected rather than ignored.
pub fn fit(points: &[Point], degree: usize, basis: Basis, opts: &FitOptions) -> Result<FitModel, AppError> {
    let x: Vec<f64> = points.iter().map(|p| p.x).collect();
    let y: Vec<f64> = points.iter().map(|p| p.y).collect();
    let z: Vec<f64> = points.iter().map(|p| p.z).collect();

    if basis != Basis::Poly1d && *opts != FitOptions::default() {
        return Err(AppError::validation(format!(
            "fit: normalize/ridge options apply to poly1d only, not {}",
            basis.display_name()
        )));
    }

    match basis {
        Basis::Poly1d => fit_1d(&x, &z, degree, opts),
        Basis::Poly2d => fit_2d_poly(&x, &y, &z, degree),
        Basis::Chebyshev => fit_2d_chebyshev(&x, &y, &z, degree),
    }
}

fn design_matrix(layout: TermLayout, x: &[f64], y: &[f64]) -> DMatrix<f64> {
    let n = x.len();
    let p = layout.len();
    let mut a = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for i in 0..n {
        fill_design_row(layout, x[i], y[i], &mut row);
        for (j, v) in row.iter().enumerate() {
            a[(i, j)] = *v;
        }
    }
    a
}

fn check_samples(op: &str, columns: &[&[f64]]) -> Result<(), AppError> {
    let n = columns[0].len();
    if n == 0 {
        return Err(AppError::validation(format!("{op}: no samples to fit")));
    }
    if let Some(bad) = columns.iter().find(|c| c.len() != n) {
        return Err(AppError::validation(format!(
            "{op}: mismatched sample lengths ({n} vs {})",
            bad.len()
        )));
    }
    if columns.iter().any(|c| c.iter().any(|v| !v.is_finite())) {
        return Err(AppError::validation(format!("{op}: non-finite sample values")));
    }
    Ok(())
}

fn singular(op: &str, basis: Basis, degree: usize, a: &DMatrix<f64>) -> AppError {
    AppError::numerical(format!(
        "{op}: could not solve {} degree {degree} ({}x{} design matrix)",
        basis.display_name(),
        a.nrows(),
        a.ncols()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::report::compute_residuals;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fit_1d_recovers_a_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let z: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        let m = fit_1d(&x, &z, 1, &FitOptions::default()).unwrap();
        assert_abs_diff_eq!(m.coeffs()[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.coeffs()[1], 3.0, epsilon = 1e-9);
        for (xi, zi) in x.iter().zip(z.iter()) {
            assert_abs_diff_eq!(m.evaluate(*xi, 0.0), *zi, epsilon = 1e-9);
        }
        let pts: Vec<Point> = x.iter().zip(z.iter()).map(|(&a, &b)| Point::profile(a, b)).collect();
        let (_, metrics) = compute_residuals(&pts, &m).unwrap();
        assert!(metrics.rmse < 1e-9);
    }

    #[test]
    fn normalized_fit_matches_raw_fit() {
        let x: Vec<f64> = (0..12).map(|i| 100.0 + 2.5 * i as f64).collect();
        let z: Vec<f64> = x.iter().map(|v| 0.001 * v * v - 0.3 * v + 4.0).collect();
        let raw = fit_1d(&x, &z, 2, &FitOptions::default()).unwrap();
        let opts = FitOptions {
            normalize_x: true,
            ridge_alpha: 0.0,
        };
        let norm = fit_1d(&x, &z, 2, &opts).unwrap();
        assert!(norm.normalization().is_some());
        for &xi in &x {
            assert_abs_diff_eq!(raw.evaluate(xi, 0.0), norm.evaluate(xi, 0.0), epsilon = 1e-6);
        }
        assert_abs_diff_eq!(norm.coeffs()[0], 0.001, epsilon = 1e-8);
    }

    #[test]
    fn ridge_is_applied_in_fit_space() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let z = [5.0, 5.0, 5.0, 5.0];
        let opts = FitOptions {
            normalize_x: false,
            ridge_alpha: 4.0,
        };
        let m = fit_1d(&x, &z, 0, &opts).unwrap();
        // (4 + 4) c = 20
        assert_abs_diff_eq!(m.coeffs()[0], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn normalize_with_constant_x_is_rejected() {
        let opts = FitOptions {
            normalize_x: true,
            ridge_alpha: 0.0,
        };
        let err = fit_1d(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 1, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn fit_2d_poly_reproduces_exact_surface() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..6 {
            for j in 0..5 {
                x.push(i as f64 * 0.5);
                y.push(j as f64 * 0.25);
            }
        }
        let truth = FitModel::poly_2d(2, vec![0.3, -1.0, 0.05, 0.4, 2.0]).unwrap();
        let z = truth.evaluate_many(&x, &y);
        let m = fit_2d_poly(&x, &y, &z, 2).unwrap();
        for (a, b) in m.coeffs().iter().zip(truth.coeffs()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn chebyshev_round_trip_and_norm_params() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..7 {
            for j in 0..7 {
                x.push(10.0 + i as f64);
                y.push(-3.0 + 0.5 * j as f64);
            }
        }
        let z: Vec<f64> = x.iter().zip(y.iter()).map(|(a, b)| 0.01 * a * a - 0.2 * a * b + b).collect();
        let m = fit_2d_chebyshev(&x, &y, &z, 2).unwrap();
        assert_eq!(m.coeffs().len(), 9);
        for i in 0..x.len() {
            assert_abs_diff_eq!(m.evaluate(x[i], y[i]), z[i], epsilon = 1e-9);
        }
        let Some(crate::domain::Normalization::Box(b)) = m.normalization() else {
            panic!("chebyshev model without a domain box");
        };
        assert_eq!((b.x_min, b.x_max, b.y_min, b.y_max), (10.0, 16.0, -3.0, 0.0));
    }

    #[test]
    fn chebyshev_needs_spread_in_both_axes() {
        let err = fit_2d_chebyshev(&[0.0, 1.0, 2.0], &[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn empty_and_mismatched_inputs_are_validation_errors() {
        assert_eq!(fit_2d_poly(&[], &[], &[], 1).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(
            fit_2d_poly(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn options_are_rejected_for_2d_bases() {
        let pts: Vec<Point> = (0..6).map(|i| Point::new(i as f64, (i % 2) as f64, 1.0)).collect();
        let opts = FitOptions {
            normalize_x: false,
            ridge_alpha: 0.1,
        };
        assert!(fit(&pts, 1, Basis::Poly2d, &opts).is_err());
        assert!(fit(&pts, 1, Basis::Poly2d, &FitOptions::default()).is_ok());
    }

    #[test]
    fn overflowing_design_matrix_is_a_numerical_error() {
        let x = [1e200, 2e200, 3e200, 4e200];
        let z = [1.0, 2.0, 3.0, 4.0];
        let err = fit_1d(&x, &z, 3, &FitOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Numerical);
        assert!(err.message().starts_with("fit_1d"), "{err}");
        assert!(err.message().contains("poly-1d degree 3"), "{err}");
    }

    #[test]
    fn numerical_errors_surface_through_fit() {
        let pts: Vec<Point> = (1..=5).map(|i| Point::new(i as f64 * 1e200, i as f64, 0.5)).collect();
        let err = fit(&pts, 2, Basis::Poly2d, &FitOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Numerical);
        assert!(err.message().contains("fit_2d_poly"), "{err}");
        assert!(err.message().contains("degree 2"), "{err}");
    }
}
