//! Least squares solvers.
//!
//! Every fit in this crate is linear in its coefficients:
//!
//! ```text
//! minimize ‖A c − z‖²            (ordinary least squares)
//! minimize ‖A c − z‖² + λ‖c‖²    (ridge)
//! ```
//!
//! Implementation choices:
//! - OLS goes through SVD with a relative singular-value cutoff
//!   (`σ_max · ε · max(n, p)`), so rank-deficient design matrices yield the
//!   minimum-norm solution instead of failing.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Ridge adds `λ·I` to the normal equations and solves with Cholesky.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the inputs are non-finite or the solution is.
pub fn solve_least_squares(a: &DMatrix<f64>, z: &DVector<f64>) -> Option<DVector<f64>> {
    if a.iter().chain(z.iter()).any(|v| !v.is_finite()) {
        return None;
    }
    let svd = a.clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let eps = sigma_max * f64::EPSILON * a.nrows().max(a.ncols()) as f64;

    let coeffs = svd.solve(z, eps).ok()?;
    if coeffs.iter().all(|v| v.is_finite()) {
        Some(coeffs)
    } else {
        None
    }
}

/// Solve the ridge-regularized normal equations `(AᵀA + λI) c = Aᵀz`.
///
/// Returns `None` when the regularized system is not positive definite.
pub fn solve_ridge(a: &DMatrix<f64>, z: &DVector<f64>, alpha: f64) -> Option<DVector<f64>> {
    let p = a.ncols();
    let at = a.transpose();
    let mut ata = &at * a;
    for i in 0..p {
        ata[(i, i)] += alpha;
    }
    let atz = &at * z;
    let coeffs = ata.cholesky()?.solve(&atz);
    if coeffs.iter().all(|v| v.is_finite()) {
        Some(coeffs)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit z = 2 + 3x on x = [0,1,2]
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let z = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let c = solve_least_squares(&a, &z).unwrap();
        assert!((c[0] - 2.0).abs() < 1e-10);
        assert!((c[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_tolerates_duplicate_columns() {
        // Two identical columns: minimum-norm solution splits the weight evenly.
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let z = DVector::from_row_slice(&[2.0, 4.0, 6.0]);
        let c = solve_least_squares(&a, &z).unwrap();
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn least_squares_rejects_non_finite_input() {
        let a = DMatrix::from_row_slice(2, 1, &[1.0, f64::NAN]);
        let z = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_least_squares(&a, &z).is_none());
    }

    #[test]
    fn ridge_shrinks_towards_zero() {
        let a = DMatrix::from_row_slice(3, 1, &[1.0, 1.0, 1.0]);
        let z = DVector::from_row_slice(&[3.0, 3.0, 3.0]);
        let ols = solve_ridge(&a, &z, 0.0).unwrap();
        let ridge = solve_ridge(&a, &z, 3.0).unwrap();
        assert!((ols[0] - 3.0).abs() < 1e-12);
        // (3 + 3) c = 9 -> c = 1.5
        assert!((ridge[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn ridge_without_penalty_fails_on_singular_system() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let z = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(solve_ridge(&a, &z, 0.0).is_none());
        assert!(solve_ridge(&a, &z, 1e-3).is_some());
    }
}
