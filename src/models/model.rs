//! Design rows and evaluation for Poly1D / Poly2D-separable / Chebyshev2D.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given sample (for least squares)
//! - evaluate z at (x, y) given a fitted model (for residuals/rebuilds)
//!
//! Both are implemented here per `TermLayout` so the column order used while
//! fitting and the coefficient order used while evaluating cannot drift apart.

use crate::domain::{FitModel, TermLayout};
use crate::math::{chebyshev_row, polyval_desc};

/// Fill a design row for the given layout.
///
/// - `Descending`: powers of `x` in **ascending** order `[1, x, …, x^d]`
///   (the solver's order; the fitter reverses the result).
/// - `Separable`: `[x, y, x², y², …, x^d, y^d, 1]`.
/// - `Tensor`: `Tᵢ(x)·Tⱼ(y)` row-major; `x`, `y` must already be normalized.
///
/// # Panics
/// Panics if `out` does not have length `layout.len()`. Callers size it from the layout.
pub fn fill_design_row(layout: TermLayout, x: f64, y: f64, out: &mut [f64]) {
    assert_eq!(out.len(), layout.len(), "design row length mismatch");
    match layout {
        TermLayout::Descending { .. } => {
            let mut p = 1.0;
            for slot in out.iter_mut() {
                *slot = p;
                p *= x;
            }
        }
        TermLayout::Separable { degree } => {
            let (mut px, mut py) = (1.0, 1.0);
            for k in 0..degree {
                px *= x;
                py *= y;
                out[2 * k] = px;
                out[2 * k + 1] = py;
            }
            out[2 * degree] = 1.0;
        }
        TermLayout::Tensor { degree } => {
            let mut tx = vec![0.0; degree + 1];
            let mut ty = vec![0.0; degree + 1];
            chebyshev_row(x, &mut tx);
            chebyshev_row(y, &mut ty);
            for (i, txi) in tx.iter().enumerate() {
                for (j, tyj) in ty.iter().enumerate() {
                    out[i * (degree + 1) + j] = txi * tyj;
                }
            }
        }
    }
}

impl FitModel {
    /// Evaluate `z` at `(x, y)`. 1D models ignore `y`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            FitModel::Poly1d(_) => polyval_desc(self.coeffs(), x),
            FitModel::Poly2dSeparable(_) => {
                let layout = self.layout();
                let mut row = vec![0.0; layout.len()];
                fill_design_row(layout, x, y, &mut row);
                dot(&row, self.coeffs())
            }
            FitModel::Chebyshev2d(m) => {
                let (xn, yn) = m.norm().normalize(x, y);
                let layout = self.layout();
                let mut row = vec![0.0; layout.len()];
                fill_design_row(layout, xn, yn, &mut row);
                dot(&row, self.coeffs())
            }
        }
    }

    /// Evaluate over paired coordinate slices.
    pub fn evaluate_many(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter().zip(y.iter()).map(|(&xi, &yi)| self.evaluate(xi, yi)).collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Free-function form of [`FitModel::evaluate`].
pub fn evaluate(model: &FitModel, x: f64, y: f64) -> f64 {
    model.evaluate(x, y)
}
