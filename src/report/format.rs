//! Formatted terminal output.
//!
//! Formatting code lives in one place so the math/fitting code stays clean and
//! output changes are localized.

use crate::domain::{FitModel, Step};
use crate::fit::DegreeSweep;

/// Terms with `|coef|` at or below this are left out of rendered equations.
const EQUATION_EPS: f64 = 1e-10;

/// Human-readable equation of `model`, one term per line.
pub fn format_equation(model: &FitModel) -> String {
    let c = model.coeffs();
    let d = model.degree();
    let mut terms: Vec<(f64, String)> = Vec::new();

    match model {
        FitModel::Poly1d(_) => {
            for (i, &coef) in c.iter().enumerate() {
                let power = d - i;
                let var = match power {
                    0 => String::new(),
                    1 => " * x".to_string(),
                    p => format!(" * x^{p}"),
                };
                terms.push((coef, var));
            }
        }
        FitModel::Poly2dSeparable(_) => {
            for k in 1..=d {
                terms.push((c[2 * (k - 1)], format!(" * x^{k}")));
                terms.push((c[2 * (k - 1) + 1], format!(" * y^{k}")));
            }
            terms.push((c[2 * d], String::new()));
        }
        FitModel::Chebyshev2d(_) => {
            for i in 0..=d {
                for j in 0..=d {
                    terms.push((c[i * (d + 1) + j], format!(" * T{i}(x') * T{j}(y')")));
                }
            }
        }
    }

    let kept: Vec<&(f64, String)> = terms.iter().filter(|(coef, _)| coef.abs() > EQUATION_EPS).collect();
    let mut out = String::from("z = ");
    if kept.is_empty() {
        out.push('0');
        return out;
    }
    for (i, (coef, var)) in kept.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{coef:.10}{var}"));
        } else if *coef < 0.0 {
            out.push_str(&format!("\n    - {:.10}{var}", coef.abs()));
        } else {
            out.push_str(&format!("\n    + {coef:.10}{var}"));
        }
    }
    out
}

/// Table of the per-degree error metrics, best degree starred.
pub fn format_sweep(sweep: &DegreeSweep) -> String {
    let mut out = String::new();
    out.push_str("  Degree |          MSE |         RMSE |      Max |e|\n");
    out.push_str("  -------+--------------+--------------+-------------\n");
    for (i, f) in sweep.fits.iter().enumerate() {
        let mark = if i == sweep.best { '*' } else { ' ' };
        out.push_str(&format!(
            "{mark} {:>6} | {:>12.6e} | {:>12.6e} | {:>12.6e}\n",
            f.degree, f.metrics.mse, f.metrics.rmse, f.metrics.max_abs_error
        ));
    }
    let best = sweep.best();
    out.push_str(&format!(
        "Best: degree {} ({}), RMSE={:.6e}\n",
        best.degree,
        best.model.basis().display_name(),
        best.metrics.rmse
    ));
    out
}

/// One line per step: number, point count and mean x.
pub fn format_steps(steps: &[Step]) -> String {
    let mut out = String::new();
    let total: usize = steps.iter().map(|s| s.point_count).sum();
    out.push_str(&format!("Steps: {} | points: {total}\n", steps.len()));
    for s in steps {
        out.push_str(&format!(
            "  step {:>3}: n={:>5}  mean_x={:.4}\n",
            s.step_number, s.point_count, s.mean_x
        ));
    }
    out
}
