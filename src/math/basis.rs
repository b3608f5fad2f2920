//! Polynomial and Chebyshev basis helpers.
//!
//! Coefficient order conventions used here:
//!
//! - "ascending": `[c_0, c_1, …, c_d]`, the order the regression solves in
//! - "descending": `[c_d, …, c_0]`, the order stored in 1D models

/// Fill `out[n] = Tₙ(x)` for `n ∈ 0..out.len()` (first kind).
///
/// Recurrence: `T₀ = 1`, `T₁ = x`, `Tₙ = 2x·Tₙ₋₁ − Tₙ₋₂`.
pub fn chebyshev_row(x: f64, out: &mut [f64]) {
    if out.is_empty() {
        return;
    }
    out[0] = 1.0;
    if out.len() > 1 {
        out[1] = x;
    }
    for n in 2..out.len() {
        out[n] = 2.0 * x * out[n - 1] - out[n - 2];
    }
}

/// Single Chebyshev value `Tₙ(x)`.
pub fn chebyshev_t(n: usize, x: f64) -> f64 {
    let mut row = vec![0.0; n + 1];
    chebyshev_row(x, &mut row);
    row[n]
}

/// Horner evaluation of descending coefficients.
pub fn polyval_desc(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Multiply two ascending-order polynomials.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Compose `p(t)` with `t = a·x + b`, returning ascending coefficients in `x`.
///
/// Horner over polynomials: `out ← out·(b + a·x) + c_k` for `k = d..0`.
pub fn compose_affine(coeffs_t: &[f64], a: f64, b: f64) -> Vec<f64> {
    let linear = [b, a];
    let mut out = vec![0.0];
    for &c in coeffs_t.iter().rev() {
        out = poly_mul(&out, &linear);
        out[0] += c;
    }
    out.truncate(coeffs_t.len().max(1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn chebyshev_matches_closed_forms() {
        for &x in &[-1.0, -0.3, 0.0, 0.5, 1.0] {
            assert_abs_diff_eq!(chebyshev_t(0, x), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(chebyshev_t(2, x), 2.0 * x * x - 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(chebyshev_t(3, x), 4.0 * x * x * x - 3.0 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn chebyshev_is_cosine_on_unit_interval() {
        let theta: f64 = 0.7;
        for n in 0..8 {
            assert_abs_diff_eq!(chebyshev_t(n, theta.cos()), (n as f64 * theta).cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn polyval_desc_uses_highest_power_first() {
        // 2x^2 - 3x + 1 at x = 2 -> 3
        assert_abs_diff_eq!(polyval_desc(&[2.0, -3.0, 1.0], 2.0), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(polyval_desc(&[], 5.0), 0.0);
    }

    #[test]
    fn compose_affine_matches_direct_evaluation() {
        // p(t) = 1 + 2t + 3t^2 with t = 0.5x - 1
        let p = [1.0, 2.0, 3.0];
        let q = compose_affine(&p, 0.5, -1.0);
        assert_eq!(q.len(), 3);
        for &x in &[-2.0_f64, 0.0, 1.5, 4.0] {
            let t = 0.5 * x - 1.0;
            let direct = 1.0 + 2.0 * t + 3.0 * t * t;
            let via: f64 = q.iter().enumerate().map(|(k, c)| c * x.powi(k as i32)).sum();
            assert_abs_diff_eq!(direct, via, epsilon = 1e-12);
        }
    }
}
