//! Synthetic specimen point clouds.
//!
//! Points are drawn from a known "truth" model, with Gaussian measurement
//! noise and occasional stylus spikes (outliers) so the cleaning, segmentation
//! and fitting stages can be exercised without real measurement files.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FitModel, Point, Section};
use crate::error::AppError;

/// How sample positions are laid out in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleLayout {
    /// Uniform over the x/y ranges.
    Scattered,
    /// `passes` stylus passes at evenly spaced x, each sweeping y with a tiny
    /// x drift (the shape the step segmenter expects).
    Passes { passes: usize },
}

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Standard deviation of the additive z noise.
    pub noise_sigma: f64,
    /// Probability that a point gets a spike.
    pub outlier_prob: f64,
    /// Spike magnitude (absolute z units, random sign).
    pub outlier_k: f64,
    pub layout: SampleLayout,
    pub section: Option<Section>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            seed: 42,
            x_range: (0.0, 40.0),
            y_range: (0.0, 5.0),
            noise_sigma: 1e-3,
            outlier_prob: 0.03,
            outlier_k: 0.5,
            layout: SampleLayout::Scattered,
            section: None,
        }
    }
}

/// Draw `cfg.count` points from `truth`.
pub fn generate_surface(truth: &FitModel, cfg: &SampleConfig) -> Result<Vec<Point>, AppError> {
    if cfg.count == 0 {
        return Err(AppError::validation("Sample count must be > 0."));
    }
    let valid_range = |(lo, hi): (f64, f64)| lo.is_finite() && hi.is_finite() && hi >= lo;
    if !valid_range(cfg.x_range) || !valid_range(cfg.y_range) {
        return Err(AppError::validation("Invalid x/y range for sample generation."));
    }
    if !(0.0..1.0).contains(&cfg.outlier_prob) {
        return Err(AppError::validation("Outlier probability must be in [0, 1)."));
    }
    if !(cfg.outlier_k.is_finite() && cfg.outlier_k >= 0.0) {
        return Err(AppError::validation("Invalid outlier magnitude."));
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let noise = Normal::new(0.0, cfg.noise_sigma)
        .map_err(|e| AppError::validation(format!("Noise distribution error: {e}")))?;

    let positions = match cfg.layout {
        SampleLayout::Scattered => scattered(&mut rng, cfg),
        SampleLayout::Passes { passes } => passes_layout(&mut rng, cfg, passes)?,
    };

    let mut points = Vec::with_capacity(positions.len());
    for (x, y) in positions {
        let mut z = truth.evaluate(x, y) + noise.sample(&mut rng);
        z += sample_spike(&mut rng, cfg.outlier_prob, cfg.outlier_k);
        let mut p = Point::new(x, y, z);
        p.section = cfg.section;
        points.push(p);
    }
    Ok(points)
}

fn scattered(rng: &mut StdRng, cfg: &SampleConfig) -> Vec<(f64, f64)> {
    (0..cfg.count)
        .map(|_| (uniform(rng, cfg.x_range), uniform(rng, cfg.y_range)))
        .collect()
}

fn passes_layout(rng: &mut StdRng, cfg: &SampleConfig, passes: usize) -> Result<Vec<(f64, f64)>, AppError> {
    if passes == 0 || passes > cfg.count {
        return Err(AppError::validation(format!(
            "Pass count must be in 1..={}, got {passes}.",
            cfg.count
        )));
    }
    let (x0, x1) = cfg.x_range;
    let spacing = if passes > 1 { (x1 - x0) / (passes - 1) as f64 } else { 0.0 };
    // Drift stays far below the gap between passes.
    let drift = spacing * 1e-4;

    let mut out = Vec::with_capacity(cfg.count);
    for i in 0..cfg.count {
        let pass = i * passes / cfg.count;
        let x = x0 + pass as f64 * spacing + rng.gen_range(0.0..=1.0) * drift;
        out.push((x, uniform(rng, cfg.y_range)));
    }
    Ok(out)
}

fn uniform(rng: &mut StdRng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

fn sample_spike(rng: &mut StdRng, p: f64, k: f64) -> f64 {
    let roll: f64 = rng.gen_range(0.0..1.0);
    if roll >= p {
        return 0.0;
    }
    if rng.gen_bool(0.5) { k } else { -k }
}
