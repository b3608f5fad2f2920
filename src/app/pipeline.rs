//! Shared pipeline logic used by the `fit`, `curve` and `demo` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! section-aware cleaning -> merge -> global clean -> degree sweep
//!
//! The command handlers can then focus on loading inputs and presenting results.

use crate::domain::{Basis, PipelineConfig, Point, Section};
use crate::error::AppError;
use crate::fit::{sweep_degrees, DegreeSweep, FitOptions};
use crate::prep::{filter_iqr, z_factor};

/// One measurement of a specimen (usually one input file).
#[derive(Debug, Clone)]
pub struct Measurement {
    pub id: String,
    pub points: Vec<Point>,
}

/// Point counts through the cleaning stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub raw: usize,
    pub after_sections: usize,
    pub after_merged: usize,
}

/// All computed outputs of a surface run.
#[derive(Debug, Clone)]
pub struct SurfaceRun {
    pub cleaned: Vec<Point>,
    pub stats: CleanStats,
    pub sweep: DegreeSweep,
}

/// All computed outputs of a curve run.
#[derive(Debug, Clone)]
pub struct CurveRun {
    pub profile: Vec<Point>,
    pub sweep: DegreeSweep,
}

impl PipelineConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            normalize_x: self.normalize_x,
            ridge_alpha: self.ridge_alpha,
        }
    }
}

/// Filter bottom and wall points of each measurement separately, merge
/// everything, apply the light global pass and sweep degrees.
pub fn run_surface(measurements: &[Measurement], config: &PipelineConfig) -> Result<SurfaceRun, AppError> {
    let mut stats = CleanStats::default();
    let mut merged = Vec::new();

    for m in measurements {
        let kept = clean_sections(&m.points, config)?;
        tracing::info!(
            measurement = %m.id,
            raw = m.points.len(),
            kept = kept.len(),
            "section filter"
        );
        stats.raw += m.points.len();
        stats.after_sections += kept.len();
        merged.extend(kept);
    }

    let cleaned = filter_iqr(&merged, &z_factor(config.factors.merged))?;
    stats.after_merged = cleaned.len();
    if cleaned.is_empty() {
        return Err(AppError::validation("run_surface: no points left after cleaning"));
    }
    if stats.after_merged < stats.raw {
        tracing::info!(removed = stats.raw - stats.after_merged, "outliers removed");
    }

    let sweep = sweep_degrees(&cleaned, config.basis, config.max_degree, &config.fit_options())?;
    tracing::info!(
        basis = config.basis.display_name(),
        degree = sweep.best().degree,
        rmse = sweep.best().metrics.rmse,
        "best surface fit"
    );
    Ok(SurfaceRun { cleaned, stats, sweep })
}

/// Bottom and wall points get their own z factor. Untagged points are only
/// cleaned by the merged pass.
pub fn clean_sections(points: &[Point], config: &PipelineConfig) -> Result<Vec<Point>, AppError> {
    let pick = |s: Option<Section>| -> Vec<Point> { points.iter().filter(|p| p.section == s).copied().collect() };

    let mut out = filter_iqr(&pick(Some(Section::Bottom)), &z_factor(config.factors.bottom))?;
    out.extend(filter_iqr(&pick(Some(Section::Wall)), &z_factor(config.factors.wall))?);
    out.extend(pick(None));
    Ok(out)
}

/// Average left/right profiles pointwise (when both are given) and sweep 1D
/// degrees.
pub fn run_curve(left: &[Point], right: Option<&[Point]>, config: &PipelineConfig) -> Result<CurveRun, AppError> {
    let profile = match right {
        Some(right) => average_profiles(left, right)?,
        None => left.to_vec(),
    };
    if profile.is_empty() {
        return Err(AppError::validation("run_curve: empty profile"));
    }
    let sweep = sweep_degrees(&profile, Basis::Poly1d, config.max_degree, &config.fit_options())?;
    tracing::info!(
        degree = sweep.best().degree,
        rmse = sweep.best().metrics.rmse,
        "best curve fit"
    );
    Ok(CurveRun { profile, sweep })
}

/// Pointwise mean of two profiles sampled at the same positions.
pub fn average_profiles(left: &[Point], right: &[Point]) -> Result<Vec<Point>, AppError> {
    if left.len() != right.len() {
        return Err(AppError::validation(format!(
            "average_profiles: shape mismatch (left {} points, right {})",
            left.len(),
            right.len()
        )));
    }
    Ok(left
        .iter()
        .zip(right)
        .map(|(a, b)| Point::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y), 0.5 * (a.z + b.z)))
        .collect())
}
