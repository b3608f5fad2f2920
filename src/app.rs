//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - loads inputs and runs the requested stage
//! - prints reports and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    AverageArgs, CleanArgs, Cli, Command, CurveArgs, DemoArgs, DetrendArgs, FactorArgs, FitArgs, RebuildArgs, RegressionArgs,
    StepsArgs, SubtractArgs,
};
use crate::domain::{Basis, FitModel, GeometrySpec, GridStep, PipelineConfig, Point, Section, SectionFactors};
use crate::error::AppError;
use crate::fit::{DegreeSweep, FitOptions};
use crate::io::{ModelFile, load_curve, load_geometry, load_points, load_transform_rules, read_model_json};

pub mod pipeline;

use pipeline::Measurement;

/// Entry point for the `spx` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Steps(args) => handle_steps(args),
        Command::Fit(args) => handle_fit(args),
        Command::Curve(args) => handle_curve(args),
        Command::Subtract(args) => handle_subtract(args),
        Command::Detrend(args) => handle_detrend(args),
        Command::Average(args) => handle_average(args),
        Command::Rebuild(args) => handle_rebuild(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, quiet, env.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` (possibly from `.env`) wins when it parses; otherwise `-v`/`-q`.
fn log_filter(verbose: u8, quiet: bool, env: Option<&str>) -> EnvFilter {
    if let Some(filter) = env.filter(|d| !d.trim().is_empty()).and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    EnvFilter::default().add_directive(level.into())
}

fn handle_clean(args: CleanArgs) -> Result<(), AppError> {
    let ingest = load_points(&args.input, args.default_section)?;
    let kept = clean_cloud(&ingest.points, section_factors_from_args(&args.factors))?;

    println!("Input: {}", args.input.display());
    println!(
        "Points: raw={} | bottom={} | wall={} | kept={}",
        ingest.points.len(),
        ingest.section(Section::Bottom).len(),
        ingest.section(Section::Wall).len(),
        kept.len()
    );
    if !ingest.row_errors.is_empty() {
        println!("Skipped rows: {} of {} lines", ingest.row_errors.len(), ingest.lines_read);
    }
    if let Some(path) = &args.output {
        crate::io::write_points_csv(path, &kept)?;
    }
    Ok(())
}

fn handle_steps(args: StepsArgs) -> Result<(), AppError> {
    let points = if args.curve {
        load_curve(&args.input)?
    } else {
        load_points(&args.input, None)?.points
    };
    let steps = crate::prep::find_steps(&points, args.threshold);
    print!("{}", crate::report::format_steps(&steps));
    if let Some(path) = &args.output {
        crate::io::write_points_csv(path, &crate::prep::flatten_steps(&steps))?;
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = surface_config_from_args(&args);
    let rules = match &args.transforms {
        Some(path) => Some(load_transform_rules(path)?),
        None => None,
    };

    let mut measurements = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let id = file_id(path);
        let mut points = load_points(path, None)?.points;
        if let Some(rules) = &rules {
            points = rules.apply(&id, &points);
        }
        measurements.push(Measurement { id, points });
    }

    let run = pipeline::run_surface(&measurements, &config)?;
    println!(
        "Points: raw={} | after sections={} | after merged={}",
        run.stats.raw, run.stats.after_sections, run.stats.after_merged
    );
    print!("{}", crate::report::format_sweep(&run.sweep));
    let source = args
        .inputs
        .iter()
        .map(|p| file_id(p))
        .collect::<Vec<_>>()
        .join("+");
    finish_sweep(&run.sweep, args.degree, &source, args.export_model.as_deref())?;

    if let Some(path) = &args.export_points {
        crate::io::write_points_csv(path, &run.cleaned)?;
    }
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let config = curve_config_from_args(&args.regression);
    let left = load_curve(&args.left)?;
    let right = match &args.right {
        Some(path) => Some(load_curve(path)?),
        None => None,
    };
    let run = pipeline::run_curve(&left, right.as_deref(), &config)?;
    print!("{}", crate::report::format_sweep(&run.sweep));
    finish_sweep(&run.sweep, args.degree, &file_id(&args.left), args.export_model.as_deref())
}

fn handle_subtract(args: SubtractArgs) -> Result<(), AppError> {
    let high = read_model_json(&args.high)?;
    let low = read_model_json(&args.low)?;
    let diff = crate::algebra::subtract(&high.model, &low.model)?;
    println!("{}", crate::report::format_equation(&diff));
    let source = format!("subtract({}, {})", high.source, low.source);
    crate::io::write_model_json(&args.output, &ModelFile::new(source, diff, None))
}

fn handle_detrend(args: DetrendArgs) -> Result<(), AppError> {
    let ingest = load_points(&args.input, None)?;
    let kept = clean_cloud(&ingest.points, section_factors_from_args(&args.factors))?;
    let opts = FitOptions {
        normalize_x: args.normalize,
        ridge_alpha: args.ridge,
    };
    let detail = crate::algebra::detrend(&kept, args.basis, args.high, args.low, &opts)?;
    tracing::info!(points = kept.len(), high = args.high, low = args.low, "detrended");
    println!("{}", crate::report::format_equation(&detail));
    let source = format!("detrend({}, {} - {})", file_id(&args.input), args.high, args.low);
    crate::io::write_model_json(&args.output, &ModelFile::new(source, detail, None))
}

fn handle_average(args: AverageArgs) -> Result<(), AppError> {
    let mut models = Vec::with_capacity(args.models.len());
    let mut sources = Vec::with_capacity(args.models.len());
    for path in &args.models {
        let file = read_model_json(path)?;
        sources.push(file.source);
        models.push(file.model);
    }
    let avg = crate::algebra::average(&models)?;
    tracing::info!(inputs = models.len(), "averaged models");
    println!("{}", crate::report::format_equation(&avg));
    let source = format!("average({})", sources.join(", "));
    crate::io::write_model_json(&args.output, &ModelFile::new(source, avg, None))
}

fn handle_rebuild(args: RebuildArgs) -> Result<(), AppError> {
    let file = read_model_json(&args.model)?;
    let geometry = load_geometry(&args.geometry)?;
    let step = GridStep {
        dx: args.step,
        dy: args.step_y.unwrap_or(args.step),
    };
    let mut cloud = rebuild_cloud(&file.model, &geometry, step, args.extrude)?;
    if let Some(factor) = args.scale_z {
        cloud = crate::mesh::scale_z(&cloud, factor);
    }
    tracing::info!(points = cloud.len(), "rebuilt point cloud");
    println!("Rebuilt {} points from {}", cloud.len(), file.source);
    crate::io::write_points_csv(&args.output, &cloud)
}

/// Section pass followed by the merged pass.
fn clean_cloud(points: &[Point], factors: SectionFactors) -> Result<Vec<Point>, AppError> {
    let config = PipelineConfig {
        factors,
        ..PipelineConfig::default()
    };
    let sectioned = pipeline::clean_sections(points, &config)?;
    crate::prep::filter_iqr(&sectioned, &crate::prep::z_factor(factors.merged))
}

fn rebuild_cloud(
    model: &FitModel,
    geometry: &GeometrySpec,
    step: GridStep,
    extrude: bool,
) -> Result<Vec<Point>, AppError> {
    if !extrude {
        return crate::mesh::rebuild(model, geometry, step);
    }
    match geometry {
        GeometrySpec::Rectangle { width, height } => {
            crate::mesh::rebuild_curve_extrusion(model, *width, *height, step)
        }
        GeometrySpec::TShape(_) => Err(AppError::validation(
            "rebuild: --extrude needs a rectangle geometry",
        )),
    }
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let truth = demo_truth(args.basis)?;
    let mut points = Vec::new();
    for (i, section) in [Section::Bottom, Section::Wall].into_iter().enumerate() {
        let cfg = crate::data::SampleConfig {
            count: args.count,
            seed: args.seed.wrapping_add(i as u64),
            section: Some(section),
            ..crate::data::SampleConfig::default()
        };
        points.extend(crate::data::generate_surface(&truth, &cfg)?);
    }
    let config = PipelineConfig {
        basis: args.basis,
        max_degree: args.max_degree,
        ..PipelineConfig::default()
    };
    let measurement = Measurement {
        id: format!("demo-{}", args.seed),
        points,
    };
    let run = pipeline::run_surface(std::slice::from_ref(&measurement), &config)?;
    println!("Truth:\n{}\n", crate::report::format_equation(&truth));
    print!("{}", crate::report::format_sweep(&run.sweep));
    println!("{}", crate::report::format_equation(&run.sweep.best().model));
    Ok(())
}

fn demo_truth(basis: Basis) -> Result<FitModel, AppError> {
    match basis {
        Basis::Poly1d => FitModel::poly_1d(2, vec![-0.0005, 0.01, 1.0], None),
        Basis::Poly2d => FitModel::poly_2d(2, vec![0.01, -0.02, -0.0005, 0.001, 1.0]),
        Basis::Chebyshev => FitModel::chebyshev_2d(
            1,
            vec![1.0, 0.02, 0.05, -0.01],
            crate::domain::DomainBox {
                x_min: 0.0,
                x_max: 40.0,
                y_min: 0.0,
                y_max: 5.0,
            },
        ),
    }
}

/// Print the chosen model and optionally export it.
fn finish_sweep(
    sweep: &DegreeSweep,
    degree: Option<usize>,
    source: &str,
    export: Option<&Path>,
) -> Result<(), AppError> {
    let chosen = match degree {
        Some(d) => sweep.fits.iter().find(|f| f.degree == d).ok_or_else(|| {
            AppError::validation(format!("Degree {d} was not fitted (swept 1..={}).", sweep.fits.len()))
        })?,
        None => sweep.best(),
    };
    println!("\n{}", crate::report::format_equation(&chosen.model));
    if let Some(path) = export {
        let file = ModelFile::new(source, chosen.model.clone(), Some(chosen.metrics));
        crate::io::write_model_json(path, &file)?;
        tracing::info!(path = %path.display(), degree = chosen.degree, "model exported");
    }
    Ok(())
}

fn file_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn section_factors_from_args(args: &FactorArgs) -> SectionFactors {
    SectionFactors {
        bottom: args.bottom_factor,
        wall: args.wall_factor,
        merged: args.merged_factor,
    }
}

pub fn surface_config_from_args(args: &FitArgs) -> PipelineConfig {
    PipelineConfig {
        basis: args.basis,
        max_degree: args.regression.max_degree,
        factors: section_factors_from_args(&args.factors),
        normalize_x: args.regression.normalize,
        ridge_alpha: args.regression.ridge,
    }
}

pub fn curve_config_from_args(args: &RegressionArgs) -> PipelineConfig {
    PipelineConfig {
        basis: Basis::Poly1d,
        max_degree: args.max_degree,
        normalize_x: args.normalize,
        ridge_alpha: args.ridge,
        ..PipelineConfig::default()
    }
}
