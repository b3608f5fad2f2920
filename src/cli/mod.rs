//! Command-line parsing for the specimen surface tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the cleaning/fitting/mesh code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Basis, Section};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "spx", version, about = "Specimen point-cloud cleaning, surface fitting and mesh rebuilding")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove IQR outliers from a section-tagged point file.
    Clean(CleanArgs),
    /// Split points into measurement steps along x.
    Steps(StepsArgs),
    /// Clean section-tagged surface files, sweep degrees and report the best fit.
    Fit(FitArgs),
    /// Average left/right profile curves and sweep 1D degrees.
    Curve(CurveArgs),
    /// Subtract a low-degree trend model from a high-degree model.
    Subtract(SubtractArgs),
    /// Fit a point file at two degrees and export the difference model.
    Detrend(DetrendArgs),
    /// Average models fitted on repeated samples.
    Average(AverageArgs),
    /// Evaluate a model over a rectangle or T-shape grid.
    Rebuild(RebuildArgs),
    /// Run the surface pipeline on a synthetic specimen.
    Demo(DemoArgs),
}

/// IQR multipliers shared by `clean` and `fit`.
#[derive(Debug, Args, Clone)]
pub struct FactorArgs {
    /// IQR factor for bottom points.
    #[arg(long, default_value_t = 0.2)]
    pub bottom_factor: f64,

    /// IQR factor for wall points.
    #[arg(long, default_value_t = 1.5)]
    pub wall_factor: f64,

    /// IQR factor for the merged cloud.
    #[arg(long, default_value_t = 2.0)]
    pub merged_factor: f64,
}

/// Regression options shared by `fit`, `curve` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct RegressionArgs {
    /// Highest degree to try (degrees 1..=N are swept).
    #[arg(long, default_value_t = 5)]
    pub max_degree: usize,

    /// Affine-normalize x to [-1, 1] before 1D fits.
    #[arg(long)]
    pub normalize: bool,

    /// Ridge strength for 1D fits (0 = ordinary least squares).
    #[arg(long, default_value_t = 0.0)]
    pub ridge: f64,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Section-tagged point file.
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Section for rows before the first `#bottom`/`#wall` marker.
    #[arg(long, value_enum)]
    pub default_section: Option<Section>,

    #[command(flatten)]
    pub factors: FactorArgs,

    /// Write the kept points as CSV.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StepsArgs {
    /// Point file (section-tagged text, or a curve `.csv`/text file with --curve).
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Read the input as a 2/3-column curve file.
    #[arg(long)]
    pub curve: bool,

    /// Relative x jump (percent) that starts a new step.
    #[arg(long, default_value_t = crate::prep::DEFAULT_STEP_THRESHOLD_PERCENT)]
    pub threshold: f64,

    /// Write the flattened (sorted) points as CSV.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FitArgs {
    /// Section-tagged surface files, one per measurement.
    #[arg(long = "input", value_name = "FILE", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Per-specimen transform rules (JSON keyed by file stem).
    #[arg(long, value_name = "JSON")]
    pub transforms: Option<PathBuf>,

    /// Regression basis.
    #[arg(long, value_enum, default_value_t = Basis::Poly2d)]
    pub basis: Basis,

    #[command(flatten)]
    pub regression: RegressionArgs,

    #[command(flatten)]
    pub factors: FactorArgs,

    /// Export a specific degree instead of the best one.
    #[arg(long)]
    pub degree: Option<usize>,

    /// Export the chosen model to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Export the cleaned point cloud to CSV.
    #[arg(long = "export-points", value_name = "CSV")]
    pub export_points: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CurveArgs {
    /// Left-side profile.
    #[arg(long, value_name = "FILE")]
    pub left: PathBuf,

    /// Right-side profile (averaged pointwise with the left one).
    #[arg(long, value_name = "FILE")]
    pub right: Option<PathBuf>,

    #[command(flatten)]
    pub regression: RegressionArgs,

    /// Export a specific degree instead of the best one.
    #[arg(long)]
    pub degree: Option<usize>,

    /// Export the chosen model to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SubtractArgs {
    /// High-degree (detail) model JSON.
    #[arg(long, value_name = "JSON")]
    pub high: PathBuf,

    /// Low-degree (trend) model JSON.
    #[arg(long, value_name = "JSON")]
    pub low: PathBuf,

    /// Output model JSON.
    #[arg(long, value_name = "JSON")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct DetrendArgs {
    /// Section-tagged point file (cleaned with the IQR factors first).
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Regression basis.
    #[arg(long, value_enum, default_value_t = Basis::Poly2d)]
    pub basis: Basis,

    /// Detail degree.
    #[arg(long)]
    pub high: usize,

    /// Trend degree.
    #[arg(long, default_value_t = 1)]
    pub low: usize,

    /// Affine-normalize x to [-1, 1] before 1D fits.
    #[arg(long)]
    pub normalize: bool,

    /// Ridge strength for 1D fits (0 = ordinary least squares).
    #[arg(long, default_value_t = 0.0)]
    pub ridge: f64,

    #[command(flatten)]
    pub factors: FactorArgs,

    /// Output model JSON.
    #[arg(long, value_name = "JSON")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct AverageArgs {
    /// Model JSON files (same basis and degree).
    #[arg(value_name = "JSON", required = true, num_args = 1..)]
    pub models: Vec<PathBuf>,

    /// Output model JSON.
    #[arg(long, value_name = "JSON")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// Model JSON.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Geometry dimension JSON (rectangle or T-shape).
    #[arg(long, value_name = "JSON")]
    pub geometry: PathBuf,

    /// Grid step in x (and y unless --step-y is given).
    #[arg(long, default_value_t = 0.5)]
    pub step: f64,

    /// Grid step in y.
    #[arg(long)]
    pub step_y: Option<f64>,

    /// Multiply rebuilt z by this factor (unit conversion).
    #[arg(long)]
    pub scale_z: Option<f64>,

    /// Extrude a poly1d profile along y over a rectangle geometry.
    #[arg(long)]
    pub extrude: bool,

    /// Output point cloud CSV.
    #[arg(long, value_name = "CSV")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Points per section.
    #[arg(short = 'n', long, default_value_t = 300)]
    pub count: usize,

    /// Regression basis.
    #[arg(long, value_enum, default_value_t = Basis::Poly2d)]
    pub basis: Basis,

    /// Highest degree to try.
    #[arg(long, default_value_t = 4)]
    pub max_degree: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fit_accepts_several_inputs_and_flags() {
        let cli = Cli::parse_from([
            "spx", "-vv", "fit", "--input", "a.txt", "b.txt", "--basis", "chebyshev", "--max-degree", "3",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.basis, Basis::Chebyshev);
        assert_eq!(args.regression.max_degree, 3);
        assert_eq!(args.factors.bottom_factor, 0.2);
    }

    #[test]
    fn detrend_and_extrude_flags_parse() {
        let cli = Cli::parse_from([
            "spx", "detrend", "--input", "a.txt", "--high", "4", "--output", "d.json",
        ]);
        let Command::Detrend(args) = cli.command else {
            panic!("expected detrend");
        };
        assert_eq!((args.high, args.low), (4, 1));
        assert_eq!(args.basis, Basis::Poly2d);

        let cli = Cli::parse_from([
            "spx", "rebuild", "--model", "m.json", "--geometry", "g.json", "--output", "o.csv", "--extrude",
        ]);
        let Command::Rebuild(args) = cli.command else {
            panic!("expected rebuild");
        };
        assert!(args.extrude);
    }
}
