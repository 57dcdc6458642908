//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::analysis::CollisionPolicy;
use crate::config::AnalysisConfig;

/// Output format for the analysis summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sweep-correlate")]
#[command(version)]
#[command(
    about = "Correlate GPS error dimensions with optimized Kalman parameters across sweep results",
    long_about = None
)]
pub struct Cli {
    /// Result files to analyse (.json sweeps / section sweeps, .csv time series)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Analysis config (TOML); defaults to $SWEEP_CORRELATE_CONFIG or ./analysis.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum |r| for a correlation to be reported as strong
    #[arg(short, long, value_name = "R")]
    pub threshold: Option<f64>,

    /// Number of strongest correlations to fit models for
    #[arg(short = 'n', long = "top", value_name = "N")]
    pub top_n: Option<usize>,

    /// Models must have R² above this value to predict
    #[arg(long, value_name = "R2")]
    pub min_r_squared: Option<f64>,

    /// How to resolve two models predicting the same parameter
    #[arg(long = "collision", value_enum)]
    pub collision_policy: Option<CollisionPolicy>,

    /// Summary format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the full correlation matrix as CSV
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Predict parameters for the gpsError object in this JSON file
    #[arg(long, value_name = "JSON", conflicts_with = "input")]
    pub predict_from: Option<PathBuf>,

    /// Predict parameters for a GPS error given as name=value (repeatable)
    #[arg(short, long, value_name = "NAME=VALUE")]
    pub input: Vec<String>,
}

impl Cli {
    /// Overlay command-line overrides on a loaded config.
    pub fn apply_overrides(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(min_r_squared) = self.min_r_squared {
            config.min_r_squared = min_r_squared;
        }
        if let Some(policy) = self.collision_policy {
            config.collision_policy = policy;
        }
        config
    }

    pub fn wants_prediction(&self) -> bool {
        self.predict_from.is_some() || !self.input.is_empty()
    }
}
