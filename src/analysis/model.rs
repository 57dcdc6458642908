use std::fmt;

use log::debug;
use serde::Serialize;

use super::matrix::{CorrelationMatrix, CorrelationResult};
use super::stats::linear_regression;

pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// PredictionModel
// ---------------------------------------------------------------------------

/// A fitted single-variable model `parameter ≈ intercept + slope · dimension`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionModel {
    pub input_dimension: String,
    pub output_parameter: String,
    /// Always `"linear"`.
    pub model_type: &'static str,
    /// `[intercept, slope]`.
    pub coefficients: [f64; 2],
    pub r_squared: f64,
}

impl PredictionModel {
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    pub fn slope(&self) -> f64 {
        self.coefficients[1]
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.intercept() + self.slope() * x
    }
}

impl fmt::Display for PredictionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {:.6} + {:.6} × {}  (R² = {:.4})",
            self.output_parameter,
            self.intercept(),
            self.slope(),
            self.input_dimension,
            self.r_squared
        )
    }
}

/// Fit a linear model over the data points retained by a correlation.
pub fn build_model(result: &CorrelationResult) -> PredictionModel {
    let fit = linear_regression(&result.xs(), &result.ys());
    PredictionModel {
        input_dimension: result.dimension.clone(),
        output_parameter: result.parameter.clone(),
        model_type: "linear",
        coefficients: [fit.intercept, fit.slope],
        r_squared: fit.r_squared,
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// All results sorted by descending |r|. The sort is stable, so ties keep
/// the matrix's iteration order.
fn ranked(matrix: &CorrelationMatrix) -> Vec<&CorrelationResult> {
    let mut results: Vec<&CorrelationResult> = matrix.iter().collect();
    results.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    results
}

/// Results with `|r| ≥ threshold`, strongest first.
pub fn find_strongest(matrix: &CorrelationMatrix, threshold: f64) -> Vec<&CorrelationResult> {
    let strongest: Vec<_> = ranked(matrix)
        .into_iter()
        .filter(|r| r.coefficient.abs() >= threshold)
        .collect();
    debug!(
        "{} of {} correlations reach |r| ≥ {threshold}",
        strongest.len(),
        matrix.len()
    );
    strongest
}

/// Fit models for the `top_n` strongest correlations, strongest first.
pub fn top_models(matrix: &CorrelationMatrix, top_n: usize) -> Vec<PredictionModel> {
    ranked(matrix)
        .into_iter()
        .take(top_n)
        .map(build_model)
        .collect()
}
