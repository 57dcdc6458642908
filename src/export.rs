use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{CorrelationMatrix, PredictionModel};

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

pub const MATRIX_CSV_HEADER: [&str; 3] =
    ["GPS Error Dimension", "Parameter", "Correlation Coefficient"];

/// One row per (dimension, parameter), coefficient to 4 decimals.
pub fn matrix_to_csv(matrix: &CorrelationMatrix) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(MATRIX_CSV_HEADER)?;
    for result in matrix.iter() {
        let coefficient = format!("{:.4}", result.coefficient);
        writer.write_record([
            result.dimension.as_str(),
            result.parameter.as_str(),
            coefficient.as_str(),
        ])?;
    }
    into_string(writer)
}

pub fn write_matrix_csv(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let text = matrix_to_csv(matrix)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Predictions and models
// ---------------------------------------------------------------------------

pub fn predictions_to_json(predictions: &BTreeMap<String, f64>) -> Result<String> {
    serde_json::to_string_pretty(predictions).context("serializing predictions")
}

pub fn predictions_to_csv(predictions: &BTreeMap<String, f64>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Parameter", "Predicted Value"])?;
    for (parameter, value) in predictions {
        let value = value.to_string();
        writer.write_record([parameter.as_str(), value.as_str()])?;
    }
    into_string(writer)
}

pub fn models_to_json(models: &[PredictionModel]) -> Result<String> {
    serde_json::to_string_pretty(models).context("serializing models")
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
