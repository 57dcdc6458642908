use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::aggregate::extract_input_vector;
use super::model::{Vector, gps_dimension};

/// Errors from parsing a hand-written GPS-error input vector.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("expected name=value, got '{0}'")]
    Malformed(String),
    #[error("unknown GPS error dimension '{0}'")]
    UnknownDimension(String),
    #[error("value for '{name}' is not a finite number: '{value}'")]
    InvalidValue { name: String, value: String },
}

/// Parse `posX=1.5`-style pairs. Only the named dimensions are set, so
/// models on other dimensions are skipped rather than fed zeros.
pub fn parse_input_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Vector, InputError> {
    let mut input = Vector::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| InputError::Malformed(pair.to_string()))?;
        let (name, value) = (name.trim(), value.trim());

        let dim =
            gps_dimension(name).ok_or_else(|| InputError::UnknownDimension(name.to_string()))?;
        let parsed = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            })?;
        input.insert(dim.name.to_string(), parsed);
    }
    Ok(input)
}

/// Read an input vector from a JSON document holding a `gpsError` object
/// (or being one). All 18 dimensions are set, missing ones to 0.
pub fn input_from_json(root: &JsonValue) -> Vector {
    extract_input_vector(root.get("gpsError").or(Some(root)))
}

pub fn load_input_file(path: &Path) -> Result<Vector> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input vector {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing input vector JSON")?;
    Ok(input_from_json(&root))
}
