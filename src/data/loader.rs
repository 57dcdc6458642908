use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde_json::Value as JsonValue;

use super::model::{LoadedFile, TimeSeries};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one result file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – sweep summary, section sweep, or plain optimizer metadata
/// * `.csv`  – time series with a header row of column names
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = display_name(path);
    let loaded = match ext.as_str() {
        "json" => load_json(path, name)?,
        "csv" => load_csv(path, name)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    info!("Loaded {} as {}", loaded.name(), loaded.kind());
    Ok(loaded)
}

/// Load several files, skipping (and logging) those that fail so one bad
/// file does not abort the whole batch.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Vec<LoadedFile> {
    paths
        .iter()
        .filter_map(|p| {
            let path = p.as_ref();
            match load_file(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    warn!("Skipping {}: {e:#}", path.display());
                    None
                }
            }
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Recognised JSON shapes:
///
/// ```json
/// { "gpsError": { ... }, "results": [ { "rPosX": 0.1, ... }, ... ], "bestResult": { ... } }
/// { "sections": [ { "name": "0-60s", "gpsError": { ... }, "bestResult": { ... } }, ... ] }
/// ```
///
/// Any other object is kept as metadata.
fn load_json(path: &Path, name: String) -> Result<LoadedFile> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    classify_json(name, root)
}

/// Tag a parsed JSON document by the top-level keys it carries.
pub fn classify_json(name: String, root: JsonValue) -> Result<LoadedFile> {
    let obj = root
        .as_object()
        .context("Expected top-level JSON object")?;

    if obj.get("sections").is_some_and(JsonValue::is_array) {
        Ok(LoadedFile::SectionSweep { name, root })
    } else if obj.get("results").is_some_and(JsonValue::is_array) {
        Ok(LoadedFile::SweepSummary { name, root })
    } else {
        Ok(LoadedFile::Metadata { name, root })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, numeric cells below.
/// Empty or non-numeric cells become NaN rather than failing the file.
fn load_csv(path: &Path, name: String) -> Result<LoadedFile> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.is_empty() {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(LoadedFile::TimeSeries {
        name,
        series: TimeSeries { columns, rows },
    })
}

fn parse_cell(s: &str) -> f64 {
    s.parse::<f64>().unwrap_or(f64::NAN)
}
