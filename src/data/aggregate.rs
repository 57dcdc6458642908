use log::debug;
use serde_json::Value as JsonValue;

use super::model::{
    GPS_DIMENSIONS, LEGACY_COMBINED_AXIS, LoadedFile, Observation, PARAMETER_AXES,
    PARAMETER_FAMILIES, Vector,
};

// ---------------------------------------------------------------------------
// Aggregation: loaded files → observations
// ---------------------------------------------------------------------------

/// Flatten sweep and section-sweep files into one ordered observation list.
///
/// * Sweep summary → one observation per entry of `results`,
///   labelled `<file> - Run <n>` (1-based).
/// * Section sweep → one observation per entry of `sections`,
///   labelled `<file> - <section name>`.
/// * Every other kind is ignored.
pub fn aggregate(files: &[LoadedFile]) -> Vec<Observation> {
    let mut observations = Vec::new();

    for file in files {
        match file {
            LoadedFile::SweepSummary { name, root } => {
                let input = extract_input_vector(root.get("gpsError"));
                let runs = root.get("results").and_then(JsonValue::as_array);
                for (i, run) in runs.into_iter().flatten().enumerate() {
                    observations.push(Observation {
                        input: input.clone(),
                        output: extract_output_vector(run),
                        label: format!("{name} - Run {}", i + 1),
                    });
                }
            }
            LoadedFile::SectionSweep { name, root } => {
                let sections = root.get("sections").and_then(JsonValue::as_array);
                for (i, section) in sections.into_iter().flatten().enumerate() {
                    let section_name = section
                        .get("name")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Section {}", i + 1));
                    let output = section
                        .get("bestResult")
                        .map(extract_output_vector)
                        .unwrap_or_default();
                    observations.push(Observation {
                        input: extract_input_vector(section.get("gpsError")),
                        output,
                        label: format!("{name} - {section_name}"),
                    });
                }
            }
            other => debug!("Not aggregating {} ({})", other.name(), other.kind()),
        }
    }

    debug!(
        "Aggregated {} observations from {} files",
        observations.len(),
        files.len()
    );
    observations
}

// ---------------------------------------------------------------------------
// Vector extraction
// ---------------------------------------------------------------------------

/// Read the 18 GPS-error dimensions from a `gpsError` object.
/// Missing or non-numeric fields default to 0.
pub fn extract_input_vector(gps_error: Option<&JsonValue>) -> Vector {
    GPS_DIMENSIONS
        .iter()
        .map(|dim| {
            let value = gps_error
                .and_then(|g| g.get(dim.group_key()))
                .and_then(|group| group.get(dim.axis))
                .and_then(JsonValue::as_f64)
                .unwrap_or(0.0);
            (dim.name.to_string(), value)
        })
        .collect()
}

/// Read the Kalman tuning parameters from one result object.
///
/// A legacy combined `XZ` value is expanded into the X and Z entries first;
/// per-axis values are applied afterwards and therefore take precedence.
pub fn extract_output_vector(result: &JsonValue) -> Vector {
    let mut output = Vector::new();

    for family in PARAMETER_FAMILIES {
        let combined = format!("{family}{LEGACY_COMBINED_AXIS}");
        if let Some(v) = result.get(&combined).and_then(JsonValue::as_f64) {
            output.insert(format!("{family}X"), v);
            output.insert(format!("{family}Z"), v);
        }

        for axis in PARAMETER_AXES {
            let key = format!("{family}{axis}");
            if let Some(v) = result.get(&key).and_then(JsonValue::as_f64) {
                output.insert(key, v);
            }
        }
    }

    output
}
