use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::PredictionModel;
use crate::pipeline::AnalysisRun;

// ---------------------------------------------------------------------------
// Text summary
// ---------------------------------------------------------------------------

/// Human-readable summary of an analysis run, with optional predictions.
pub fn text_summary(run: &AnalysisRun, predictions: Option<&BTreeMap<String, f64>>) -> String {
    let mut out = String::new();

    let files: Vec<String> = run
        .file_counts
        .iter()
        .map(|(kind, n)| format!("{n} {kind}"))
        .collect();
    let files = if files.is_empty() {
        "none".to_string()
    } else {
        files.join(", ")
    };
    let _ = writeln!(out, "Files: {files}");
    let _ = writeln!(
        out,
        "Observations: {}  ({} dimensions × {} parameters)",
        run.observations.len(),
        run.matrix.dimensions().count(),
        run.matrix.parameters().count()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Strong correlations (|r| ≥ {}):", run.config.threshold);
    if run.strongest.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for r in &run.strongest {
        let _ = writeln!(
            out,
            "  {:<10} ↔ {:<15} r = {:>7.4}  n = {}",
            r.dimension,
            r.parameter,
            r.coefficient,
            r.data_points.len()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Top {} models:", run.config.top_n);
    if run.models.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for model in &run.models {
        let _ = writeln!(out, "  {model}");
    }

    if let Some(predictions) = predictions {
        let _ = writeln!(out);
        let _ = writeln!(out, "Predictions (R² > {}):", run.config.min_r_squared);
        if predictions.is_empty() {
            let _ = writeln!(out, "  (no model passed the quality gate)");
        }
        for (parameter, value) in predictions {
            let _ = writeln!(out, "  {parameter:<15} {value:.6}");
        }
    }

    out
}

// ---------------------------------------------------------------------------
// JSON summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StrongCorrelation<'a> {
    dimension: &'a str,
    parameter: &'a str,
    coefficient: f64,
    sample_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    observation_count: usize,
    strongest: Vec<StrongCorrelation<'a>>,
    models: &'a [PredictionModel],
    #[serde(skip_serializing_if = "Option::is_none")]
    predictions: Option<&'a BTreeMap<String, f64>>,
}

/// Machine-readable summary. Data points are left out; use the matrix CSV
/// export for the full coefficient table.
pub fn json_summary(
    run: &AnalysisRun,
    predictions: Option<&BTreeMap<String, f64>>,
) -> Result<String> {
    let summary = JsonSummary {
        observation_count: run.observations.len(),
        strongest: run
            .strongest
            .iter()
            .map(|r| StrongCorrelation {
                dimension: &r.dimension,
                parameter: &r.parameter,
                coefficient: r.coefficient,
                sample_count: r.data_points.len(),
            })
            .collect(),
        models: &run.models,
        predictions,
    };
    serde_json::to_string_pretty(&summary).context("serializing summary")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::data::model::LoadedFile;
    use serde_json::json;

    fn run() -> AnalysisRun {
        let files = vec![LoadedFile::SweepSummary {
            name: "s.json".into(),
            root: json!({
                "gpsError": { "velocity": { "y": 1.0 } },
                "results": [ { "qVelocityY": 1.0 }, { "qVelocityY": 2.0 } ]
            }),
        }];
        AnalysisRun::new(&files, AnalysisConfig::default())
    }

    #[test]
    fn text_summary_mentions_counts() {
        let text = text_summary(&run(), None);
        assert!(text.contains("Files: 1 sweep summary"));
        assert!(text.contains("Observations: 2"));
        // Input is constant across runs, so nothing correlates.
        assert!(text.contains("(none)"));
        assert!(!text.contains("Predictions"));
    }

    #[test]
    fn text_summary_with_empty_predictions() {
        let text = text_summary(&run(), Some(&BTreeMap::new()));
        assert!(text.contains("no model passed the quality gate"));
    }

    #[test]
    fn json_summary_shape() {
        let predictions: BTreeMap<String, f64> =
            [("rPosX".to_string(), 1.0)].into_iter().collect();
        let text = json_summary(&run(), Some(&predictions)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["observationCount"], 2);
        assert!(value["strongest"].as_array().unwrap().is_empty());
        assert_eq!(value["predictions"]["rPosX"], 1.0);

        let without = json_summary(&run(), None).unwrap();
        assert!(!without.contains("predictions"));
    }
}
