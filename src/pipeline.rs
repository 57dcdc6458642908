use std::collections::BTreeMap;

use log::info;

use crate::analysis::{
    CorrelationMatrix, CorrelationResult, PredictionModel, find_strongest, top_models,
};
use crate::config::AnalysisConfig;
use crate::data::aggregate::aggregate;
use crate::data::model::{FileKind, LoadedFile, Observation, Vector};

// ---------------------------------------------------------------------------
// AnalysisRun – everything computed from one batch of files
// ---------------------------------------------------------------------------

/// Result of running the full pipeline over a set of loaded files.
/// Built once and only read afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub config: AnalysisConfig,
    /// How many files of each kind were supplied.
    pub file_counts: BTreeMap<FileKind, usize>,
    pub observations: Vec<Observation>,
    pub matrix: CorrelationMatrix,
    /// Correlations with |r| ≥ `config.threshold`, strongest first.
    pub strongest: Vec<CorrelationResult>,
    /// Models for the `config.top_n` strongest correlations.
    pub models: Vec<PredictionModel>,
}

impl AnalysisRun {
    pub fn new(files: &[LoadedFile], config: AnalysisConfig) -> Self {
        let mut file_counts = BTreeMap::new();
        for file in files {
            *file_counts.entry(file.kind()).or_insert(0) += 1;
        }

        let observations = aggregate(files);
        let matrix = CorrelationMatrix::build(&observations);
        let strongest: Vec<CorrelationResult> = find_strongest(&matrix, config.threshold)
            .into_iter()
            .cloned()
            .collect();
        let models = top_models(&matrix, config.top_n);

        info!(
            "Analysed {} observations: {} pairs, {} strong, {} models",
            observations.len(),
            matrix.len(),
            strongest.len(),
            models.len()
        );

        Self {
            config,
            file_counts,
            observations,
            matrix,
            strongest,
            models,
        }
    }

    /// Number of files that contributed observations.
    pub fn sweep_file_count(&self) -> usize {
        [FileKind::SweepSummary, FileKind::SectionSweep]
            .iter()
            .filter_map(|k| self.file_counts.get(k))
            .sum()
    }

    /// Predict outputs for a new input with the configured gate and policy.
    pub fn predict(&self, input: &Vector) -> BTreeMap<String, f64> {
        self.config.predictor().predict(input, &self.models)
    }
}
