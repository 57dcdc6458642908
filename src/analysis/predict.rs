use std::collections::BTreeMap;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use super::model::PredictionModel;
use crate::data::model::Vector;

/// Models at or below this R² are not used for prediction.
pub const DEFAULT_MIN_R_SQUARED: f64 = 0.3;

/// What to do when two usable models predict the same parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the prediction from the model with the higher R².
    #[default]
    HighestRSquared,
    /// Keep whichever model comes last in the model list.
    LastWins,
}

/// Prediction settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predictor {
    pub min_r_squared: f64,
    pub collision: CollisionPolicy,
}

impl Default for Predictor {
    fn default() -> Self {
        Self {
            min_r_squared: DEFAULT_MIN_R_SQUARED,
            collision: CollisionPolicy::default(),
        }
    }
}

impl Predictor {
    /// Apply `models` to a new GPS-error input vector.
    ///
    /// A model contributes only if its dimension is present in `input`, its
    /// R² is finite and strictly above `min_r_squared`, and the result is
    /// finite.
    pub fn predict(&self, input: &Vector, models: &[PredictionModel]) -> BTreeMap<String, f64> {
        // parameter → (prediction, r²)
        let mut chosen: BTreeMap<String, (f64, f64)> = BTreeMap::new();

        for model in models {
            let Some(&x) = input.get(&model.input_dimension) else {
                continue;
            };
            if !model.r_squared.is_finite() || model.r_squared <= self.min_r_squared {
                continue;
            }
            let predicted = model.evaluate(x);
            if !predicted.is_finite() {
                continue;
            }

            let replace = match (self.collision, chosen.get(&model.output_parameter)) {
                (_, None) => true,
                (CollisionPolicy::LastWins, Some(_)) => true,
                (CollisionPolicy::HighestRSquared, Some(&(_, best))) => model.r_squared > best,
            };
            if replace {
                chosen.insert(model.output_parameter.clone(), (predicted, model.r_squared));
            }
        }

        debug!(
            "Predicted {} parameters from {} models",
            chosen.len(),
            models.len()
        );
        chosen.into_iter().map(|(k, (v, _))| (k, v)).collect()
    }
}

/// [`Predictor::predict`] with the default gate and collision policy.
pub fn predict(input: &Vector, models: &[PredictionModel]) -> BTreeMap<String, f64> {
    Predictor::default().predict(input, models)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(
        dim: &str,
        param: &str,
        intercept: f64,
        slope: f64,
        r_squared: f64,
    ) -> PredictionModel {
        PredictionModel {
            input_dimension: dim.into(),
            output_parameter: param.into(),
            model_type: "linear",
            coefficients: [intercept, slope],
            r_squared,
        }
    }

    fn input(pairs: &[(&str, f64)]) -> Vector {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn applies_line_when_quality_is_sufficient() {
        let out = predict(&input(&[("d1", 3.0)]), &[model("d1", "p1", 1.0, 2.0, 0.31)]);
        assert_eq!(out.get("p1"), Some(&7.0));
    }

    #[test]
    fn drops_low_quality_models() {
        let models = [
            model("d1", "p1", 0.0, 1.0, 0.3),
            model("d1", "p2", 0.0, 1.0, 0.1),
            model("d1", "p3", 0.0, 1.0, f64::NAN),
        ];
        assert!(predict(&input(&[("d1", 1.0)]), &models).is_empty());
    }

    #[test]
    fn skips_dimensions_missing_from_input() {
        let models = [model("d9", "p1", 0.0, 1.0, 0.9), model("d1", "p2", 0.0, 1.0, 0.9)];
        let out = predict(&input(&[("d1", 4.0)]), &models);
        assert_eq!(out.len(), 1);
        assert_eq!(out["p2"], 4.0);
    }

    #[test]
    fn collision_keeps_highest_r_squared_by_default() {
        let models = [
            model("d1", "p1", 0.0, 1.0, 0.9),
            model("d2", "p1", 0.0, 10.0, 0.5),
        ];
        let out = predict(&input(&[("d1", 1.0), ("d2", 1.0)]), &models);
        assert_eq!(out["p1"], 1.0);
    }

    #[test]
    fn collision_last_wins_when_configured() {
        let models = [
            model("d1", "p1", 0.0, 1.0, 0.9),
            model("d2", "p1", 0.0, 10.0, 0.5),
        ];
        let predictor = Predictor {
            collision: CollisionPolicy::LastWins,
            ..Predictor::default()
        };
        let out = predictor.predict(&input(&[("d1", 1.0), ("d2", 1.0)]), &models);
        assert_eq!(out["p1"], 10.0);
    }

    #[test]
    fn custom_gate() {
        let predictor = Predictor {
            min_r_squared: 0.8,
            ..Predictor::default()
        };
        let models = [model("d1", "p1", 0.0, 1.0, 0.75)];
        assert!(predictor.predict(&input(&[("d1", 1.0)]), &models).is_empty());
    }
}
