use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use super::stats::correlation;
use crate::data::model::{Observation, dimension_rank};

// ---------------------------------------------------------------------------
// Correlation results
// ---------------------------------------------------------------------------

/// One (x, y) pair that went into a correlation, with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Correlation between one GPS-error dimension and one output parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub dimension: String,
    pub parameter: String,
    /// Pearson r in [-1, 1].
    pub coefficient: f64,
    /// The finite pairs the coefficient was computed from, in observation
    /// order. Kept for scatter plots and for fitting models later.
    pub data_points: Vec<DataPoint>,
}

impl CorrelationResult {
    pub fn xs(&self) -> Vec<f64> {
        self.data_points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.data_points.iter().map(|p| p.y).collect()
    }
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// dimension → parameter → result.
///
/// Every dimension row carries the same parameter keys, taken from the first
/// observation. Dimensions iterate in `GPS_DIMENSIONS` order (pos, vel, acc),
/// parameters alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    rows: BTreeMap<String, BTreeMap<String, CorrelationResult>>,
}

impl CorrelationMatrix {
    /// Correlate every input dimension against every output parameter.
    ///
    /// The dimension and parameter universe comes from the first observation.
    /// Observations missing a key, or holding a non-finite value for it, are
    /// left out of that pair only.
    pub fn build(observations: &[Observation]) -> Self {
        let Some(first) = observations.first() else {
            return Self::default();
        };

        let mut rows = BTreeMap::new();
        for dimension in first.input.keys() {
            let mut row = BTreeMap::new();
            for parameter in first.output.keys() {
                let data_points: Vec<DataPoint> = observations
                    .iter()
                    .filter_map(|obs| {
                        let x = *obs.input.get(dimension)?;
                        let y = *obs.output.get(parameter)?;
                        (x.is_finite() && y.is_finite()).then(|| DataPoint {
                            x,
                            y,
                            label: obs.label.clone(),
                        })
                    })
                    .collect();

                let xs: Vec<f64> = data_points.iter().map(|p| p.x).collect();
                let ys: Vec<f64> = data_points.iter().map(|p| p.y).collect();

                row.insert(
                    parameter.clone(),
                    CorrelationResult {
                        dimension: dimension.clone(),
                        parameter: parameter.clone(),
                        coefficient: correlation(&xs, &ys),
                        data_points,
                    },
                );
            }
            rows.insert(dimension.clone(), row);
        }

        debug!(
            "Built correlation matrix: {} dimensions × {} parameters over {} observations",
            rows.len(),
            first.output.len(),
            observations.len()
        );
        Self { rows }
    }

    pub fn get(&self, dimension: &str, parameter: &str) -> Option<&CorrelationResult> {
        self.rows.get(dimension)?.get(parameter)
    }

    /// Results for one dimension, keyed by parameter.
    pub fn row(&self, dimension: &str) -> Option<&BTreeMap<String, CorrelationResult>> {
        self.rows.get(dimension)
    }

    /// Rows by [`dimension_rank`]. Unknown names keep alphabetical order
    /// behind the fixed set since the sort is stable.
    fn ordered_rows(&self) -> Vec<(&String, &BTreeMap<String, CorrelationResult>)> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by_key(|(dimension, _)| dimension_rank(dimension));
        rows
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.ordered_rows()
            .into_iter()
            .map(|(dimension, _)| dimension.as_str())
    }

    /// Parameter keys (identical for every dimension).
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.rows
            .values()
            .next()
            .into_iter()
            .flat_map(|row| row.keys().map(String::as_str))
    }

    /// All results, dimension-major in `GPS_DIMENSIONS` order.
    pub fn iter(&self) -> impl Iterator<Item = &CorrelationResult> {
        self.ordered_rows()
            .into_iter()
            .flat_map(|(_, row)| row.values())
    }

    /// Number of stored (dimension, parameter) pairs.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Vector;

    fn obs(input: &[(&str, f64)], output: &[(&str, f64)], label: &str) -> Observation {
        let to_vec = |pairs: &[(&str, f64)]| -> Vector {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };
        Observation {
            input: to_vec(input),
            output: to_vec(output),
            label: label.to_string(),
        }
    }

    #[test]
    fn empty_observations_give_empty_matrix() {
        let m = CorrelationMatrix::build(&[]);
        assert!(m.is_empty());
        assert_eq!(m.dimensions().count(), 0);
        assert_eq!(m.parameters().count(), 0);
    }

    #[test]
    fn two_point_perfect_correlation() {
        let m = CorrelationMatrix::build(&[
            obs(&[("d1", 1.0)], &[("p1", 2.0)], "a"),
            obs(&[("d1", 2.0)], &[("p1", 4.0)], "b"),
        ]);
        let r = m.get("d1", "p1").unwrap();
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(r.xs(), vec![1.0, 2.0]);
        assert_eq!(r.ys(), vec![2.0, 4.0]);
        assert_eq!(r.data_points[1].label, "b");
    }

    #[test]
    fn every_dimension_shares_the_first_observations_parameters() {
        let m = CorrelationMatrix::build(&[
            obs(&[("d1", 1.0), ("d2", 0.0)], &[("p1", 1.0), ("p2", 3.0)], "a"),
            obs(&[("d1", 2.0), ("d2", 1.0)], &[("p1", 2.0), ("p3", 9.0)], "b"),
        ]);
        assert_eq!(m.len(), 4);
        for dim in ["d1", "d2"] {
            let keys: Vec<_> = m.row(dim).unwrap().keys().cloned().collect();
            assert_eq!(keys, vec!["p1", "p2"]);
        }
        assert_eq!(m.parameters().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert!(m.get("d1", "p3").is_none());
    }

    #[test]
    fn missing_parameter_lowers_point_count() {
        let m = CorrelationMatrix::build(&[
            obs(&[("d1", 1.0)], &[("p1", 1.0), ("p2", 5.0)], "a"),
            obs(&[("d1", 2.0)], &[("p1", 2.0), ("p2", 6.0)], "b"),
            obs(&[("d1", 3.0)], &[("p1", 3.0)], "c"),
        ]);
        assert_eq!(m.get("d1", "p1").unwrap().data_points.len(), 3);
        assert_eq!(m.get("d1", "p2").unwrap().data_points.len(), 2);
    }

    #[test]
    fn non_finite_values_are_filtered() {
        let m = CorrelationMatrix::build(&[
            obs(&[("d1", 1.0)], &[("p1", 1.0)], "a"),
            obs(&[("d1", f64::NAN)], &[("p1", 2.0)], "b"),
            obs(&[("d1", 3.0)], &[("p1", f64::INFINITY)], "c"),
            obs(&[("d1", 4.0)], &[("p1", 4.0)], "d"),
        ]);
        let r = m.get("d1", "p1").unwrap();
        let labels: Vec<_> = r.data_points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "d"]);
        assert!((r.coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dimensions_follow_gps_order() {
        let m = CorrelationMatrix::build(&[obs(
            &[("accFuzzX", 0.0), ("extra", 0.0), ("posX", 0.0), ("velY", 0.0)],
            &[("p1", 1.0)],
            "a",
        )]);
        assert_eq!(
            m.dimensions().collect::<Vec<_>>(),
            vec!["posX", "velY", "accFuzzX", "extra"]
        );
        let dims: Vec<_> = m.iter().map(|r| r.dimension.as_str()).collect();
        assert_eq!(dims, vec!["posX", "velY", "accFuzzX", "extra"]);
    }

    #[test]
    fn single_observation_has_zero_coefficient() {
        let m = CorrelationMatrix::build(&[obs(&[("d1", 1.0)], &[("p1", 1.0)], "a")]);
        let r = m.get("d1", "p1").unwrap();
        assert_eq!(r.coefficient, 0.0);
        assert_eq!(r.data_points.len(), 1);
    }
}
