//! Statistical core: correlation, ranking, linear models and prediction.
//!
//! ```text
//!   Vec<Observation>
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  matrix   │  Pearson r for every (dimension, parameter)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  model    │  rank by |r|, fit y = a + b·x
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ predict   │  R²-gated predictions for a new input
//!   └──────────┘
//! ```
//!
//! Everything here is pure and infallible.

pub mod matrix;
pub mod model;
pub mod predict;
pub mod stats;

pub use matrix::{CorrelationMatrix, CorrelationResult, DataPoint};
pub use model::{PredictionModel, build_model, find_strongest, top_models};
pub use predict::{CollisionPolicy, Predictor, predict};
pub use stats::{Regression, correlation, linear_regression};
