//! Correlation and linear prediction engine for GPS-error parameter sweeps.
//!
//! Loads sweep results, pairs every GPS-error input dimension with every
//! optimized Kalman parameter, and fits simple linear models from the
//! strongest relationships.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod report;
