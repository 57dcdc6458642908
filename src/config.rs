use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::model::{DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use crate::analysis::predict::{CollisionPolicy, DEFAULT_MIN_R_SQUARED, Predictor};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "SWEEP_CORRELATE_CONFIG";
/// Config file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "analysis.toml";

// ============================================================================
// AnalysisConfig
// ============================================================================

/// Tunables for ranking and prediction.
///
/// ```toml
/// threshold = 0.5
/// top_n = 10
/// min_r_squared = 0.3
/// collision_policy = "highest-r-squared"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Minimum |r| for a correlation to be listed as strong.
    pub threshold: f64,
    /// How many of the strongest correlations get a fitted model.
    pub top_n: usize,
    /// Models must have R² strictly above this to predict.
    pub min_r_squared: f64,
    pub collision_policy: CollisionPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            min_r_squared: DEFAULT_MIN_R_SQUARED,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. `explicit` path (from `--config`), errors are returned
    /// 2. `$SWEEP_CORRELATE_CONFIG`
    /// 3. `./analysis.toml`
    /// 4. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!("Loaded analysis config from {}", path.display());
            return Ok(config);
        }

        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from(LOCAL_CONFIG));

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded analysis config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => warn!("{e}, falling back"),
            }
        }

        info!("No analysis config found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.threshold) {
            errors.push(format!("threshold ({}) must be within [0, 1]", self.threshold));
        }
        if !(0.0..=1.0).contains(&self.min_r_squared) {
            errors.push(format!(
                "min_r_squared ({}) must be within [0, 1]",
                self.min_r_squared
            ));
        }
        if self.top_n == 0 {
            errors.push("top_n must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn predictor(&self) -> Predictor {
        Predictor {
            min_r_squared: self.min_r_squared,
            collision: self.collision_policy,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
