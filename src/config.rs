//! Pipeline settings loaded from TOML, with defaults for every field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::dataset::OUTCOME_COLUMN;
use crate::dataset::split::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use crate::ml::DEFAULT_MAX_DEPTH;

/// Default filename of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Default dataset path, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "xsitemoves.csv";
/// Default model artifact path, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "tic_tac_toe_ai_model.pkl";

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Name of the outcome column.
    #[serde(default = "default_label_column")]
    pub label_column: String,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Show the confusion-matrix window before saving.
    #[serde(default = "default_true")]
    pub show_plot: bool,
    /// Optional JSON evaluation report path.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            model_path: default_model_path(),
            label_column: default_label_column(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            max_depth: default_max_depth(),
            show_plot: true,
            report_path: None,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_label_column() -> String {
    OUTCOME_COLUMN.to_string()
}

fn default_test_fraction() -> f64 {
    DEFAULT_TEST_FRACTION
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

/// Errors that may occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to prepare config directory: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve the settings file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the app directory, returning defaults if the file is missing.
pub fn load_or_default() -> Result<PipelineSettings, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(PipelineSettings::default());
    }
    load_from(&path)
}

/// Load settings from an explicit TOML file.
pub fn load_from(path: &Path) -> Result<PipelineSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}
