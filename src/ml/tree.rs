//! Depth-bounded decision-tree outcome classifier.
//!
//! Fitting is delegated to `linfa-trees`. The fitted tree is wrapped in an
//! envelope that records the feature layout and class names, and persists as
//! a bincode blob.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{CLASS_NAMES, OutcomeTable};

/// Artifact format version written by [`OutcomeModel::save`].
pub const MODEL_VERSION: i64 = 1;
/// Default upper bound on tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("decision tree fit failed: {0}")]
    Fit(#[from] linfa::error::Error),
    #[error("failed to access model file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode model: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode model: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("unsupported model version {0}")]
    UnsupportedVersion(i64),
    #[error("expected {expected} features per row, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },
    #[error("max depth must be at least 1")]
    InvalidDepth,
}

/// Fitted tree plus the metadata needed to use it outside the training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeModel {
    /// Artifact format version.
    pub model_version: i64,
    /// Feature column names, in the order rows must be given.
    pub feature_names: Vec<String>,
    /// Class names indexed by label.
    pub classes: Vec<String>,
    /// Depth bound used during fitting.
    pub max_depth: usize,
    tree: DecisionTree<f64, usize>,
}

impl OutcomeModel {
    /// Fit a tree on `train` with depth bounded by `max_depth`.
    pub fn fit(train: &OutcomeTable, max_depth: usize) -> Result<Self, ModelError> {
        if max_depth == 0 {
            return Err(ModelError::InvalidDepth);
        }
        let dataset = Dataset::new(train.x.clone(), train.y.clone())
            .with_feature_names(train.feature_names.clone());
        let tree = DecisionTree::params()
            .max_depth(Some(max_depth))
            .fit(&dataset)?;
        tracing::info!(
            "Fitted decision tree on {} rows: depth {}, {} leaves",
            train.n_rows(),
            tree.max_depth(),
            tree.num_leaves()
        );
        Ok(Self {
            model_version: MODEL_VERSION,
            feature_names: train.feature_names.clone(),
            classes: CLASS_NAMES.iter().map(|name| name.to_string()).collect(),
            max_depth,
            tree,
        })
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Depth actually reached by the fitted tree.
    pub fn depth(&self) -> usize {
        self.tree.max_depth()
    }

    pub fn num_leaves(&self) -> usize {
        self.tree.num_leaves()
    }

    /// Predict a label for every row of `x`.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>, ModelError> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok(self.tree.predict(&x))
    }

    /// Predict the label for a single feature row.
    pub fn predict_row(&self, features: &[f64]) -> Result<usize, ModelError> {
        let row = Array2::from_shape_vec((1, features.len()), features.to_vec()).map_err(|_| {
            ModelError::FeatureMismatch {
                expected: self.n_features(),
                actual: features.len(),
            }
        })?;
        let predicted = self.predict(row.view())?;
        Ok(predicted[0])
    }

    /// Class name for a label index.
    pub fn class_name(&self, label: usize) -> &str {
        self.classes.get(label).map(String::as_str).unwrap_or("?")
    }

    /// Encode the model into bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    /// Decode a model from bytes, rejecting unknown versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let (model, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        model.validate()?;
        Ok(model)
    }

    /// Write the model to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_err = |source| ModelError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        writer.flush().map_err(io_err)?;
        tracing::info!("Saved model to {}", path.display());
        Ok(())
    }

    /// Load a model previously written by [`OutcomeModel::save`].
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let model: Self =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.model_version != MODEL_VERSION {
            return Err(ModelError::UnsupportedVersion(self.model_version));
        }
        Ok(())
    }
}
