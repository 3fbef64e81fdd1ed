//! End-to-end training run: load, split, fit, evaluate, report, persist.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::PipelineSettings;
use crate::dataset::{self, CLASS_NAMES, DatasetLoadError, OutcomeTable, SplitError};
use crate::ml::metrics::{self, ConfusionMatrix, PerClassMetric};
use crate::ml::{ModelError, OutcomeModel};
use crate::plot;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    ReportJson(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Accuracy and confusion matrix of a model on one subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitEvaluation {
    pub rows: usize,
    /// Fraction of exact label matches, in `[0, 1]`.
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Everything produced by a run before anything is written.
#[derive(Debug, Clone)]
pub struct TrainedRun {
    pub model: OutcomeModel,
    pub train: SplitEvaluation,
    pub test: SplitEvaluation,
    pub test_indices: Vec<usize>,
}

/// JSON snapshot written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub data_path: PathBuf,
    pub seed: u64,
    pub test_fraction: f64,
    pub max_depth: usize,
    pub tree_depth: usize,
    pub tree_leaves: usize,
    pub train: SplitEvaluation,
    pub test: SplitEvaluation,
    pub test_per_class: Vec<PerClassMetric>,
}

/// Score `model` against a labelled table.
pub fn evaluate(model: &OutcomeModel, table: &OutcomeTable) -> Result<SplitEvaluation, ModelError> {
    let predicted = model.predict(table.x.view())?;
    let truth = table.y.to_vec();
    let predicted = predicted.to_vec();
    Ok(SplitEvaluation {
        rows: table.n_rows(),
        accuracy: metrics::accuracy_score(&truth, &predicted),
        confusion: ConfusionMatrix::from_labels(CLASS_NAMES.len(), &truth, &predicted),
    })
}

/// Load the dataset, split it, fit the tree and score both subsets.
pub fn train_and_evaluate(settings: &PipelineSettings) -> Result<TrainedRun, PipelineError> {
    let table = dataset::load_csv(&settings.data_path, &settings.label_column)?;
    let [lose, win] = table.class_counts();
    tracing::info!("Class balance: {lose} lose / {win} win");
    let split = dataset::train_test_split(&table, settings.test_fraction, settings.seed)?;
    let model = OutcomeModel::fit(&split.train, settings.max_depth)?;
    let train = evaluate(&model, &split.train)?;
    let test = evaluate(&model, &split.test)?;
    Ok(TrainedRun {
        model,
        train,
        test,
        test_indices: split.indices.test,
    })
}

/// The two accuracy lines printed at the end of training.
pub fn accuracy_lines(run: &TrainedRun) -> [String; 2] {
    [
        format!("Training Accuracy: {:.2}%", run.train.accuracy * 100.0),
        format!("Testing Accuracy: {:.2}%", run.test.accuracy * 100.0),
    ]
}

/// Run the full pipeline, printing the accuracy lines to `out`.
pub fn run(settings: &PipelineSettings, out: &mut impl Write) -> Result<TrainedRun, PipelineError> {
    let trained = train_and_evaluate(settings)?;
    for line in accuracy_lines(&trained) {
        writeln!(out, "{line}").map_err(PipelineError::Output)?;
    }
    out.flush().map_err(PipelineError::Output)?;
    log_evaluation("train", &trained.train);
    log_evaluation("test", &trained.test);

    if settings.show_plot {
        // Display failures are logged; the model is still saved.
        if let Err(err) = plot::show_confusion_heatmap(&trained.test.confusion, &CLASS_NAMES) {
            tracing::warn!("{err}");
        }
    }

    trained.model.save(&settings.model_path)?;
    if let Some(path) = &settings.report_path {
        write_report(path, &build_report(settings, &trained))?;
    }
    Ok(trained)
}

pub fn build_report(settings: &PipelineSettings, run: &TrainedRun) -> EvaluationReport {
    EvaluationReport {
        data_path: settings.data_path.clone(),
        seed: settings.seed,
        test_fraction: settings.test_fraction,
        max_depth: settings.max_depth,
        tree_depth: run.model.depth(),
        tree_leaves: run.model.num_leaves(),
        train: run.train.clone(),
        test: run.test.clone(),
        test_per_class: metrics::per_class_metrics(&run.test.confusion, &CLASS_NAMES),
    }
}

fn write_report(path: &Path, report: &EvaluationReport) -> Result<(), PipelineError> {
    let bytes = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, bytes).map_err(|source| PipelineError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote evaluation report to {}", path.display());
    Ok(())
}

fn log_evaluation(subset: &str, evaluation: &SplitEvaluation) {
    tracing::info!(
        "{subset}: {} rows, accuracy {:.4}; confusion matrix (rows=actual, cols=predicted):\n{}",
        evaluation.rows,
        evaluation.accuracy,
        evaluation.confusion.to_table(&CLASS_NAMES)
    );
    for (idx, stats) in metrics::precision_recall_by_class(&evaluation.confusion)
        .iter()
        .enumerate()
    {
        tracing::info!(
            "{subset} class {:<4}  precision={:.3}  recall={:.3}  support={}",
            CLASS_NAMES[idx],
            stats.precision,
            stats.recall,
            stats.support
        );
    }
}
