//! Evaluation metrics for classification models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Tally aligned truth/prediction pairs. Labels outside `0..K` are ignored.
    pub fn from_labels(n_classes: usize, truth: &[usize], predicted: &[usize]) -> Self {
        let mut cm = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.add(t, p);
        }
        cm
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| v as u64).sum()
    }

    /// Largest single cell, used to scale heatmap colors.
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Render as aligned text rows (rows = truth, cols = predicted).
    pub fn to_table(&self, class_names: &[&str]) -> String {
        let name = |idx: usize| class_names.get(idx).copied().unwrap_or("?");
        let mut out = format!("{:>8}", "");
        for pred in 0..self.n_classes {
            out.push_str(&format!("{:>8}", name(pred)));
        }
        for truth in 0..self.n_classes {
            out.push('\n');
            out.push_str(&format!("{:>8}", name(truth)));
            for pred in 0..self.n_classes {
                out.push_str(&format!("{:>8}", self.get(truth, pred)));
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

impl PerClassStats {
    pub fn f1(&self) -> f32 {
        let denom = self.precision + self.recall;
        if denom == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / denom
        }
    }
}

/// Serialized per-class metrics for evaluation reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerClassMetric {
    pub class_id: String,
    pub support: u32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f32;
        let mut fp = 0f32;
        let mut fn_ = 0f32;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f32;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f32;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            precision,
            recall,
            support,
        });
    }
    stats
}

/// Pair per-class stats with class names for serialization.
pub fn per_class_metrics(cm: &ConfusionMatrix, class_names: &[&str]) -> Vec<PerClassMetric> {
    precision_recall_by_class(cm)
        .into_iter()
        .enumerate()
        .map(|(idx, stats)| PerClassMetric {
            class_id: class_names.get(idx).copied().unwrap_or("?").to_string(),
            support: stats.support,
            precision: stats.precision,
            recall: stats.recall,
            f1: stats.f1(),
        })
        .collect()
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let mut correct = 0u64;
    for class_idx in 0..cm.n_classes {
        correct += cm.get(class_idx, class_idx) as u64;
    }
    let total = cm.total();
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Fraction of positions where `predicted` matches `truth`.
pub fn accuracy_score(truth: &[usize], predicted: &[usize]) -> f64 {
    let total = truth.len().min(predicted.len());
    if total == 0 {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pairs_by_truth_then_prediction() {
        let cm = ConfusionMatrix::from_labels(2, &[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        assert_eq!(cm.get(0, 0), 1);
        assert_eq!(cm.get(0, 1), 1);
        assert_eq!(cm.get(1, 0), 1);
        assert_eq!(cm.get(1, 1), 2);
        assert_eq!(cm.total(), 5);
        assert_eq!(cm.max_count(), 2);
        assert!((accuracy(&cm) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_labels_are_skipped() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(2, 0);
        cm.add(0, 5);
        assert_eq!(cm.total(), 0);
        assert_eq!(accuracy(&cm), 0.0);
    }

    #[test]
    fn precision_and_recall_per_class() {
        let cm = ConfusionMatrix::from_labels(2, &[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats[0].support, 2);
        assert_eq!(stats[1].support, 3);
        assert!((stats[0].precision - 0.5).abs() < 1e-6);
        assert!((stats[1].recall - 2.0 / 3.0).abs() < 1e-6);
        let named = per_class_metrics(&cm, &["Lose", "Win"]);
        assert_eq!(named[1].class_id, "Win");
        assert!((named[1].f1 - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn accuracy_score_matches_confusion_accuracy() {
        let truth = [1, 0, 1, 1];
        let predicted = [1, 1, 1, 0];
        let cm = ConfusionMatrix::from_labels(2, &truth, &predicted);
        assert_eq!(accuracy_score(&truth, &predicted), accuracy(&cm));
        assert_eq!(accuracy_score(&[], &[]), 0.0);
    }

    #[test]
    fn table_lists_rows_as_truth() {
        let cm = ConfusionMatrix::from_labels(2, &[0, 1, 1], &[0, 1, 0]);
        let table = cm.to_table(&["Lose", "Win"]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Lose") && lines[0].contains("Win"));
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["Win", "1", "1"]);
    }
}
