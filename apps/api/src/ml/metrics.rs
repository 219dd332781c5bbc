//! Evaluation metrics for the trained models.
//!
//! Weighted averages weight each class by its support in `y_true`; a class
//! with no predicted samples has precision 0.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinaryMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiLabelMetrics {
    /// Fraction of samples whose whole label row is predicted exactly.
    pub exact_match_accuracy: f64,
    pub weighted_f1: f64,
    pub per_label: Vec<BinaryMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn binary(tp: usize, fp: usize, fn_: usize) -> BinaryMetrics {
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    BinaryMetrics {
        precision,
        recall,
        f1: f1(precision, recall),
        support: tp + fn_,
    }
}

pub fn accuracy<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> f64 {
    let correct = y_true.iter().zip(y_pred).filter(|(a, b)| a == b).count();
    ratio(correct, y_true.len())
}

/// `matrix[true][predicted]` counts.
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0; n_classes]; n_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < n_classes && p < n_classes {
            matrix[t][p] += 1;
        }
    }
    matrix
}

pub fn per_class(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<BinaryMetrics> {
    let matrix = confusion_matrix(y_true, y_pred, n_classes);
    (0..n_classes)
        .map(|c| {
            let tp = matrix[c][c];
            let fp = (0..n_classes).map(|t| matrix[t][c]).sum::<usize>() - tp;
            let fn_ = matrix[c].iter().sum::<usize>() - tp;
            binary(tp, fp, fn_)
        })
        .collect()
}

fn support_weighted(metrics: &[BinaryMetrics], pick: impl Fn(&BinaryMetrics) -> f64) -> f64 {
    let total: usize = metrics.iter().map(|m| m.support).sum();
    if total == 0 {
        return 0.0;
    }
    metrics
        .iter()
        .map(|m| pick(m) * m.support as f64)
        .sum::<f64>()
        / total as f64
}

pub fn classification_metrics(
    y_true: &[usize],
    y_pred: &[usize],
    n_classes: usize,
) -> ClassificationMetrics {
    let classes = per_class(y_true, y_pred, n_classes);
    ClassificationMetrics {
        accuracy: accuracy(y_true, y_pred),
        precision: support_weighted(&classes, |m| m.precision),
        recall: support_weighted(&classes, |m| m.recall),
        f1: support_weighted(&classes, |m| m.f1),
    }
}

pub fn multilabel_metrics(y_true: &[Vec<bool>], y_pred: &[Vec<bool>]) -> MultiLabelMetrics {
    let n_labels = y_true.first().map_or(0, Vec::len);
    let per_label: Vec<BinaryMetrics> = (0..n_labels)
        .map(|j| {
            let (mut tp, mut fp, mut fn_) = (0, 0, 0);
            for (t, p) in y_true.iter().zip(y_pred) {
                match (t.get(j).copied().unwrap_or(false), p.get(j).copied().unwrap_or(false)) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            binary(tp, fp, fn_)
        })
        .collect();

    MultiLabelMetrics {
        exact_match_accuracy: accuracy(y_true, y_pred),
        weighted_f1: support_weighted(&per_label, |m| m.f1),
        per_label,
    }
}

/// `None` for an empty sample.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };
    Some(SummaryStats {
        mean: sorted.iter().sum::<f64>() / n as f64,
        median,
        min: sorted[0],
        max: sorted[n - 1],
    })
}
