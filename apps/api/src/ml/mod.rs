// Classical ML core: encoders, scaler, tree ensemble, logistic regression, TF-IDF.
// Every estimator here is fit once and is immutable afterwards; inference
// methods take `&self` and never touch fitted state.

pub mod career;
pub mod features;
pub mod forest;
pub mod label;
pub mod logistic;
pub mod metrics;
pub mod scaler;
pub mod skill_readiness;
pub mod text;
pub mod tree;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MlError {
    #[error("{0} used before it was fitted")]
    NotFitted(&'static str),

    #[error("cannot fit {0} on an empty dataset")]
    EmptyDataset(&'static str),

    #[error("cannot fit {model}: training labels contain a single class")]
    SingleClass { model: String },

    #[error("unknown {field} value '{value}'")]
    UnknownCategory { field: String, value: String },

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("class id {id} out of range (fitted classes: {n_classes})")]
    InvalidId { id: usize, n_classes: usize },

    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("row count mismatch: {features} feature rows vs {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("vocabulary is empty after pruning ({documents} documents)")]
    EmptyVocabulary { documents: usize },

    #[error("inconsistent model bundle: {0}")]
    InconsistentBundle(String),
}

/// Dense feature row as produced by the feature encoder.
pub type FeatureVector = Vec<f64>;

pub(crate) fn check_lengths(features: usize, labels: usize) -> Result<(), MlError> {
    if features != labels {
        return Err(MlError::LengthMismatch { features, labels });
    }
    Ok(())
}

pub(crate) fn check_width(row: &[f64], expected: usize) -> Result<(), MlError> {
    if row.len() != expected {
        return Err(MlError::DimensionMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// Index of the largest value; ties resolve to the lowest index.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_lowest_index_on_tie() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5]), 0);
    }

    #[test]
    fn test_check_width_reports_both_sizes() {
        let err = check_width(&[1.0, 2.0], 13).unwrap_err();
        assert_eq!(
            err,
            MlError::DimensionMismatch {
                expected: 13,
                actual: 2
            }
        );
    }
}
