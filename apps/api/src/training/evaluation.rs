//! Held-out evaluation of the fitted models, reported alongside the bundle.

use serde::Serialize;

use crate::ml::career::CareerClassifier;
use crate::ml::metrics::{
    classification_metrics, confusion_matrix, multilabel_metrics, summarize, ClassificationMetrics,
    MultiLabelMetrics, SummaryStats,
};
use crate::ml::skill_readiness::SkillReadinessModel;
use crate::ml::text::{match_percentage, TfidfVectorizer};
use crate::ml::{FeatureVector, MlError};

#[derive(Debug, Clone, Serialize)]
pub struct CareerEvaluation {
    pub classes: Vec<String>,
    pub train: ClassificationMetrics,
    pub test: ClassificationMetrics,
    /// `confusion_matrix[true][predicted]` on the test split.
    pub confusion_matrix: Vec<Vec<usize>>,
    pub test_confidence: Option<SummaryStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillEvaluation {
    pub skills: Vec<String>,
    pub train: MultiLabelMetrics,
    pub test: MultiLabelMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextEvaluation {
    pub vocabulary_size: usize,
    /// Résumé ↔ job-description match percentages over the test split.
    pub test_match_percentage: Option<SummaryStats>,
}

pub fn evaluate_career(
    model: &CareerClassifier,
    classes: &[String],
    (x_train, y_train): (&[FeatureVector], &[usize]),
    (x_test, y_test): (&[FeatureVector], &[usize]),
) -> Result<CareerEvaluation, MlError> {
    let n = model.n_classes();
    let train_pred: Vec<usize> = model
        .predict_batch(x_train)?
        .into_iter()
        .map(|p| p.class_id)
        .collect();
    let test_predictions = model.predict_batch(x_test)?;
    let test_pred: Vec<usize> = test_predictions.iter().map(|p| p.class_id).collect();
    let confidences: Vec<f64> = test_predictions.iter().map(|p| p.confidence).collect();

    Ok(CareerEvaluation {
        classes: classes.to_vec(),
        train: classification_metrics(y_train, &train_pred, n),
        test: classification_metrics(y_test, &test_pred, n),
        confusion_matrix: confusion_matrix(y_test, &test_pred, n),
        test_confidence: summarize(&confidences),
    })
}

pub fn evaluate_skills(
    model: &SkillReadinessModel,
    (x_train, y_train): (&[FeatureVector], &[Vec<bool>]),
    (x_test, y_test): (&[FeatureVector], &[Vec<bool>]),
) -> Result<SkillEvaluation, MlError> {
    let predict = |x: &[FeatureVector]| -> Result<Vec<Vec<bool>>, MlError> {
        x.iter().map(|row| model.predict_labels(row)).collect()
    };
    Ok(SkillEvaluation {
        skills: model.skills().to_vec(),
        train: multilabel_metrics(y_train, &predict(x_train)?),
        test: multilabel_metrics(y_test, &predict(x_test)?),
    })
}

pub fn evaluate_text(vectorizer: &TfidfVectorizer, pairs: &[(String, String)]) -> TextEvaluation {
    let scores: Vec<f64> = pairs
        .iter()
        .map(|(resume, job)| match_percentage(vectorizer.similarity(resume, job)))
        .collect();
    TextEvaluation {
        vocabulary_size: vectorizer.terms().len(),
        test_match_percentage: summarize(&scores),
    }
}
