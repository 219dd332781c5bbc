//! Career classifier: multi-class random forest over encoded profiles.
//!
//! Confidence is the maximum class probability. No threshold is applied here;
//! deciding what counts as "confident enough" is the caller's business.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::forest::{ForestParams, RandomForest};
use super::{argmax, FeatureVector, MlError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerClassifier {
    forest: RandomForest,
}

/// Raw model output: class id plus the full probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerPrediction {
    pub class_id: usize,
    pub probabilities: Vec<f64>,
    pub confidence: f64,
}

impl CareerClassifier {
    pub fn train(
        x: &[FeatureVector],
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, MlError> {
        info!(
            samples = x.len(),
            classes = n_classes,
            trees = params.n_estimators,
            "training career classifier"
        );
        let forest = RandomForest::fit(x, y, n_classes, params)?;
        Ok(Self { forest })
    }

    pub fn predict(&self, row: &[f64]) -> Result<CareerPrediction, MlError> {
        let probabilities = self.forest.predict_proba(row)?;
        let class_id = argmax(&probabilities);
        let confidence = probabilities[class_id];
        Ok(CareerPrediction {
            class_id,
            probabilities,
            confidence,
        })
    }

    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<CareerPrediction>, MlError> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    pub fn n_classes(&self) -> usize {
        self.forest.n_classes()
    }

    pub fn n_features(&self) -> usize {
        self.forest.n_features()
    }
}
