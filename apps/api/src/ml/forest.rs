//! Random forest classifier with bootstrap sampling and balanced class weights.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tree::{DecisionTree, TreeParams};
use super::{check_lengths, check_width, FeatureVector, MlError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub bootstrap: bool,
    /// Reweight each class by `n_samples / (n_classes * class_count)`.
    pub balanced_class_weight: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            tree: TreeParams::default(),
            bootstrap: true,
            balanced_class_weight: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

/// `n / (k * count_c)` over the classes present in `y`; absent classes get 0.
pub fn balanced_class_weights(y: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    let present = counts.iter().filter(|c| **c > 0).count() as f64;
    let n = y.len() as f64;
    counts
        .iter()
        .map(|&c| if c == 0 { 0.0 } else { n / (present * c as f64) })
        .collect()
}

impl RandomForest {
    pub fn fit(
        x: &[FeatureVector],
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, MlError> {
        if x.is_empty() {
            return Err(MlError::EmptyDataset("random forest"));
        }
        check_lengths(x.len(), y.len())?;
        let n_features = x[0].len();
        if n_features == 0 {
            return Err(MlError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        for row in x {
            check_width(row, n_features)?;
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(MlError::InvalidId { id: bad, n_classes });
        }
        if y.iter().collect::<BTreeSet<_>>().len() < 2 {
            return Err(MlError::SingleClass {
                model: "random forest".to_string(),
            });
        }

        let class_weights = if params.balanced_class_weight {
            balanced_class_weights(y, n_classes)
        } else {
            vec![1.0; n_classes]
        };

        let mut tree_params = params.tree;
        if tree_params.max_features.is_none() {
            tree_params.max_features = Some(((n_features as f64).sqrt() as usize).max(1));
        }

        let n = x.len();
        let trees = (0..params.n_estimators.max(1))
            .map(|t| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let mut weights = vec![0.0; n];
                if params.bootstrap {
                    for _ in 0..n {
                        weights[rng.gen_range(0..n)] += 1.0;
                    }
                } else {
                    weights.iter_mut().for_each(|w| *w = 1.0);
                }
                for (w, &label) in weights.iter_mut().zip(y) {
                    *w *= class_weights[label];
                }
                DecisionTree::fit(x, y, &weights, n_classes, n_features, tree_params, &mut rng)
            })
            .collect::<Vec<_>>();

        debug!(
            trees = trees.len(),
            nodes = trees.iter().map(DecisionTree::node_count).sum::<usize>(),
            "random forest fitted"
        );

        Ok(Self {
            trees,
            n_classes,
            n_features,
        })
    }

    /// Mean of the per-tree leaf distributions.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, MlError> {
        check_width(row, self.n_features)?;
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(row)) {
                *acc += p;
            }
        }
        let k = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= k);
        Ok(proba)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::argmax;

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 15,
            tree: TreeParams {
                min_samples_split: 2,
                min_samples_leaf: 1,
                ..TreeParams::default()
            },
            ..ForestParams::default()
        }
    }

    fn blobs() -> (Vec<FeatureVector>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let jitter = (i % 5) as f64 * 0.1;
            x.push(vec![0.0 + jitter, 1.0, 0.0]);
            y.push(0);
            x.push(vec![5.0 + jitter, 0.0, 1.0]);
            y.push(1);
            x.push(vec![10.0 + jitter, 1.0, 1.0]);
            y.push(2);
        }
        (x, y)
    }

    #[test]
    fn test_balanced_weights() {
        let w = balanced_class_weights(&[0, 0, 0, 1], 3);
        // 4 / (2 * 3) and 4 / (2 * 1)
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((w[1] - 2.0).abs() < 1e-12);
        assert_eq!(w[2], 0.0);
    }

    #[test]
    fn test_fits_separable_blobs() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        assert_eq!(argmax(&forest.predict_proba(&[0.2, 1.0, 0.0]).unwrap()), 0);
        assert_eq!(argmax(&forest.predict_proba(&[5.2, 0.0, 1.0]).unwrap()), 1);
        assert_eq!(argmax(&forest.predict_proba(&[10.2, 1.0, 1.0]).unwrap()), 2);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        let proba = forest.predict_proba(&[3.0, 0.5, 0.5]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = blobs();
        let a = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        let b = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class_is_fatal() {
        let x = vec![vec![1.0], vec![2.0]];
        let err = RandomForest::fit(&x, &[0, 0], 1, &small_params()).unwrap_err();
        assert!(matches!(err, MlError::SingleClass { .. }));
    }

    #[test]
    fn test_empty_is_fatal() {
        let err = RandomForest::fit(&[], &[], 2, &small_params()).unwrap_err();
        assert_eq!(err, MlError::EmptyDataset("random forest"));
    }

    #[test]
    fn test_wrong_width_at_predict() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(&x, &y, 3, &small_params()).unwrap();
        assert!(matches!(
            forest.predict_proba(&[1.0]),
            Err(MlError::DimensionMismatch { expected: 3, actual: 1 })
        ));
    }
}
