//! Weighted CART classification tree (Gini impurity).
//!
//! Building block for `forest::RandomForest`. Sample weights carry both the
//! bootstrap multiplicity and the class-balance correction; `min_samples_*`
//! limits count distinct samples, not weight.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split. `None` = all features.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: Some(15),
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_classes: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct Builder<'a, R: Rng> {
    x: &'a [FeatureVector],
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
    n_features: usize,
    params: TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grows a tree over the samples whose weight is positive.
    ///
    /// Callers guarantee `x`, `y`, `weights` have equal length, every row has
    /// `n_features` columns, and every label is `< n_classes`.
    pub fn fit<R: Rng>(
        x: &[FeatureVector],
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        n_features: usize,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let samples: Vec<usize> = (0..y.len()).filter(|&i| weights[i] > 0.0).collect();

        let mut builder = Builder {
            x,
            y,
            weights,
            n_classes,
            n_features,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(samples, 0);

        Self {
            nodes: builder.nodes,
            n_classes,
        }
    }

    /// Class distribution of the leaf `row` falls into.
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn gini(distribution: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - distribution
        .iter()
        .map(|w| (w / total).powi(2))
        .sum::<f64>()
}

impl<R: Rng> Builder<'_, R> {
    fn class_distribution(&self, samples: &[usize]) -> Vec<f64> {
        let mut dist = vec![0.0; self.n_classes];
        for &i in samples {
            dist[self.y[i]] += self.weights[i];
        }
        dist
    }

    fn push_leaf(&mut self, mut distribution: Vec<f64>) -> usize {
        let total: f64 = distribution.iter().sum();
        if total > 0.0 {
            for w in distribution.iter_mut() {
                *w /= total;
            }
        }
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let dist = self.class_distribution(&samples);
        let pure = dist.iter().filter(|w| **w > 0.0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);

        if pure || depth_reached || samples.len() < self.params.min_samples_split {
            return self.push_leaf(dist);
        }

        let Some(split) = self.best_split(&samples) else {
            return self.push_leaf(dist);
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[i][split.feature] <= split.threshold);

        // Reserve the slot so the parent precedes its children.
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&mut self, samples: &[usize]) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);
        let max_features = self
            .params
            .max_features
            .unwrap_or(self.n_features)
            .clamp(1, self.n_features);

        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut best: Option<SplitCandidate> = None;
        let mut informative_seen = 0;
        let mut sorted = samples.to_vec();

        for feature in features {
            if informative_seen >= max_features && best.is_some() {
                break;
            }

            sorted.sort_by(|a, b| self.x[*a][feature].total_cmp(&self.x[*b][feature]));
            let first = self.x[sorted[0]][feature];
            let last = self.x[sorted[sorted.len() - 1]][feature];
            if first == last {
                // constant within this node; does not count towards max_features
                continue;
            }
            informative_seen += 1;

            let mut right_dist = self.class_distribution(&sorted);
            let mut right_total: f64 = right_dist.iter().sum();
            let mut left_dist = vec![0.0; self.n_classes];
            let mut left_total = 0.0;

            for k in 1..sorted.len() {
                let moved = sorted[k - 1];
                let w = self.weights[moved];
                left_dist[self.y[moved]] += w;
                right_dist[self.y[moved]] -= w;
                left_total += w;
                right_total -= w;

                if k < min_leaf || sorted.len() - k < min_leaf {
                    continue;
                }
                let lo = self.x[moved][feature];
                let hi = self.x[sorted[k]][feature];
                if lo == hi {
                    continue;
                }

                let impurity =
                    left_total * gini(&left_dist, left_total) + right_total * gini(&right_dist, right_total);
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = (lo + hi) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}
