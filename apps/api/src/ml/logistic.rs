//! L2-regularized binary logistic regression fitted with damped Newton steps.
//!
//! Objective: `0.5 * ||w||² + C * Σ sᵢ · logloss(yᵢ, σ(w·xᵢ + b))`, intercept
//! unpenalized, `sᵢ` the per-class balance weight.

use serde::{Deserialize, Serialize};

use super::{check_lengths, check_width, FeatureVector, MlError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub balanced_class_weight: bool,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            balanced_class_weight: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
    iterations: usize,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

struct Problem<'a> {
    x: &'a [FeatureVector],
    y: &'a [bool],
    sample_weights: Vec<f64>,
    c: f64,
}

impl Problem<'_> {
    fn margin(&self, theta: &[f64], row: &[f64]) -> f64 {
        let (w, b) = theta.split_at(theta.len() - 1);
        b[0] + w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f64>()
    }

    fn objective(&self, theta: &[f64]) -> f64 {
        let d = theta.len() - 1;
        let penalty = 0.5 * theta[..d].iter().map(|w| w * w).sum::<f64>();
        let loss: f64 = self
            .x
            .iter()
            .zip(self.y)
            .zip(&self.sample_weights)
            .map(|((row, &label), s)| {
                let z = self.margin(theta, row);
                s * if label { softplus(-z) } else { softplus(z) }
            })
            .sum();
        penalty + self.c * loss
    }

    /// Gradient and Hessian of the objective at `theta`.
    fn derivatives(&self, theta: &[f64]) -> (Vec<f64>, Vec<Vec<f64>>) {
        let dim = theta.len();
        let d = dim - 1;
        let mut grad = vec![0.0; dim];
        let mut hess = vec![vec![0.0; dim]; dim];

        for ((row, &label), s) in self.x.iter().zip(self.y).zip(&self.sample_weights) {
            let p = sigmoid(self.margin(theta, row));
            let residual = self.c * s * (p - if label { 1.0 } else { 0.0 });
            let curvature = self.c * s * p * (1.0 - p);
            for i in 0..dim {
                let xi = if i < d { row[i] } else { 1.0 };
                grad[i] += residual * xi;
                for j in i..dim {
                    let xj = if j < d { row[j] } else { 1.0 };
                    hess[i][j] += curvature * xi * xj;
                }
            }
        }

        for i in 0..dim {
            if i < d {
                grad[i] += theta[i];
                hess[i][i] += 1.0;
            } else {
                // keeps the system solvable on separable data
                hess[i][i] += 1e-10;
            }
            for j in 0..i {
                hess[i][j] = hess[j][i];
            }
        }
        (grad, hess)
    }
}

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

impl LogisticRegression {
    pub fn fit(x: &[FeatureVector], y: &[bool], params: &LogisticParams) -> Result<Self, MlError> {
        if x.is_empty() {
            return Err(MlError::EmptyDataset("logistic regression"));
        }
        check_lengths(x.len(), y.len())?;
        let d = x[0].len();
        for row in x {
            check_width(row, d)?;
        }

        let positives = y.iter().filter(|l| **l).count();
        let negatives = y.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(MlError::SingleClass {
                model: "logistic regression".to_string(),
            });
        }

        let n = y.len() as f64;
        let (w_pos, w_neg) = if params.balanced_class_weight {
            (n / (2.0 * positives as f64), n / (2.0 * negatives as f64))
        } else {
            (1.0, 1.0)
        };
        let problem = Problem {
            x,
            y,
            sample_weights: y.iter().map(|&l| if l { w_pos } else { w_neg }).collect(),
            c: params.c,
        };

        let mut theta = vec![0.0; d + 1];
        let mut value = problem.objective(&theta);
        let mut iterations = 0;

        while iterations < params.max_iter {
            iterations += 1;
            let (grad, hess) = problem.derivatives(&theta);
            let grad_norm = grad.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
            if grad_norm < params.tol {
                break;
            }
            let Some(step) = solve(hess, grad.clone()) else {
                break;
            };
            let decrease: f64 = grad.iter().zip(&step).map(|(g, s)| g * s).sum();

            // backtracking line search (Armijo)
            let mut t = 1.0;
            let mut accepted = false;
            while t > 1e-10 {
                let candidate: Vec<f64> = theta.iter().zip(&step).map(|(th, s)| th - t * s).collect();
                let candidate_value = problem.objective(&candidate);
                if candidate_value <= value - 1e-4 * t * decrease {
                    theta = candidate;
                    value = candidate_value;
                    accepted = true;
                    break;
                }
                t *= 0.5;
            }
            if !accepted {
                break;
            }
        }

        let intercept = theta[d];
        theta.truncate(d);
        Ok(Self {
            weights: theta,
            intercept,
            iterations,
        })
    }

    /// P(label = true | row).
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, MlError> {
        check_width(row, self.weights.len())?;
        let z = self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(sigmoid(z))
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
