//! Gradient-Boosted Regression Trees
//!
//! Squared-error boosting with exact greedy splits and L2-regularized leaf
//! weights. Each round fits a depth-limited tree to the current residuals and
//! adds it with shrinkage `learning_rate`.

use ndarray::{Array2, ArrayView1};

use super::ModelError;

// ============================================================================
// PARAMS
// ============================================================================

#[derive(Debug, Clone)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 penalty on leaf weights
    pub lambda: f64,
    /// Minimum samples on each side of a split
    pub min_child_weight: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone)]
struct RegressionTree {
    root: TreeNode,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    fn fit(x: &Array2<f64>, residuals: &[f64], params: &BoostingParams) -> Self {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        Self {
            root: Self::build(x, residuals, indices, 0, params),
        }
    }

    fn build(
        x: &Array2<f64>,
        residuals: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &BoostingParams,
    ) -> TreeNode {
        let sum: f64 = indices.iter().map(|&i| residuals[i]).sum();
        let leaf = TreeNode::Leaf {
            value: sum / (indices.len() as f64 + params.lambda),
        };

        if depth >= params.max_depth || indices.len() < 2 {
            return leaf;
        }

        let Some(split) = Self::best_split(x, residuals, &indices, sum, params) else {
            return leaf;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, split.feature]] < split.threshold);

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(Self::build(x, residuals, left, depth + 1, params)),
            right: Box::new(Self::build(x, residuals, right, depth + 1, params)),
        }
    }

    fn best_split(
        x: &Array2<f64>,
        residuals: &[f64],
        indices: &[usize],
        total: f64,
        params: &BoostingParams,
    ) -> Option<SplitCandidate> {
        let n = indices.len() as f64;
        let parent_score = total * total / (n + params.lambda);
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..x.ncols() {
            let mut column: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (x[[i, feature]], residuals[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 1..column.len() {
                left_sum += column[k - 1].1;
                if column[k - 1].0 == column[k].0 {
                    continue;
                }

                let left_n = k as f64;
                let right_n = n - left_n;
                if left_n < params.min_child_weight || right_n < params.min_child_weight {
                    continue;
                }

                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / (left_n + params.lambda)
                    + right_sum * right_sum / (right_n + params.lambda)
                    - parent_score;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (column[k - 1].0 + column[k].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    fn predict(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if row[*feature] < *threshold { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }
}

// ============================================================================
// ENSEMBLE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct GradientBoostedRegressor {
    params: BoostingParams,
    base_score: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
    fitted: bool,
}

impl GradientBoostedRegressor {
    pub fn new(params: BoostingParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fit from scratch, discarding any previous trees
    pub fn fit(&mut self, x: &Array2<f64>, y: &[f64]) -> Result<(), ModelError> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }

        self.base_score = y.iter().sum::<f64>() / y.len() as f64;
        self.n_features = x.ncols();
        self.trees.clear();
        self.fitted = false;

        let mut predictions = vec![self.base_score; y.len()];
        let mut residuals = vec![0.0; y.len()];

        for round in 0..self.params.n_estimators {
            for (r, (target, pred)) in residuals.iter_mut().zip(y.iter().zip(&predictions)) {
                *r = target - pred;
            }

            let tree = RegressionTree::fit(x, &residuals, &self.params);
            for (i, pred) in predictions.iter_mut().enumerate() {
                *pred += self.params.learning_rate * tree.predict(x.row(i));
            }
            self.trees.push(tree);

            if round % 25 == 0 {
                let mse = residuals.iter().map(|r| r * r).sum::<f64>() / y.len() as f64;
                log::trace!("boosting round {}: mse {:.5}", round, mse);
            }
        }

        self.fitted = true;
        Ok(())
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        self.base_score
            + self.params.learning_rate * self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<f64>, ModelError> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(x.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }
}
