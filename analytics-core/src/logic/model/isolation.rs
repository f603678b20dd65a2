//! Isolation Forest
//!
//! Outliers are isolated by fewer random axis-aligned cuts than inliers.
//! Score convention: `score_samples` is the negated anomaly score
//! `-2^(-E[h(x)] / c(psi))`, so lower means more abnormal.
//! `decision_function` subtracts an offset chosen so that the `contamination`
//! fraction of training rows fall below zero.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ModelError;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// PARAMS
// ============================================================================

#[derive(Debug, Clone)]
pub struct IsolationParams {
    pub n_estimators: usize,
    /// Sub-sample size per tree (capped at the number of rows)
    pub max_samples: usize,
    /// Expected fraction of outliers in the training data
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone)]
enum IsolationNode {
    Internal {
        feature: usize,
        split: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    fn fit(x: &Array2<f64>, sample: Vec<usize>, height_limit: usize, rng: &mut StdRng) -> Self {
        Self {
            root: Self::build(x, sample, 0, height_limit, rng),
        }
    }

    fn build(
        x: &Array2<f64>,
        indices: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> IsolationNode {
        if depth >= height_limit || indices.len() <= 1 {
            return IsolationNode::Leaf { size: indices.len() };
        }

        // Only features that still vary inside this node can cut it
        let ranges: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|feature| {
                let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    let v = x[[i, feature]];
                    (lo.min(v), hi.max(v))
                });
                (max > min).then_some((feature, min, max))
            })
            .collect();

        if ranges.is_empty() {
            return IsolationNode::Leaf { size: indices.len() };
        }

        let (feature, min, max) = ranges[rng.gen_range(0..ranges.len())];
        let split = rng.gen_range(min..max);

        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| x[[i, feature]] < split);

        IsolationNode::Internal {
            feature,
            split,
            left: Box::new(Self::build(x, left, depth + 1, height_limit, rng)),
            right: Box::new(Self::build(x, right, depth + 1, height_limit, rng)),
        }
    }

    fn path_length(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                IsolationNode::Leaf { size } => return depth as f64 + average_path_length(*size),
                IsolationNode::Internal { feature, split, left, right } => {
                    node = if row[*feature] < *split { left.as_ref() } else { right.as_ref() };
                    depth += 1;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile, `q` in [0, 100]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct IsolationForest {
    params: IsolationParams,
    trees: Vec<IsolationTree>,
    sample_size: usize,
    n_features: usize,
    offset: f64,
}

impl IsolationForest {
    pub fn new(params: IsolationParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &IsolationParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Threshold subtracted from `score_samples` in `decision_function`
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), ModelError> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyDataset);
        }

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.sample_size = self.params.max_samples.clamp(1, n);
        self.n_features = x.ncols();
        let height_limit = (self.sample_size.max(2) as f64).log2().ceil() as usize;

        self.trees = (0..self.params.n_estimators.max(1))
            .map(|_| {
                let sample = rand::seq::index::sample(&mut rng, n, self.sample_size).into_vec();
                IsolationTree::fit(x, sample, height_limit, &mut rng)
            })
            .collect();

        let train_scores = self.score_samples(x)?;
        self.offset = percentile(&train_scores, self.params.contamination * 100.0).unwrap_or(-0.5);

        log::debug!(
            "Isolation forest fitted: {} trees, psi={}, offset={:.4}",
            self.trees.len(),
            self.sample_size,
            self.offset
        );
        Ok(())
    }

    /// Negated anomaly score per row; lower is more abnormal
    pub fn score_samples(&self, x: &Array2<f64>) -> Result<Vec<f64>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        let norm = average_path_length(self.sample_size).max(f64::EPSILON);
        let scores = x
            .rows()
            .into_iter()
            .map(|row| {
                let mean_depth = self.trees.iter().map(|t| t.path_length(row)).sum::<f64>()
                    / self.trees.len() as f64;
                -(2f64).powf(-mean_depth / norm)
            })
            .collect();
        Ok(scores)
    }

    /// Shifted score: negative for outliers, non-negative for inliers
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Vec<f64>, ModelError> {
        Ok(self
            .score_samples(x)?
            .into_iter()
            .map(|s| s - self.offset)
            .collect())
    }

    /// `true` where the row is an outlier
    pub fn predict_outliers(&self, x: &Array2<f64>) -> Result<Vec<bool>, ModelError> {
        Ok(self.decision_function(x)?.into_iter().map(|d| d < 0.0).collect())
    }
}
