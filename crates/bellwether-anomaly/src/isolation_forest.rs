//! Isolation Forest
//!
//! Anomalies are few and different, so random axis-aligned splits isolate
//! them in fewer steps than inliers. Each tree is grown on a subsample; the
//! anomaly score of a row is
//!
//! s(x) = 2^(-E[h(x)] / c(ψ))
//!
//! where:
//! - h(x) = path length of x in one tree, plus c(leaf size) at the leaf
//! - E[h(x)] = mean path length across the ensemble
//! - ψ = subsample size, c(n) = average path length of an unsuccessful BST search

use crate::{AnomalyDetector, AnomalyError, DEFAULT_SEED};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of trees in the ensemble (default: 100)
    pub n_estimators: usize,

    /// Rows drawn without replacement per tree, capped at the row count (default: 256)
    pub max_samples: usize,

    /// Expected fraction of anomalous rows (default: 0.05)
    pub contamination: f64,

    /// Random seed for subsampling and splits (default: 42)
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: DEFAULT_SEED,
        }
    }
}

impl IsolationForestConfig {
    /// Default configuration with a different contamination
    pub fn with_contamination(contamination: f64) -> Self {
        Self {
            contamination,
            ..Default::default()
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), AnomalyError> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnomalyError::InvalidContamination(self.contamination));
        }
        if self.n_estimators == 0 {
            return Err(AnomalyError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if self.max_samples == 0 {
            return Err(AnomalyError::InvalidParameter(
                "max_samples must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(data: &Array2<f64>, rows: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: Self::grow_node(data, rows, 0, max_depth, rng),
        }
    }

    fn grow_node(
        data: &Array2<f64>,
        rows: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        if depth >= max_depth || rows.len() <= 1 {
            return Node::Leaf { size: rows.len() };
        }

        // Only features that still vary within this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..data.ncols())
            .filter_map(|feature| {
                let (lo, hi) = rows.iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &row| {
                        let v = data[[row, feature]];
                        (lo.min(v), hi.max(v))
                    },
                );
                (hi > lo).then_some((feature, lo, hi))
            })
            .collect();

        let Some(&(feature, lo, hi)) = candidates.choose(rng) else {
            return Node::Leaf { size: rows.len() };
        };

        // threshold in [lo, hi): the minimum always goes left, the maximum right
        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&row| data[[row, feature]] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Self::grow_node(data, left, depth + 1, max_depth, rng)),
            right: Box::new(Self::grow_node(data, right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, sample: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful search in a binary search tree of `n` nodes.
pub(crate) fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile of unsorted values, `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let last = sorted.len().saturating_sub(1);
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    n_features: usize,
    threshold: f64,
}

impl IsolationForest {
    /// Fit a forest to `data`.
    ///
    /// # Arguments
    /// * `data` - Training matrix (rows x features), every value finite
    /// * `config` - Ensemble size, subsample size, contamination and seed
    ///
    /// # Returns
    /// * A forest whose threshold labels the `contamination` quantile of the
    ///   training rows as anomalous
    pub fn fit(data: &Array2<f64>, config: &IsolationForestConfig) -> Result<Self, AnomalyError> {
        config.validate()?;

        let (n_samples, n_features) = data.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(AnomalyError::EmptyTrainingSet {
                rows: n_samples,
                columns: n_features,
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(AnomalyError::NonFiniteValue);
        }

        let sample_size = config.max_samples.min(n_samples);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n_samples, sample_size).into_vec();
                IsolationTree::grow(data, rows, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            n_features,
            threshold: 0.0,
        };
        let training_scores = forest.score_samples(data)?;
        forest.threshold = quantile(&training_scores, 1.0 - config.contamination);

        Ok(forest)
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Rows each tree was grown on
    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Mean path length of one row across the ensemble.
    fn mean_path_length(&self, sample: ArrayView1<'_, f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.path_length(sample)).sum();
        total / self.trees.len() as f64
    }
}

impl AnomalyDetector for IsolationForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn score_samples(&self, data: &Array2<f64>) -> Result<Vec<f64>, AnomalyError> {
        if data.ncols() != self.n_features {
            return Err(AnomalyError::FeatureCountMismatch {
                expected: self.n_features,
                actual: data.ncols(),
            });
        }

        let normalizer = average_path_length(self.sample_size);
        Ok(data
            .rows()
            .into_iter()
            .map(|row| {
                if normalizer > 0.0 {
                    2.0_f64.powf(-self.mean_path_length(row) / normalizer)
                } else {
                    0.5
                }
            })
            .collect())
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
