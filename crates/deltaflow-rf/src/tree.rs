use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    ForestError,
    node::{Node, NodeIndex},
    split::{find_best_split, variance_from_moments},
};

/// Below this target variance a node is treated as pure and becomes a leaf.
const PURE_VARIANCE_EPS: f64 = 1e-12;

/// Configuration for a single CART regression tree.
///
/// Construct via [`RegressionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `min_samples_leaf`  | 1                     |
/// | `max_features`      | `None` (all features) |
/// | `seed`              | 42                    |
#[derive(Debug, Clone)]
pub struct RegressionTreeConfig {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: Option<usize>,
    pub(crate) seed: u64,
}

impl RegressionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }

    /// Set the maximum tree depth.
    ///
    /// `None` means grow until all leaves are pure or stopping conditions
    /// are met. `Some(d)` limits depth to `d` levels (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the maximum number of features to consider at each split.
    ///
    /// `None` means consider all features.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Train a regression tree on the provided row-major dataset.
    ///
    /// `features[sample_idx][feature_idx]` — row-major layout.
    /// `targets[sample_idx]` — continuous target values.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`ForestError::EmptyDataset`] | `features` is empty |
    /// | [`ForestError::ZeroFeatures`] | rows have zero feature columns |
    /// | [`ForestError::TargetLengthMismatch`] | `targets.len() != features.len()` |
    /// | [`ForestError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`ForestError::NonFiniteValue`] | any feature value is NaN or infinite |
    /// | [`ForestError::NonFiniteTarget`] | any target value is NaN or infinite |
    /// | [`ForestError::InvalidMaxFeatures`] | `max_features` resolves outside [1, n_features] |
    /// | [`ForestError::InvalidMaxDepth`] | `max_depth` is `Some(0)` |
    /// | [`ForestError::InvalidMinSamplesSplit`] | `min_samples_split` < 2 |
    /// | [`ForestError::InvalidMinSamplesLeaf`] | `min_samples_leaf` < 1 |
    #[instrument(skip(self, features, targets), fields(n_samples = features.len()))]
    pub fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<RegressionTree, ForestError> {
        // --- Validate inputs ---
        if features.is_empty() {
            return Err(ForestError::EmptyDataset);
        }

        let n_samples = features.len();
        let n_features = features[0].len();

        if n_features == 0 {
            return Err(ForestError::ZeroFeatures);
        }

        if targets.len() != n_samples {
            return Err(ForestError::TargetLengthMismatch {
                n_samples,
                n_targets: targets.len(),
            });
        }

        for (sample_index, row) in features.iter().enumerate() {
            if row.len() != n_features {
                return Err(ForestError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            for (feature_index, &val) in row.iter().enumerate() {
                if !val.is_finite() {
                    return Err(ForestError::NonFiniteValue {
                        sample_index,
                        feature_index,
                    });
                }
            }
        }

        for (sample_index, &target) in targets.iter().enumerate() {
            if !target.is_finite() {
                return Err(ForestError::NonFiniteTarget { sample_index });
            }
        }

        // --- Validate config ---
        if let Some(d) = self.max_depth
            && d == 0
        {
            return Err(ForestError::InvalidMaxDepth { max_depth: 0 });
        }

        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }

        if self.min_samples_leaf < 1 {
            return Err(ForestError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }

        let max_features = self.max_features.unwrap_or(n_features);
        if max_features == 0 || max_features > n_features {
            return Err(ForestError::InvalidMaxFeatures {
                max_features,
                n_features,
            });
        }

        debug!(n_samples, n_features, max_features, "fitting regression tree");

        // Convert to column-major layout for find_best_split.
        let col_features: Vec<Vec<f64>> = (0..n_features)
            .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
            .collect();

        let sample_indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut arena: Vec<Node> = Vec::new();

        let root = build_tree(
            &col_features,
            targets,
            &sample_indices,
            self,
            0,
            &mut rng,
            &mut arena,
            max_features,
        );

        debug!(
            root_index = root.index(),
            n_nodes = arena.len(),
            "regression tree built"
        );

        Ok(RegressionTree {
            nodes: arena,
            n_features,
        })
    }
}

impl Default for RegressionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively build the arena-based regression tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`.
#[allow(clippy::too_many_arguments)]
fn build_tree(
    col_features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    config: &RegressionTreeConfig,
    depth: usize,
    rng: &mut ChaCha8Rng,
    arena: &mut Vec<Node>,
    max_features: usize,
) -> NodeIndex {
    let n_samples = sample_indices.len();

    // Accumulate target moments.
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &si in sample_indices {
        sum += targets[si];
        sum_sq += targets[si] * targets[si];
    }
    let variance = variance_from_moments(sum, sum_sq, n_samples);
    let mean = sum / n_samples as f64;

    let make_leaf = |arena: &mut Vec<Node>| -> NodeIndex {
        let idx = arena.len();
        arena.push(Node::Leaf {
            prediction: mean,
            variance,
            n_samples,
        });
        NodeIndex::new(idx)
    };

    // Stopping conditions → leaf.
    let depth_exceeded = config.max_depth.is_some_and(|max_d| depth >= max_d);
    let too_few = n_samples < config.min_samples_split;
    let pure = variance.value() < PURE_VARIANCE_EPS;

    if too_few || pure || depth_exceeded {
        return make_leaf(arena);
    }

    let split_result = find_best_split(
        col_features,
        targets,
        sample_indices,
        max_features,
        config.min_samples_leaf,
        rng,
    );

    let split = match split_result {
        Some(s) => s,
        None => return make_leaf(arena),
    };

    // Arena pattern: reserve index, recurse, then overwrite with the split.
    let node_idx = arena.len();
    arena.push(Node::Leaf {
        prediction: mean,
        variance,
        n_samples,
    });

    let left_idx = build_tree(
        col_features,
        targets,
        &split.left_indices,
        config,
        depth + 1,
        rng,
        arena,
        max_features,
    );

    let right_idx = build_tree(
        col_features,
        targets,
        &split.right_indices,
        config,
        depth + 1,
        rng,
        arena,
        max_features,
    );

    arena[node_idx] = Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: left_idx,
        right: right_idx,
        variance,
        n_samples,
        variance_decrease: split.variance_decrease,
    };

    NodeIndex::new(node_idx)
}

/// A fitted CART regression tree.
///
/// Stored as an arena-based `Vec<Node>` with index references for
/// cache-friendly traversal.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
}

impl RegressionTree {
    /// Predict the target value for a single sample.
    ///
    /// Traverses from the root (index 0): at each `Split`, goes left when
    /// `sample[feature] <= threshold`, right otherwise, and returns the
    /// mean-target prediction of the reached leaf.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when
    /// `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let leaf = self.traverse(sample);
        match &self.nodes[leaf] {
            Node::Leaf { prediction, .. } => Ok(*prediction),
            Node::Split { .. } => unreachable!("traverse always ends at a leaf"),
        }
    }

    /// Compute Mean Decrease in Impurity (MDI) feature importances.
    ///
    /// For each `Split` node, the `variance_decrease` is accumulated by
    /// feature index, then the totals are normalized so they sum to 1.0.
    /// Returns a `Vec` of length `n_features`; all zeros when the tree is
    /// a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                variance_decrease,
                ..
            } = node
            {
                totals[feature.index()] += variance_decrease;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        // BFS: (node_index, current_depth)
        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => {
                    if d > max_depth {
                        max_depth = d;
                    }
                }
                Node::Split { left, right, .. } => {
                    queue.push_back((left.index(), d + 1));
                    queue.push_back((right.index(), d + 1));
                }
            }
        }

        max_depth
    }

    /// Traverse the tree from the root and return the arena index of the leaf.
    fn traverse(&self, sample: &[f64]) -> usize {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { .. } => return idx,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if sample[feature.index()] <= *threshold {
                        idx = left.index();
                    } else {
                        idx = right.index();
                    }
                }
            }
        }
    }
}
