use rand::Rng;

use crate::node::{FeatureIndex, Variance};

/// Compute the population variance of a set of targets from its running
/// sum and sum of squares.
///
/// Returns 0.0 for an empty set. Clamped at zero so float cancellation on
/// near-constant targets cannot yield a tiny negative variance.
#[must_use]
pub(crate) fn variance_from_moments(sum: f64, sum_sq: f64, n: usize) -> Variance {
    if n == 0 {
        return Variance::new(0.0);
    }
    let count = n as f64;
    let mean = sum / count;
    Variance::new((sum_sq / count - mean * mean).max(0.0))
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Threshold value.
    pub(crate) threshold: f64,
    /// Weighted variance decrease from this split (MDI formula).
    pub(crate) variance_decrease: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
    /// Number of samples in left child.
    pub(crate) n_left: usize,
    /// Number of samples in right child.
    pub(crate) n_right: usize,
}

/// Find the best variance-reducing split among a random subset of features.
///
/// For each of `max_features` randomly chosen features, sorts the
/// `(value, target)` pairs, scans left-to-right with incremental sum and
/// sum-of-squares updates, and tracks the globally best split by weighted
/// variance decrease.
///
/// Returns `None` when no valid split exists (all values identical, or
/// every boundary would violate `min_samples_leaf`).
///
/// # Column-major layout
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
/// `sample_indices` are indices into the inner Vecs and into `targets`.
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_features = features.len();
    let n_samples = sample_indices.len();

    if n_samples < 2 || n_features == 0 {
        return None;
    }

    // Parent moments.
    let mut parent_sum = 0.0f64;
    let mut parent_sum_sq = 0.0f64;
    for &si in sample_indices {
        parent_sum += targets[si];
        parent_sum_sq += targets[si] * targets[si];
    }
    let parent_variance = variance_from_moments(parent_sum, parent_sum_sq, n_samples);

    // Partial Fisher-Yates: shuffle only the first `max_features` positions.
    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let take = max_features.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        feature_order.swap(i, j);
    }
    let selected_features = &feature_order[..take];

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, f64)> = None;

    for &feat_idx in selected_features {
        let feat_col = &features[feat_idx];

        let mut sorted: Vec<(f64, usize)> = sample_indices
            .iter()
            .map(|&si| (feat_col[si], si))
            .collect();
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        // Incremental scan: left grows from empty, right shrinks from full.
        let mut left_sum = 0.0f64;
        let mut left_sum_sq = 0.0f64;
        let mut right_sum = parent_sum;
        let mut right_sum_sq = parent_sum_sq;

        for i in 0..(n_samples - 1) {
            let (val_i, si) = sorted[i];
            let target_i = targets[si];

            // Move sample i from right to left.
            left_sum += target_i;
            left_sum_sq += target_i * target_i;
            right_sum -= target_i;
            right_sum_sq -= target_i * target_i;

            let n_left = i + 1;
            let n_right = n_samples - n_left;

            // Skip if next value is identical (no valid boundary here).
            let val_next = sorted[i + 1].0;
            if val_i == val_next {
                continue;
            }

            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let left_variance = variance_from_moments(left_sum, left_sum_sq, n_left);
            let right_variance = variance_from_moments(right_sum, right_sum_sq, n_right);

            // Weighted variance decrease (MDI formula).
            let decrease = (n_samples as f64) * parent_variance.value()
                - (n_left as f64) * left_variance.value()
                - (n_right as f64) * right_variance.value();

            if decrease > best_decrease {
                best_decrease = decrease;
                let threshold = (val_i + val_next) / 2.0;
                best = Some((FeatureIndex::new(feat_idx), threshold));
            }
        }
    }

    let (best_feature, threshold) = best?;

    // Partition sample_indices into left/right.
    let feat_col = &features[best_feature.index()];
    let mut left_indices = Vec::with_capacity(n_samples / 2);
    let mut right_indices = Vec::with_capacity(n_samples / 2);
    for &si in sample_indices {
        if feat_col[si] <= threshold {
            left_indices.push(si);
        } else {
            right_indices.push(si);
        }
    }
    let n_left = left_indices.len();
    let n_right = right_indices.len();

    Some(SplitResult {
        feature: best_feature,
        threshold,
        variance_decrease: best_decrease,
        left_indices,
        right_indices,
        n_left,
        n_right,
    })
}
