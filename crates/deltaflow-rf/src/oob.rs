//! Out-of-bag (OOB) evaluation for Random Forest regression.

use crate::error::ForestError;
use crate::tree::RegressionTree;

/// Out-of-bag evaluation result.
#[derive(Debug, Clone)]
pub struct OobScore {
    /// Mean squared error over OOB predictions.
    pub mse: f64,
    /// Coefficient of determination over OOB predictions.
    pub r2: f64,
    /// Number of samples that had at least one OOB tree.
    pub n_oob_samples: usize,
}

/// Compute out-of-bag predictions and scores.
///
/// For each sample, only trees where the sample was NOT in the bootstrap
/// contribute; the OOB prediction is the mean of those trees' outputs.
/// Samples with no OOB tree are skipped.
pub(crate) fn compute_oob(
    trees: &[RegressionTree],
    features: &[Vec<f64>],
    targets: &[f64],
    oob_indices_per_tree: &[Vec<usize>],
) -> Result<OobScore, ForestError> {
    let n_samples = features.len();

    // Per-sample running sum of OOB tree predictions plus contribution count.
    let mut prediction_sums = vec![0.0f64; n_samples];
    let mut tree_counts = vec![0usize; n_samples];

    for (tree_idx, oob_indices) in oob_indices_per_tree.iter().enumerate() {
        for &sample_idx in oob_indices {
            let pred = trees[tree_idx].predict(&features[sample_idx])?;
            prediction_sums[sample_idx] += pred;
            tree_counts[sample_idx] += 1;
        }
    }

    let n_oob_samples = tree_counts.iter().filter(|&&c| c > 0).count();
    if n_oob_samples == 0 {
        return Err(ForestError::OobEvaluationFailed {
            reason: "no sample has any OOB tree".to_string(),
        });
    }

    // First pass: OOB mean target (for R² denominator).
    let mut target_sum = 0.0f64;
    for (i, &count) in tree_counts.iter().enumerate() {
        if count > 0 {
            target_sum += targets[i];
        }
    }
    let target_mean = target_sum / n_oob_samples as f64;

    // Second pass: residual and total sums of squares.
    let mut ss_res = 0.0f64;
    let mut ss_tot = 0.0f64;
    for (i, &count) in tree_counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let prediction = prediction_sums[i] / count as f64;
        ss_res += (targets[i] - prediction).powi(2);
        ss_tot += (targets[i] - target_mean).powi(2);
    }

    if ss_tot == 0.0 {
        return Err(ForestError::OobEvaluationFailed {
            reason: "OOB targets have zero variance, R² is undefined".to_string(),
        });
    }

    Ok(OobScore {
        mse: ss_res / n_oob_samples as f64,
        r2: 1.0 - ss_res / ss_tot,
        n_oob_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::compute_oob;
    use crate::error::ForestError;
    use crate::tree::RegressionTreeConfig;

    fn fit_tree(features: &[Vec<f64>], targets: &[f64]) -> crate::tree::RegressionTree {
        RegressionTreeConfig::new().fit(features, targets).unwrap()
    }

    #[test]
    fn no_oob_samples_is_an_error() {
        let features = vec![vec![1.0], vec![2.0]];
        let targets = vec![1.0, 2.0];
        let tree = fit_tree(&features, &targets);
        let err = compute_oob(&[tree], &features, &targets, &[vec![]]).unwrap_err();
        assert!(matches!(err, ForestError::OobEvaluationFailed { .. }));
    }

    #[test]
    fn zero_variance_oob_targets_is_an_error() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![5.0, 5.0, 5.0];
        let tree = fit_tree(&features, &targets);
        let err = compute_oob(&[tree], &features, &targets, &[vec![0, 1]]).unwrap_err();
        assert!(matches!(err, ForestError::OobEvaluationFailed { .. }));
    }

    #[test]
    fn perfect_tree_gives_zero_mse() {
        // Tree trained on the full step data predicts it exactly, so OOB
        // residuals vanish whichever samples are marked out-of-bag.
        let features = vec![vec![1.0], vec![2.0], vec![10.0], vec![11.0]];
        let targets = vec![5.0, 5.0, 50.0, 50.0];
        let tree = fit_tree(&features, &targets);
        let score = compute_oob(&[tree], &features, &targets, &[vec![0, 2]]).unwrap();
        assert_eq!(score.n_oob_samples, 2);
        assert!(score.mse < 1e-12, "mse = {}", score.mse);
        assert!((score.r2 - 1.0).abs() < 1e-12, "r2 = {}", score.r2);
    }
}
