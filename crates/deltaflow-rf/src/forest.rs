//! Random Forest regression training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{MaxFeatures, OobMode, RandomForestConfig};
use crate::error::ForestError;
use crate::importance::rank_importances;
use crate::oob::compute_oob;
use crate::result::{RandomForestResult, TrainingMetadata};
use crate::tree::{RegressionTree, RegressionTreeConfig};

/// A fitted Random Forest regression ensemble.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<RegressionTree>,
    pub(crate) n_features: usize,
    pub(crate) feature_names: Vec<String>,
}

/// Resolve `MaxFeatures` to a concrete count.
pub(crate) fn resolve_max_features(
    max_features: MaxFeatures,
    n_features: usize,
) -> Result<usize, ForestError> {
    let resolved = match max_features {
        MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
        MaxFeatures::Log2 => (n_features as f64).log2().ceil().max(1.0) as usize,
        MaxFeatures::Fraction(f) => (n_features as f64 * f).ceil() as usize,
        MaxFeatures::Fixed(n) => n,
        MaxFeatures::All => n_features,
    };
    if resolved == 0 || resolved > n_features {
        return Err(ForestError::InvalidMaxFeatures {
            max_features: resolved,
            n_features,
        });
    }
    Ok(resolved)
}

/// Generate a bootstrap sample and the out-of-bag indices.
fn bootstrap_sample(
    n_samples: usize,
    draw_count: usize,
    rng: &mut impl Rng,
) -> (Vec<usize>, Vec<usize>) {
    let mut in_bag = vec![false; n_samples];
    let mut bootstrap_indices = Vec::with_capacity(draw_count);
    for _ in 0..draw_count {
        let idx = rng.gen_range(0..n_samples);
        bootstrap_indices.push(idx);
        in_bag[idx] = true;
    }
    let oob_indices: Vec<usize> = (0..n_samples).filter(|&i| !in_bag[i]).collect();
    (bootstrap_indices, oob_indices)
}

/// Train the Random Forest regression ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train(
    config: &RandomForestConfig,
    features: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
) -> Result<RandomForestResult, ForestError> {
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
    let max_features_resolved = resolve_max_features(config.max_features, n_features)?;

    if config.bootstrap_fraction <= 0.0 || config.bootstrap_fraction > 1.0 {
        return Err(ForestError::InvalidBootstrapFraction {
            fraction: config.bootstrap_fraction,
        });
    }

    let draw_count = ((n_samples as f64) * config.bootstrap_fraction).ceil() as usize;

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features,
        max_features = max_features_resolved,
        draw_count,
        "training random forest regressor"
    );

    // Generate per-tree seeds from master RNG.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    // Capture config fields needed in closure (avoids borrowing config across thread boundary).
    let max_depth = config.max_depth;
    let min_samples_split = config.min_samples_split;
    let min_samples_leaf = config.min_samples_leaf;

    // Parallel tree training.
    let tree_results: Vec<(RegressionTree, Vec<usize>)> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (bootstrap_indices, oob_indices) =
                bootstrap_sample(n_samples, draw_count, &mut rng);

            // Build bootstrap dataset: row-major features.
            let boot_features: Vec<Vec<f64>> = bootstrap_indices
                .iter()
                .map(|&i| features[i].clone())
                .collect();
            let boot_targets: Vec<f64> = bootstrap_indices.iter().map(|&i| targets[i]).collect();

            let tree_config = RegressionTreeConfig::new()
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split)
                .with_min_samples_leaf(min_samples_leaf)
                .with_max_features(Some(max_features_resolved))
                .with_seed(rng.r#gen());

            // All inputs are pre-validated — fit cannot fail on data errors.
            let tree = tree_config
                .fit(&boot_features, &boot_targets)
                .expect("tree fit should not fail on pre-validated data");

            (tree, oob_indices)
        })
        .collect();

    let mut trees = Vec::with_capacity(config.n_trees);
    let mut oob_indices_per_tree = Vec::with_capacity(config.n_trees);
    for (tree, oob) in tree_results {
        trees.push(tree);
        oob_indices_per_tree.push(oob);
    }

    // Aggregate feature importances.
    let per_tree_importances: Vec<Vec<f64>> =
        trees.iter().map(|t| t.feature_importances()).collect();
    let importances = rank_importances(&per_tree_importances, feature_names);

    debug!(n_trees_trained = trees.len(), "tree training complete");

    // OOB evaluation.
    let oob_score = if config.oob_mode == OobMode::Enabled {
        Some(compute_oob(
            &trees,
            features,
            targets,
            &oob_indices_per_tree,
        )?)
    } else {
        None
    };

    let forest = RandomForest {
        trees,
        n_features,
        feature_names: feature_names.to_vec(),
    };

    let metadata = TrainingMetadata {
        n_trees: config.n_trees,
        n_features,
        n_samples,
        max_features_resolved,
    };

    info!(
        oob_r2 = oob_score.as_ref().map(|s| s.r2),
        "random forest training complete"
    );

    Ok(RandomForestResult::new(forest, importances, oob_score, metadata))
}

#[cfg(test)]
mod tests {
    use crate::config::{MaxFeatures, OobMode, RandomForestConfig};

    /// Generate a noiseless piecewise-linear regression dataset.
    ///
    /// Target is `3x` on [0, 5) and `3x + 40` on [5, 10); feature 1 is a
    /// constant distractor.
    fn make_regression_data() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..60 {
            let x = i as f64 / 6.0;
            let y = if x < 5.0 { 3.0 * x } else { 3.0 * x + 40.0 };
            features.push(vec![x, 0.5]);
            targets.push(y);
        }
        let names = vec!["x".to_string(), "noise".to_string()];
        (features, targets, names)
    }

    fn r2_on(predictions: &[f64], targets: &[f64]) -> f64 {
        let n = targets.len() as f64;
        let mean = targets.iter().sum::<f64>() / n;
        let ss_res: f64 = targets
            .iter()
            .zip(predictions)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
        1.0 - ss_res / ss_tot
    }

    #[test]
    fn piecewise_linear_high_r2() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(50).unwrap().with_seed(42);
        let result = config.fit(&features, &targets, &names).unwrap();

        let predictions = result.forest().predict_batch(&features).unwrap();
        let r2 = r2_on(&predictions, &targets);
        assert!(r2 > 0.95, "training r2 = {r2}");
    }

    #[test]
    fn oob_score_computed() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(50)
            .unwrap()
            .with_oob_mode(OobMode::Enabled)
            .with_seed(42);
        let result = config.fit(&features, &targets, &names).unwrap();

        let oob = result.oob_score().expect("OOB should be computed");
        assert!(oob.n_oob_samples > 0);
        assert!(oob.mse >= 0.0);
        assert!(oob.r2 <= 1.0, "oob r2 = {}", oob.r2);
    }

    #[test]
    fn feature_importances_sum_to_one() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(20).unwrap().with_seed(42);
        let result = config.fit(&features, &targets, &names).unwrap();

        let total: f64 = result.importances().iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-10, "total = {total}");
    }

    #[test]
    fn informative_feature_ranked_first() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(20).unwrap().with_seed(42);
        let result = config.fit(&features, &targets, &names).unwrap();

        let top = &result.importances()[0];
        assert_eq!(top.name, "x");
        assert_eq!(top.rank, 1);
    }

    #[test]
    fn deterministic_with_same_seed() {
        let (features, targets, names) = make_regression_data();
        let result1 = RandomForestConfig::new(10)
            .unwrap()
            .with_seed(99)
            .fit(&features, &targets, &names)
            .unwrap();
        let result2 = RandomForestConfig::new(10)
            .unwrap()
            .with_seed(99)
            .fit(&features, &targets, &names)
            .unwrap();

        let preds1 = result1.forest().predict_batch(&features).unwrap();
        let preds2 = result2.forest().predict_batch(&features).unwrap();
        let bits1: Vec<u64> = preds1.iter().map(|p| p.to_bits()).collect();
        let bits2: Vec<u64> = preds2.iter().map(|p| p.to_bits()).collect();
        assert_eq!(bits1, bits2);
    }

    #[test]
    fn sqrt_max_features_still_learns() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(50)
            .unwrap()
            .with_max_features(MaxFeatures::Sqrt)
            .with_seed(42);
        let result = config.fit(&features, &targets, &names).unwrap();

        let predictions = result.forest().predict_batch(&features).unwrap();
        let r2 = r2_on(&predictions, &targets);
        assert!(r2 > 0.8, "training r2 = {r2}");
    }

    #[test]
    fn invalid_tree_count_error() {
        assert!(RandomForestConfig::new(0).is_err());
    }

    #[test]
    fn empty_dataset_error() {
        let config = RandomForestConfig::new(10).unwrap();
        let err = config.fit(&[], &[], &[]).unwrap_err();
        assert!(matches!(err, crate::ForestError::EmptyDataset));
    }

    #[test]
    fn invalid_bootstrap_fraction_error() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(10)
            .unwrap()
            .with_bootstrap_fraction(1.5);
        let err = config.fit(&features, &targets, &names).unwrap_err();
        assert!(matches!(
            err,
            crate::ForestError::InvalidBootstrapFraction { .. }
        ));
    }
}
