//! Accuracy regression tests for deltaflow-rf.
//!
//! These tests verify that algorithmic changes do not degrade Random Forest
//! regression quality on a deterministic synthetic dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use deltaflow_rf::{OobMode, RandomForestConfig};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic regression dataset
// ---------------------------------------------------------------------------

/// Generate a 300-sample, 6-feature regression dataset.
///
/// The target is `10*f0 + 5*f1 - 3*f2` plus Normal(0, 0.5) noise; features
/// f3-f5 are uninformative uniform noise.
fn make_regression() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let noise_dist = Normal::new(0.0, 0.5).unwrap();

    let n_samples = 300;
    let n_features = 6;

    let mut features = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>()).collect();
        let y = 10.0 * row[0] + 5.0 * row[1] - 3.0 * row[2] + noise_dist.sample(&mut rng);
        features.push(row);
        targets.push(y);
    }
    let names: Vec<String> = (0..n_features).map(|f| format!("f{f}")).collect();
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

// ---------------------------------------------------------------------------
// a) training_r2_above_threshold
// ---------------------------------------------------------------------------

/// Training R² with 100 trees must exceed 0.9 (the forest should fit a
/// low-noise linear signal closely).
#[test]
fn training_r2_above_threshold() {
    let (features, targets, names) = make_regression();
    let config = RandomForestConfig::new(100).unwrap().with_seed(42);
    let result = config.fit(&features, &targets, &names).unwrap();

    let predictions = result.forest().predict_batch(&features).unwrap();
    let r2 = r2_on(&predictions, &targets);
    assert!(r2 > 0.9, "training r2 {r2} <= 0.9");
}

// ---------------------------------------------------------------------------
// b) oob_r2_above_threshold
// ---------------------------------------------------------------------------

/// OOB R² with 100 trees must exceed 0.7 on the synthetic dataset.
#[test]
fn oob_r2_above_threshold() {
    let (features, targets, names) = make_regression();
    let config = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .with_oob_mode(OobMode::Enabled);
    let result = config.fit(&features, &targets, &names).unwrap();

    let oob = result
        .oob_score()
        .expect("OOB score must be computed when OobMode::Enabled");
    assert!(oob.r2 > 0.7, "oob r2 {} <= 0.7", oob.r2);
    assert!(oob.n_oob_samples > 0);
}

// ---------------------------------------------------------------------------
// c) top_features_are_informative
// ---------------------------------------------------------------------------

/// The top 3 features by importance must include at least 2 of f0, f1, f2.
///
/// f0-f2 drive the target; f3-f5 are pure noise. A correctly functioning
/// forest must rank informative features above noise features.
#[test]
fn top_features_are_informative() {
    let (features, targets, names) = make_regression();
    let config = RandomForestConfig::new(100).unwrap().with_seed(42);
    let result = config.fit(&features, &targets, &names).unwrap();

    let informative: std::collections::HashSet<&str> =
        ["f0", "f1", "f2"].iter().copied().collect();

    let top3_names: Vec<&str> = result
        .importances()
        .iter()
        .take(3)
        .map(|f| f.name.as_str())
        .collect();

    let informative_in_top3 = top3_names.iter().filter(|&&n| informative.contains(n)).count();

    assert!(
        informative_in_top3 >= 2,
        "only {informative_in_top3}/3 of top-3 features are informative; top-3: {top3_names:?}"
    );
}

// ---------------------------------------------------------------------------
// d) deterministic_predictions
// ---------------------------------------------------------------------------

/// Same config and seed must produce identical predictions across two
/// independent fits.
#[test]
fn deterministic_predictions() {
    let (features, targets, names) = make_regression();
    let config = RandomForestConfig::new(100).unwrap().with_seed(42);

    let result1 = config.fit(&features, &targets, &names).unwrap();
    let result2 = config.fit(&features, &targets, &names).unwrap();

    let preds1 = result1.forest().predict_batch(&features).unwrap();
    let preds2 = result2.forest().predict_batch(&features).unwrap();

    let bits1: Vec<u64> = preds1.iter().map(|p| p.to_bits()).collect();
    let bits2: Vec<u64> = preds2.iter().map(|p| p.to_bits()).collect();
    assert_eq!(bits1, bits2, "predictions differ across runs with the same seed");
}

// ---------------------------------------------------------------------------
// e) depth_cap_respected
// ---------------------------------------------------------------------------

/// Trees must honor the configured depth cap while still learning the signal.
#[test]
fn depth_cap_respected() {
    let (features, targets, names) = make_regression();
    let config = RandomForestConfig::new(50)
        .unwrap()
        .with_max_depth(Some(15))
        .with_seed(42);
    let result = config.fit(&features, &targets, &names).unwrap();

    let predictions = result.forest().predict_batch(&features).unwrap();
    let r2 = r2_on(&predictions, &targets);
    assert!(r2 > 0.85, "depth-capped training r2 {r2} <= 0.85");
}
