//! Prediction methods for the Random Forest regression ensemble.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::ForestError;
use crate::forest::RandomForest;

impl RandomForest {
    /// Predict the target value for a single sample.
    ///
    /// Returns the mean of the per-tree predictions.
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

        let mut total = 0.0f64;
        for tree in &self.trees {
            total += tree.predict(sample)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    /// Predict target values for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] if any sample has
    /// the wrong feature count.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ForestError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RandomForestConfig;

    fn make_step_data() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
        let features: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..40).map(|i| if i < 20 { 1.0 } else { 9.0 }).collect();
        (features, targets, vec!["x".to_string()])
    }

    #[test]
    fn batch_matches_individual() {
        let (features, targets, names) = make_step_data();
        let result = RandomForestConfig::new(10)
            .unwrap()
            .with_seed(42)
            .fit(&features, &targets, &names)
            .unwrap();
        let forest = result.forest();

        let batch = forest.predict_batch(&features).unwrap();
        for (i, sample) in features.iter().enumerate() {
            let single = forest.predict(sample).unwrap();
            assert_eq!(batch[i].to_bits(), single.to_bits());
        }
    }

    #[test]
    fn prediction_feature_mismatch() {
        let (features, targets, names) = make_step_data();
        let result = RandomForestConfig::new(5)
            .unwrap()
            .fit(&features, &targets, &names)
            .unwrap();
        let err = result.forest().predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            crate::ForestError::PredictionFeatureMismatch { expected: 1, got: 2 }
        ));
    }

    #[test]
    fn accessors_report_training_shape() {
        let (features, targets, names) = make_step_data();
        let result = RandomForestConfig::new(7)
            .unwrap()
            .fit(&features, &targets, &names)
            .unwrap();
        let forest = result.forest();
        assert_eq!(forest.n_trees(), 7);
        assert_eq!(forest.n_features(), 1);
        assert_eq!(forest.feature_names(), &["x".to_string()]);
    }
}
