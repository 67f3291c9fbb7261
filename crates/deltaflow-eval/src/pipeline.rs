//! Hold-out evaluation orchestration.

use tracing::{info, instrument};

use crate::error::EvalError;
use crate::metrics::{r2, rmse};
use crate::regressor::{FittedModel, Regressor};
use crate::split::{SplitIndices, TrainTestSplit};

/// Configuration for one hold-out evaluation.
///
/// Construct via [`EvaluationConfig::new`], then chain `with_seed` if desired.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    split: TrainTestSplit,
}

/// Results of a hold-out evaluation.
#[derive(Debug)]
pub struct EvaluationReport {
    /// Root mean squared error over the test partition.
    pub rmse: f64,
    /// Coefficient of determination over the test partition.
    pub r2: f64,
    /// Predicted discharge for each test row, in partition order.
    pub predictions: Vec<f64>,
    /// Observed (actual) target for each test row, aligned with `predictions`.
    pub observed: Vec<f64>,
    /// Feature importance ranking from the fitted model.
    pub importances: Vec<(String, f64)>,
    /// Number of training rows.
    pub n_train: usize,
    /// Number of test rows.
    pub n_test: usize,
}

impl EvaluationConfig {
    /// Create a new evaluation holding out the given fraction of rows.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidTestFraction`] unless
    /// `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, EvalError> {
        Ok(Self {
            split: TrainTestSplit::new(test_fraction)?,
        })
    }

    /// Set the random seed for the partition shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split = self.split.with_seed(seed);
        self
    }

    /// Run the evaluation: partition, fit, predict, score.
    ///
    /// `features` is the row-major feature matrix, `targets` the paired
    /// target vector, `feature_names` the column labels passed through to
    /// the collaborator. Partitioning applies one shuffled index set to
    /// both `features` and `targets`, so the hold-out rows are aligned.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvalError::RowCountMismatch`] | features and targets disagree in length |
    /// | [`EvalError::EmptyDataset`], [`EvalError::EmptyPartition`] | partition impossible |
    /// | [`EvalError::FitFailed`] | collaborator failed while fitting |
    /// | [`EvalError::PredictFailed`] | collaborator failed while predicting |
    /// | [`EvalError::PredictionCountMismatch`] | collaborator returned the wrong count |
    /// | [`EvalError::ZeroVarianceTarget`] | R² undefined on the test targets |
    #[instrument(skip_all, fields(n_rows = features.len()))]
    pub fn run<R: Regressor>(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
        regressor: &R,
    ) -> Result<EvaluationReport, EvalError> {
        if features.len() != targets.len() {
            return Err(EvalError::RowCountMismatch {
                n_rows: features.len(),
                n_targets: targets.len(),
            });
        }

        let indices = self.split.split(features.len())?;

        let train_features = SplitIndices::gather_rows(&indices.train, features);
        let train_targets = SplitIndices::gather(&indices.train, targets);
        let test_features = SplitIndices::gather_rows(&indices.test, features);
        let test_targets = SplitIndices::gather(&indices.test, targets);

        info!(
            n_train = train_features.len(),
            n_test = test_features.len(),
            "fitting regression model"
        );

        let fitted = regressor
            .fit(&train_features, &train_targets, feature_names)
            .map_err(|source| EvalError::FitFailed { source })?;

        let predictions = fitted
            .predict_batch(&test_features)
            .map_err(|source| EvalError::PredictFailed { source })?;

        if predictions.len() != test_targets.len() {
            return Err(EvalError::PredictionCountMismatch {
                expected: test_targets.len(),
                got: predictions.len(),
            });
        }

        let rmse = rmse(&test_targets, &predictions)?;
        let r2 = r2(&test_targets, &predictions)?;
        let importances = fitted.feature_importances();

        info!(rmse, r2, "evaluation complete");

        Ok(EvaluationReport {
            rmse,
            r2,
            predictions,
            observed: test_targets,
            importances,
            n_train: indices.train.len(),
            n_test: indices.test.len(),
        })
    }
}
