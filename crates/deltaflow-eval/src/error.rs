//! Error types for the evaluation pipeline.

use crate::regressor::CollaboratorError;

/// Errors from partitioning, metric computation, and pipeline orchestration.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Returned when the test fraction is not strictly between 0 and 1.
    #[error("test_fraction must be in (0.0, 1.0), got {fraction}")]
    InvalidTestFraction {
        /// The invalid test fraction provided.
        fraction: f64,
    },

    /// Returned when the dataset to partition has zero rows.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when a partition would leave train or test empty.
    #[error("cannot hold out {n_test} of {n_rows} rows: both partitions must be non-empty")]
    EmptyPartition {
        /// Total number of rows.
        n_rows: usize,
        /// Requested test partition size.
        n_test: usize,
    },

    /// Returned when the feature matrix and target vector disagree in length.
    #[error("{n_targets} targets provided for {n_rows} feature rows")]
    RowCountMismatch {
        /// Number of feature rows.
        n_rows: usize,
        /// Number of target values.
        n_targets: usize,
    },

    /// Returned when paired metric inputs have different lengths.
    #[error("metric inputs differ in length: {n_actual} actual vs {n_predicted} predicted")]
    MetricLengthMismatch {
        /// Number of actual values.
        n_actual: usize,
        /// Number of predicted values.
        n_predicted: usize,
    },

    /// Returned when a metric is requested over zero samples.
    #[error("metric undefined over zero samples")]
    EmptyMetricInput,

    /// Returned when the actual values have zero variance, making R² undefined.
    ///
    /// This is a numerical failure, distinct from invalid input: the metric
    /// denominator vanishes and no meaningful score exists.
    #[error("R² is undefined: actual values have zero variance")]
    ZeroVarianceTarget,

    /// Returned when the regression collaborator fails during fitting.
    #[error("model fitting failed")]
    FitFailed {
        /// The collaborator's error.
        #[source]
        source: CollaboratorError,
    },

    /// Returned when the regression collaborator fails during prediction.
    #[error("model prediction failed")]
    PredictFailed {
        /// The collaborator's error.
        #[source]
        source: CollaboratorError,
    },

    /// Returned when the collaborator yields a prediction count that does
    /// not match the test partition.
    #[error("model returned {got} predictions for {expected} test rows")]
    PredictionCountMismatch {
        /// Number of test rows.
        expected: usize,
        /// Number of predictions returned.
        got: usize,
    },
}
