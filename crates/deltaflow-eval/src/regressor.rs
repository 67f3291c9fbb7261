//! The collaborator seam: any model exposing fit / predict / importances
//! can be evaluated by the pipeline.

/// Boxed error crossing the collaborator boundary.
///
/// The pipeline does not interpret collaborator errors — it wraps them with
/// the failing stage and surfaces them unchanged.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An unfitted regression model.
///
/// Implementations are expected to be deterministic for a fixed internal
/// seed: fitting the same data twice must yield models with identical
/// predictions.
pub trait Regressor {
    /// The fitted model type produced by [`Regressor::fit`].
    type Fitted: FittedModel;

    /// Fit the model to row-major `features` and paired `targets`.
    ///
    /// `feature_names` label the columns for importance reporting.
    ///
    /// # Errors
    ///
    /// Any collaborator failure, boxed; the pipeline reports it as a
    /// fitting-stage failure.
    fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
    ) -> Result<Self::Fitted, CollaboratorError>;
}

/// A fitted regression model.
pub trait FittedModel {
    /// Predict a target value for every row of `features`.
    ///
    /// # Errors
    ///
    /// Any collaborator failure, boxed; the pipeline reports it as a
    /// prediction-stage failure.
    fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, CollaboratorError>;

    /// Return per-feature importance weights as (name, importance) pairs,
    /// most important first.
    fn feature_importances(&self) -> Vec<(String, f64)>;
}
