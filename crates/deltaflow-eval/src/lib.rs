//! Hold-out evaluation for discharge regression models.
//!
//! Partitions a dataset with a seeded shuffle, delegates fitting and
//! prediction to a pluggable [`Regressor`], and scores the held-out rows
//! with RMSE and R².

mod error;
pub mod metrics;
mod pipeline;
mod regressor;
mod split;

pub use error::EvalError;
pub use pipeline::{EvaluationConfig, EvaluationReport};
pub use regressor::{CollaboratorError, FittedModel, Regressor};
pub use split::{SplitIndices, TrainTestSplit};
