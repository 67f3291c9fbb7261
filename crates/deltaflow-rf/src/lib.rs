//! Random Forest regression: train, evaluate, predict.
//!
//! Provides a hand-rolled Random Forest regressor built from CART trees
//! with variance-reduction splits, parallel training via rayon, optional
//! out-of-bag evaluation, and MDI feature importances.

mod config;
mod error;
mod forest;
mod importance;
mod node;
mod oob;
mod predict;
mod result;
mod split;
mod tree;

pub use config::{MaxFeatures, OobMode, RandomForestConfig};
pub use error::ForestError;
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Node, NodeIndex, Variance};
pub use oob::OobScore;
pub use result::{RandomForestResult, TrainingMetadata};
pub use tree::{RegressionTree, RegressionTreeConfig};
