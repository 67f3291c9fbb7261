//! Artifact output for the deltaflow pipeline.

mod domain;
mod error;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use writer::ResultWriter;
